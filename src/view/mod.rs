mod report_view;

pub use report_view::{render_json, render_text};
