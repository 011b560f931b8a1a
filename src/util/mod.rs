mod format;

pub use format::{format_timestamp, parse_date, truncate};
