// Library crate exposing modules for integration tests and benchmarks

pub mod cli;
pub mod error;
pub mod model;
pub mod repository;
pub mod util;
pub mod view;

pub use error::{CriteriaError, ScanError};
