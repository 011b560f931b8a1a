mod git_reader;
mod memory;
mod reader;
pub mod scanner;

pub use git_reader::GitReader;
pub use memory::MemoryRepository;
pub use reader::RepositoryReader;
pub use scanner::{FilterCriteria, ScanOptions, Scanner};
