//! CLI command handlers. Each command is in its own file.

mod extract;
mod normalize;
mod sort;

pub use extract::run_extract;
pub use normalize::run_normalize;
pub use sort::{run_sort, SortOptions};
