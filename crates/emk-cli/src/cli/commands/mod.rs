//! CLI command handlers. Each command is in its own file.

mod all;
mod batch;
mod bulk;
mod checksum;
mod completions;
mod count;
mod download;
mod get;
mod metadata;
mod report;

pub use all::run_all;
pub use batch::run_batch;
pub use bulk::run_bulk;
pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use count::run_count;
pub use get::run_get;
pub use metadata::run_metadata;
