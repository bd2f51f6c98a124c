//! Result reporting and export

pub mod reporter;

pub use reporter::{format_count, print_comparison, write_csv, write_json};
