//! CLI operation mode handlers.
//!
//! - [`optimize_file`]: Optimise one source file and print the report
//! - [`serve`]: Run the HTTP service
//!
//! Output formatting utilities are in [`output`].

pub mod optimize_file;
pub mod output;
pub mod serve;
