//! Optiview library crate: AI-assisted code optimisation with annotated
//! side-by-side diffs.
//!
//! The [`diff`] engine aligns an original listing with its optimized
//! rewrite and renders annotated rows; [`review`] turns free-text review
//! output into a comment list; [`ai`] talks to the text generator; and
//! [`pipeline`] ties them together behind the HTTP surface in [`server`].

pub mod ai;
pub mod config;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod review;
pub mod server;

pub use config::{OperationMode, OptiviewConfig};
pub use error::OptimizeError;
pub use pipeline::{OptimizationReport, OptimizeRequest, optimize_code};
