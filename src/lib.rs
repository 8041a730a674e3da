//! Accessibility verification engine.
//!
//! Reconciles automated WCAG findings with human verification decisions:
//! findings are classified into a review queue, reviewer decisions are
//! validated and persisted (remotely, or locally when the service is
//! unreachable), and background refreshes of the analysis never overwrite a
//! decision already made.

pub mod backend;
pub mod config;
pub mod errors;
pub mod review;
pub mod ui;
