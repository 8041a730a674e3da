//! Terminal rendering for the CLI.

pub mod icons;
mod render;

pub use render::{
    confidence_label, progress_line, queue_line, severity_label, status_badge, warning_line,
};
