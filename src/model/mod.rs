pub mod config;
pub mod project;
pub mod recurrence;
pub mod tag;
pub mod task;

pub use config::*;
pub use project::*;
pub use recurrence::*;
pub use tag::*;
pub use task::*;

/// Rejected user input for one of the model's parseable fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid status: {0} (use todo, doing or done)")]
    Status(String),
    #[error("invalid priority: {0} (use none, low, medium or high)")]
    Priority(String),
    #[error("invalid recurrence pattern: {0} (use daily, weekly, monthly or yearly)")]
    Pattern(String),
    #[error("invalid recurrence interval: {0}")]
    Interval(String),
    #[error("invalid date: {0}")]
    Date(String),
}
