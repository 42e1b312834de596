pub mod dates;
pub mod recurrence;
