use crate::model::{Project, Recurrence, Tag, Task};
use crate::ops::recurrence::Completion;

/// Result of one dispatched command, folded back into the app state
#[derive(Debug, Clone)]
pub enum Msg {
    TasksLoaded(Vec<Task>),
    ProjectsLoaded(Vec<Project>),
    TagsLoaded(Vec<Tag>),
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskCompleted(Completion),
    TaskDeleted(i64),
    ProjectCreated(Project),
    ProjectDeleted(i64),
    TagCreated(Tag),
    TagDeleted(i64),
    RecurrenceSet(Recurrence),
    RecurrenceDeleted(i64),
    ConfigSaved,
    Error(String),
    /// Clears the banner only while its generation is still current
    ClearStatus(u64),
}
