use serde::Serialize;

use super::{Todo, TodoStatus};

/// The todo list split up for display.
///
/// `tasks` holds active todos followed by soft-deleted ones, both in load
/// order. `completed` is in reverse load order, so the oldest completed todo
/// comes first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Board<'a> {
    pub tasks: Vec<&'a Todo>,
    pub completed: Vec<&'a Todo>,
}

impl<'a> Board<'a> {
    pub fn new(todos: &'a [Todo]) -> Self {
        let active = with_status(todos, TodoStatus::Active);
        let deleted = with_status(todos, TodoStatus::SoftDeleted);
        let completed = with_status(todos, TodoStatus::Completed).rev();

        Self {
            tasks: active.chain(deleted).collect(),
            completed: completed.collect(),
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &'a Todo> + '_ {
        (self.tasks.iter().copied()).filter(|todo| todo.status == TodoStatus::Active)
    }

    pub fn soft_deleted(&self) -> impl Iterator<Item = &'a Todo> + '_ {
        (self.tasks.iter().copied()).filter(|todo| todo.status == TodoStatus::SoftDeleted)
    }
}

fn with_status(
    todos: &[Todo],
    status: TodoStatus,
) -> impl DoubleEndedIterator<Item = &Todo> {
    todos.iter().filter(move |todo| todo.status == status)
}
