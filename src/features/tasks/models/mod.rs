mod task;

#[cfg(test)]
pub use task::Task;
pub use task::{TaskAssigneeRow, TaskPriority, TaskRow, TaskStatus};
