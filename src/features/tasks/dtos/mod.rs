mod task_dto;

pub use task_dto::{CreateTaskDto, TaskBoardDto, TaskResponseDto, UpdateTaskDto};
