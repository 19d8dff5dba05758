pub mod task_handler;
