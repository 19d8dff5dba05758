pub mod activity_log_handler;
pub mod user_handler;
