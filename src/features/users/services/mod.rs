mod activity_log_service;
mod user_service;

pub use activity_log_service::ActivityLogService;
pub use user_service::UserService;
