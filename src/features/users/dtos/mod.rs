mod activity_log_dto;
mod user_dto;

pub use activity_log_dto::{ActivityLogQuery, ActivityLogResponseDto, CreateActivityLogDto};
pub use user_dto::{
    CreateUserDto, GrantAccessDto, UpdateUserDto, UserOptionDto, UserResponseDto, UserSummaryDto,
};
