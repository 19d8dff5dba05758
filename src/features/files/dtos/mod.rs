mod file_dto;

pub use file_dto::{
    extension_for, is_mime_type_allowed, DeleteFileByUrlDto, DeleteFileResponseDto,
    FileResponseDto, UploadFileDto, ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};
