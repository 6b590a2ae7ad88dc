pub mod common;
pub mod gradebook;
pub mod imports;

pub use common::response::ApiResponse;

/// 业务错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1500,

    // 文件上传
    FileNotFound = 2000,
    FileUploadFailed = 2001,
    FileSizeExceeded = 2002,
    MultifileUploadNotAllowed = 2003,

    // 成绩导入
    ImportFileParseFailed = 3000,
    ImportNothingToImport = 3001,
    ImportStudentConflict = 3002,

    // 成绩册
    GradebookUnavailable = 4000,
    TemplateExportFailed = 4001,
}
