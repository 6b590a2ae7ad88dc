//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    StorageLoad("E001", "Gradebook Storage Error"),
    StoragePluginNotFound("E002", "Storage Plugin Not Found"),
    FileOperation("E003", "File Operation Error"),
    Serialization("E004", "Serialization Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    UnsupportedFormat("E007", "Unsupported Upload Format"),
    MalformedStructure("E008", "Malformed Upload Structure"),
    DuplicateStudent("E009", "Duplicate Student Identifier"),
    TemplateExport("E010", "Template Export Error"),
}

impl GradebookError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为上传文件本身的问题（格式不支持或结构损坏）
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            GradebookError::UnsupportedFormat(_) | GradebookError::MalformedStructure(_)
        )
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for GradebookError {
    fn from(err: std::io::Error) -> Self {
        GradebookError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for GradebookError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            GradebookError::FileOperation(err.to_string())
        } else {
            GradebookError::MalformedStructure(err.to_string())
        }
    }
}

impl From<calamine::Error> for GradebookError {
    fn from(err: calamine::Error) -> Self {
        GradebookError::MalformedStructure(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for GradebookError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        GradebookError::TemplateExport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradebookError::storage_load("test").code(), "E001");
        assert_eq!(GradebookError::file_operation("test").code(), "E003");
        assert_eq!(GradebookError::unsupported_format("test").code(), "E007");
        assert_eq!(GradebookError::duplicate_student("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradebookError::malformed_structure("test").error_type(),
            "Malformed Upload Structure"
        );
        assert_eq!(
            GradebookError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = GradebookError::duplicate_student("jdoe");
        assert_eq!(err.message(), "jdoe");
    }

    #[test]
    fn test_parse_failure_classes() {
        assert!(GradebookError::unsupported_format("x").is_parse_failure());
        assert!(GradebookError::malformed_structure("x").is_parse_failure());
        assert!(!GradebookError::file_operation("x").is_parse_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: GradebookError = io.into();
        assert_eq!(err.code(), "E003");
        assert!(err.format_simple().contains("pipe closed"));
    }
}
