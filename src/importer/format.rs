//! 上传格式识别

use std::collections::HashSet;

use crate::config::ImportConfig;
use crate::utils::validate_magic_bytes;

/// 上传文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    DelimitedText,
    BinarySpreadsheet,
    Unrecognized,
}

impl ImportFormat {
    /// 检查文件内容是否与识别出的格式相符
    pub fn accepts_payload(&self, data: &[u8]) -> bool {
        match self {
            ImportFormat::DelimitedText => validate_magic_bytes(data, ".csv"),
            ImportFormat::BinarySpreadsheet => {
                validate_magic_bytes(data, ".xlsx") || validate_magic_bytes(data, ".xls")
            }
            ImportFormat::Unrecognized => false,
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFormat::DelimitedText => write!(f, "csv"),
            ImportFormat::BinarySpreadsheet => write!(f, "spreadsheet"),
            ImportFormat::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// 规范化 MIME 类型：去掉参数部分，去除空白并转为小写
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// 按配置的 MIME 类型表识别上传格式
#[derive(Debug, Clone)]
pub struct FormatDetector {
    csv_types: HashSet<String>,
    spreadsheet_types: HashSet<String>,
}

impl FormatDetector {
    pub fn new<I, S>(csv_types: I, spreadsheet_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            csv_types: csv_types
                .into_iter()
                .map(|t| normalize_media_type(t.as_ref()))
                .collect(),
            spreadsheet_types: spreadsheet_types
                .into_iter()
                .map(|t| normalize_media_type(t.as_ref()))
                .collect(),
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(&config.csv_mime_types, &config.spreadsheet_mime_types)
    }

    pub fn detect(&self, media_type: &str) -> ImportFormat {
        let media_type = normalize_media_type(media_type);
        if self.csv_types.contains(&media_type) {
            ImportFormat::DelimitedText
        } else if self.spreadsheet_types.contains(&media_type) {
            ImportFormat::BinarySpreadsheet
        } else {
            ImportFormat::Unrecognized
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_default_types() {
        let detector = FormatDetector::default();
        assert_eq!(detector.detect("text/csv"), ImportFormat::DelimitedText);
        assert_eq!(
            detector.detect("application/vnd.ms-excel"),
            ImportFormat::BinarySpreadsheet
        );
        assert_eq!(
            detector.detect("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            ImportFormat::BinarySpreadsheet
        );
        assert_eq!(detector.detect("application/pdf"), ImportFormat::Unrecognized);
        assert_eq!(detector.detect(""), ImportFormat::Unrecognized);
    }

    #[test]
    fn test_detect_normalizes_parameters_and_case() {
        let detector = FormatDetector::default();
        assert_eq!(
            detector.detect(" Text/CSV; charset=utf-8"),
            ImportFormat::DelimitedText
        );
    }

    #[test]
    fn test_detect_uses_configured_table() {
        let detector = FormatDetector::new(vec!["text/plain"], vec!["application/x-ods"]);
        assert_eq!(detector.detect("text/plain"), ImportFormat::DelimitedText);
        assert_eq!(detector.detect("text/csv"), ImportFormat::Unrecognized);
        assert_eq!(
            detector.detect("application/x-ods"),
            ImportFormat::BinarySpreadsheet
        );
    }

    #[test]
    fn test_accepts_payload() {
        assert!(ImportFormat::DelimitedText.accepts_payload(b"Student ID,Student Name\n"));
        assert!(ImportFormat::BinarySpreadsheet.accepts_payload(&[0x50, 0x4B, 0x03, 0x04, 0x14]));
        assert!(!ImportFormat::BinarySpreadsheet.accepts_payload(b"Student ID,Student Name\n"));
        assert!(!ImportFormat::Unrecognized.accepts_payload(b"anything"));
    }
}
