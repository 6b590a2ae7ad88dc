/// 检查内容前若干字节是否像文本（不含 NUL 字节）
const TEXT_SNIFF_LEN: usize = 512;

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容
/// * `extension` - 文件扩展名（包含点号，如 ".xlsx"）
///
/// # Returns
/// * `true` - 魔术字节匹配
/// * `false` - 魔术字节不匹配或扩展名未知
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".xls" => {
            // MS Office 旧格式 (OLE Compound Document)
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        }
        ".xlsx" | ".ods" => {
            // ZIP 容器 (OOXML / OpenDocument)
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
        }

        // 文本格式 - 只要求不含 NUL 字节
        ".csv" | ".txt" => !data.iter().take(TEXT_SNIFF_LEN).any(|b| *b == 0),

        // 未知格式 - 默认拒绝
        _ => false,
    }
}
