//! 上传文件行解析
//!
//! 两种解析器输出同样的 [`ImportedGradeWrapper`]，后续对比逻辑与格式无关。

mod delimited;
mod spreadsheet;

pub use delimited::CsvGradeParser;
pub use spreadsheet::SpreadsheetGradeParser;

use tracing::warn;

use super::ImportFormat;
use crate::errors::Result;
use crate::models::imports::entities::{ImportedGradeWrapper, ImportedRow};

/// 把上传内容解析为表头与数据行
pub trait GradeFileParser: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<ImportedGradeWrapper>;
}

static CSV_PARSER: CsvGradeParser = CsvGradeParser;
static SPREADSHEET_PARSER: SpreadsheetGradeParser = SpreadsheetGradeParser;

/// 根据格式选择解析器，无法识别的格式返回 None
pub fn parser_for(format: ImportFormat) -> Option<&'static dyn GradeFileParser> {
    match format {
        ImportFormat::DelimitedText => Some(&CSV_PARSER),
        ImportFormat::BinarySpreadsheet => Some(&SPREADSHEET_PARSER),
        ImportFormat::Unrecognized => None,
    }
}

/// 由原始行构建导入结构：跳过空行和没有学号的行
pub(crate) fn build_wrapper<I>(headers: Vec<String>, rows: I) -> ImportedGradeWrapper
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
    let mut imported = Vec::new();

    for (row_num, cells) in rows {
        let cells: Vec<String> = cells.into_iter().map(|c| c.trim().to_string()).collect();

        // 空行
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        let student_eid = cells.first().cloned().unwrap_or_default();
        if student_eid.is_empty() {
            warn!("第 {} 行缺少学号，已跳过", row_num);
            continue;
        }
        let student_name = cells.get(1).cloned().unwrap_or_default();

        imported.push(ImportedRow {
            row_num,
            student_eid,
            student_name,
            cells,
        });
    }

    ImportedGradeWrapper {
        headers,
        rows: imported,
    }
}
