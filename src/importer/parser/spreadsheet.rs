use calamine::{Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

use super::{GradeFileParser, build_wrapper};
use crate::errors::{GradebookError, Result};
use crate::models::imports::entities::ImportedGradeWrapper;

/// Excel 解析器：只读取第一个工作表
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetGradeParser;

impl GradeFileParser for SpreadsheetGradeParser {
    fn parse(&self, data: &[u8]) -> Result<ImportedGradeWrapper> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))
            .map_err(|e| GradebookError::malformed_structure(format!("打开工作簿失败: {e}")))?;

        // 获取第一个工作表
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| GradebookError::malformed_structure("工作簿中没有工作表"))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            GradebookError::malformed_structure(format!("读取工作表 {sheet_name} 失败: {e}"))
        })?;

        // 已使用区域不一定从 A1 开始，补齐前导空列以保持列号一致
        let (first_row, first_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows = range.rows().enumerate().map(|(idx, row)| {
            let mut cells = vec![String::new(); first_col];
            cells.extend(row.iter().map(|cell| cell.to_string()));
            (first_row + idx + 1, cells)
        });

        let (_, headers) = rows
            .next()
            .filter(|(_, h)| h.iter().any(|c| !c.trim().is_empty()))
            .ok_or_else(|| GradebookError::malformed_structure("工作表缺少表头"))?;

        let wrapper = build_wrapper(headers, rows);
        debug!(
            "工作表 {} 解析完成: {} 列, {} 行",
            sheet_name,
            wrapper.headers.len(),
            wrapper.rows.len()
        );
        Ok(wrapper)
    }
}
