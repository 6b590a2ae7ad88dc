use tracing::{debug, warn};

use super::{GradeFileParser, build_wrapper};
use crate::errors::{GradebookError, Result};
use crate::models::imports::entities::ImportedGradeWrapper;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// CSV 解析器：第一行为表头，允许行长度不一致
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvGradeParser;

impl GradeFileParser for CsvGradeParser {
    fn parse(&self, data: &[u8]) -> Result<ImportedGradeWrapper> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (idx, result) in rdr.byte_records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("CSV 第 {} 条记录解析失败，已跳过: {}", idx + 1, e);
                    continue;
                }
            };

            let row_num = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            let cells: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect();

            if headers.is_none() {
                headers = Some(cells);
            } else {
                rows.push((row_num, cells));
            }
        }

        let headers = headers
            .filter(|h| h.iter().any(|c| !c.trim().is_empty()))
            .ok_or_else(|| GradebookError::malformed_structure("CSV 文件缺少表头"))?;

        let wrapper = build_wrapper(headers, rows);
        debug!(
            "CSV 解析完成: {} 列, {} 行",
            wrapper.headers.len(),
            wrapper.rows.len()
        );
        Ok(wrapper)
    }
}
