//! 成绩模板导出

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, error};

use super::grade_text::{comment_header, grade_header, parse_number, strip_trailing_zero};
use super::{FIXED_COLUMNS, STUDENT_ID_HEADER, STUDENT_NAME_HEADER};
use crate::config::ExportConfig;
use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    #[default]
    Csv,
    Xlsx,
}

impl TemplateFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => ".csv",
            TemplateFormat::Xlsx => ".xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => "text/csv; charset=utf-8",
            TemplateFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// 导出的模板文件
///
/// 文件在 `TemplateArtifact` 被丢弃时删除。
#[derive(Debug)]
pub struct TemplateArtifact {
    file: NamedTempFile,
    format: TemplateFormat,
}

impl TemplateArtifact {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    /// 下载时使用的文件名
    pub fn download_name(&self) -> String {
        format!("gradebook_template{}", self.format.extension())
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// 以只读方式重新打开，用于流式发送
    pub fn reopen(&self) -> Result<File> {
        Ok(self.file.reopen()?)
    }
}

/// 模板表头：学号、姓名，之后每个成绩项依次为成绩列和评语列
pub fn template_headers(assignments: &[Assignment]) -> Vec<String> {
    let mut headers = Vec::with_capacity(FIXED_COLUMNS + assignments.len() * 2);
    headers.push(STUDENT_ID_HEADER.to_string());
    headers.push(STUDENT_NAME_HEADER.to_string());
    for assignment in assignments {
        headers.push(grade_header(&assignment.name, assignment.points));
        headers.push(comment_header(&assignment.name));
    }
    headers
}

/// 模板数据行；不包含成绩时只有学号和姓名
pub fn template_rows(
    assignments: &[Assignment],
    matrix: &[StudentGradeRow],
    include_grades: bool,
) -> Vec<Vec<String>> {
    matrix
        .iter()
        .map(|student| {
            let mut row = vec![student.student_eid.clone(), student.display_name()];
            if include_grades {
                for assignment in assignments {
                    let entry = student.grade_for(assignment.id);
                    row.push(
                        entry
                            .and_then(|e| e.grade.as_deref())
                            .map(|g| strip_trailing_zero(g).to_string())
                            .unwrap_or_default(),
                    );
                    row.push(
                        entry
                            .and_then(|e| e.comment.clone())
                            .unwrap_or_default(),
                    );
                }
            }
            row
        })
        .collect()
}

/// 生成成绩模板并写入临时文件
pub fn export_template(
    assignments: &[Assignment],
    matrix: &[StudentGradeRow],
    include_grades: bool,
    format: TemplateFormat,
    config: &ExportConfig,
) -> Result<TemplateArtifact> {
    let mut file = tempfile::Builder::new()
        .prefix(&config.file_prefix)
        .suffix(format.extension())
        .tempfile_in(config.temp_dir())
        .map_err(|e| {
            error!("创建模板临时文件失败: {}", e);
            GradebookError::template_export(format!("创建临时文件失败: {e}"))
        })?;

    let headers = template_headers(assignments);
    let rows = template_rows(assignments, matrix, include_grades);

    match format {
        TemplateFormat::Csv => write_csv(file.as_file_mut(), &headers, &rows)?,
        TemplateFormat::Xlsx => write_xlsx(file.as_file_mut(), &headers, &rows)?,
    }

    debug!(
        "模板已生成: {} ({} 列, {} 行)",
        file.path().display(),
        headers.len(),
        rows.len()
    );
    Ok(TemplateArtifact { file, format })
}

fn write_csv(file: &mut File, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(file);
    let to_export_error =
        |e: csv::Error| GradebookError::template_export(format!("CSV 写入失败: {e}"));

    wtr.write_record(headers).map_err(to_export_error)?;
    for row in rows {
        wtr.write_record(row).map_err(to_export_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_xlsx(file: &mut File, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // 表头格式
    let header_format = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, header, &header_format)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col_num = column_index(col)?;
            // 成绩列中能解析为数值的写成数字，其余按文本写入
            let is_grade_column = col >= FIXED_COLUMNS && (col - FIXED_COLUMNS) % 2 == 0;
            match parse_number(value).filter(|_| is_grade_column) {
                Some(number) => worksheet.write_number(row_num, col_num, number)?,
                None => worksheet.write_string(row_num, col_num, value)?,
            };
        }
    }

    let buffer = workbook.save_to_buffer()?;
    file.write_all(&buffer)?;
    file.flush()?;
    Ok(())
}

/// 工作表列号，超出 u16 范围时报错
fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| {
        GradebookError::template_export(format!("模板列数过多: 第 {} 列", col + 1))
    })
}
