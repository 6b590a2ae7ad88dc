//! 成绩导入核心
//!
//! 负责把外部上传的成绩表（CSV 或 Excel）与权威成绩矩阵进行对比，
//! 生成待人工确认的变更列表。整个过程只读取成绩矩阵，从不修改。
//!
//! # 模块
//! - `format`: 根据 MIME 类型识别上传格式
//! - `parser`: CSV / Excel 行解析器
//! - `identity`: 学号（eid）到内部标识（uuid）的映射
//! - `reconcile`: 列对齐与成绩对比
//! - `session`: 导入流程状态机
//! - `template`: 成绩模板导出

pub mod format;
pub mod grade_text;
pub mod identity;
pub mod parser;
pub mod reconcile;
pub mod session;
pub mod template;

pub use format::{FormatDetector, ImportFormat};
pub use identity::IdentityMap;
pub use parser::{CsvGradeParser, GradeFileParser, SpreadsheetGradeParser};
pub use reconcile::reconcile;
pub use session::{GradeImportSession, ImportFailure, ImportOutcome, ImportState, reconcile_upload};
pub use template::{TemplateArtifact, TemplateFormat, export_template};

/// 固定列：学号、姓名
pub const STUDENT_ID_HEADER: &str = "Student ID";
pub const STUDENT_NAME_HEADER: &str = "Student Name";
pub const FIXED_COLUMNS: usize = 2;

#[cfg(test)]
pub(crate) mod fixtures;
