use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 上传文件中的一行数据
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRow {
    pub row_num: usize, // 文件中的行号（从 1 开始，表头为第 1 行）
    pub student_eid: String,
    pub student_name: String,
    pub cells: Vec<String>, // 按列序保存的全部单元格，包含前两列
}

impl ImportedRow {
    /// 获取指定列的值，缺失或空白视为无值
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells
            .get(column)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

// 解析后的上传文件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedGradeWrapper {
    pub headers: Vec<String>,
    pub rows: Vec<ImportedRow>,
}

impl ImportedGradeWrapper {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// 对比结果分类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProcessedGradeStatus {
    New,            // 原无成绩，导入提供了成绩
    Modified,       // 成绩不同
    Unchanged,      // 无变化
    CommentOnly,    // 成绩相同，仅评语变化
    UnknownStudent, // 学号无法识别
}

impl ProcessedGradeStatus {
    /// 是否需要人工确认后写入
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            ProcessedGradeStatus::New
                | ProcessedGradeStatus::Modified
                | ProcessedGradeStatus::CommentOnly
        )
    }
}

impl std::fmt::Display for ProcessedGradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessedGradeStatus::New => write!(f, "new"),
            ProcessedGradeStatus::Modified => write!(f, "modified"),
            ProcessedGradeStatus::Unchanged => write!(f, "unchanged"),
            ProcessedGradeStatus::CommentOnly => write!(f, "comment_only"),
            ProcessedGradeStatus::UnknownStudent => write!(f, "unknown_student"),
        }
    }
}

// 单条对比结果
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessedGradeItem {
    pub status: ProcessedGradeStatus,
    pub row_num: usize,
    pub student_eid: String,
    pub student_uuid: Option<Uuid>,
    pub student_name: Option<String>,
    pub assignment_id: Option<i64>,
    pub assignment_name: Option<String>,
    pub old_grade: Option<String>,
    pub new_grade: Option<String>,
    pub old_comment: Option<String>,
    pub new_comment: Option<String>,
}

// 文件级别的非致命问题
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportIssue {
    /// 表头列无法对应任何成绩项
    UnmatchedColumn { column: usize, header: String },
    /// 成绩项在文件中没有对应的成绩列
    MissingAssignment { assignment_id: i64, name: String },
}

// 对比报告
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReconcileReport {
    pub items: Vec<ProcessedGradeItem>,
    pub issues: Vec<ImportIssue>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, status: ProcessedGradeStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn actionable_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status.is_actionable())
            .count()
    }
}
