use serde::Serialize;

use super::entities::{ImportIssue, ProcessedGradeItem, ProcessedGradeStatus, ReconcileReport};

// 导入结果统计
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct GradeImportSummary {
    pub total: usize,
    pub new: usize,
    pub modified: usize,
    pub comment_only: usize,
    pub unchanged: usize,
    pub unknown_student: usize,
    pub issues: usize,
}

// 导入预览响应
#[derive(Debug, Serialize)]
pub struct GradeImportResponse {
    pub summary: GradeImportSummary,
    pub items: Vec<ProcessedGradeItem>,
    pub issues: Vec<ImportIssue>,
}

impl From<ReconcileReport> for GradeImportResponse {
    fn from(report: ReconcileReport) -> Self {
        let summary = GradeImportSummary {
            total: report.items.len(),
            new: report.count(ProcessedGradeStatus::New),
            modified: report.count(ProcessedGradeStatus::Modified),
            comment_only: report.count(ProcessedGradeStatus::CommentOnly),
            unchanged: report.count(ProcessedGradeStatus::Unchanged),
            unknown_student: report.count(ProcessedGradeStatus::UnknownStudent),
            issues: report.issues.len(),
        };

        Self {
            summary,
            items: report.items,
            issues: report.issues,
        }
    }
}
