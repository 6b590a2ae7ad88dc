//! 列对齐与成绩对比
//!
//! 按表头文本把上传文件的列对应到成绩项，再逐个单元格与权威成绩矩阵对比。
//! 列顺序可以与成绩项顺序不同；无法对应的列只记录为问题，不会中断导入。

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

use super::FIXED_COLUMNS;
use super::grade_text::{
    grades_equivalent, non_blank, parse_comment_header, parse_grade_header, points_match,
};
use super::identity::IdentityMap;
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};
use crate::models::imports::entities::{
    ImportIssue, ImportedGradeWrapper, ImportedRow, ProcessedGradeItem, ProcessedGradeStatus,
    ReconcileReport,
};

/// 一个成绩项在上传文件中对应的列
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAlignment<'a> {
    pub assignment: &'a Assignment,
    pub grade_column: Option<usize>,
    pub comment_column: Option<usize>,
}

/// 按表头对齐成绩项，返回对齐结果与无法对应的列
pub fn align_columns<'a>(
    headers: &[String],
    assignments: &'a [Assignment],
) -> (Vec<ColumnAlignment<'a>>, Vec<ImportIssue>) {
    let mut grade_columns: HashMap<usize, usize> = HashMap::new();
    let mut comment_columns: HashMap<usize, usize> = HashMap::new();
    let mut issues = Vec::new();

    for (column, header) in headers.iter().enumerate().skip(FIXED_COLUMNS) {
        let header = header.trim();
        if header.is_empty() {
            continue;
        }

        // 同名成绩项各自认领一列，先到先得
        let claimed = if let Some(name) = parse_comment_header(header) {
            claim(assignments, &mut comment_columns, column, |a| a.name.trim() == name)
        } else if let Some((name, points)) = parse_grade_header(header) {
            claim(assignments, &mut grade_columns, column, |a| {
                a.name.trim() == name && points_match(points, a.points)
            })
        } else {
            false
        };

        if !claimed {
            issues.push(ImportIssue::UnmatchedColumn {
                column,
                header: header.to_string(),
            });
        }
    }

    let mut alignments = Vec::new();
    for (idx, assignment) in assignments.iter().enumerate() {
        let grade_column = grade_columns.get(&idx).copied();
        let comment_column = comment_columns.get(&idx).copied();

        if grade_column.is_none() {
            issues.push(ImportIssue::MissingAssignment {
                assignment_id: assignment.id,
                name: assignment.name.clone(),
            });
        }
        if grade_column.is_some() || comment_column.is_some() {
            alignments.push(ColumnAlignment {
                assignment,
                grade_column,
                comment_column,
            });
        }
    }

    (alignments, issues)
}

fn claim<F>(
    assignments: &[Assignment],
    claimed: &mut HashMap<usize, usize>,
    column: usize,
    matches: F,
) -> bool
where
    F: Fn(&Assignment) -> bool,
{
    let found = assignments
        .iter()
        .enumerate()
        .find(|(idx, a)| !claimed.contains_key(idx) && matches(*a))
        .map(|(idx, _)| idx);

    match found {
        Some(idx) => {
            claimed.insert(idx, column);
            true
        }
        None => false,
    }
}

/// 对比上传内容与成绩矩阵
///
/// 结果按文件行顺序排列，同一行内按成绩项顺序排列。学号无法识别的行只产生一条
/// `UnknownStudent` 记录；两边都没有数据的单元格不产生记录。
pub fn reconcile(
    wrapper: &ImportedGradeWrapper,
    assignments: &[Assignment],
    matrix: &[StudentGradeRow],
    identity: &IdentityMap,
) -> ReconcileReport {
    let (alignments, issues) = align_columns(&wrapper.headers, assignments);

    for issue in &issues {
        match issue {
            ImportIssue::UnmatchedColumn { column, header } => {
                warn!("第 {} 列 \"{}\" 无法对应任何成绩项，已忽略", column + 1, header);
            }
            ImportIssue::MissingAssignment {
                assignment_id,
                name,
            } => {
                debug!("成绩项 {} ({}) 在上传文件中没有对应列", name, assignment_id);
            }
        }
    }

    let students: HashMap<Uuid, &StudentGradeRow> =
        matrix.iter().map(|s| (s.student_uuid, s)).collect();

    let mut items = Vec::new();
    let mut seen_students = HashSet::new();

    for row in &wrapper.rows {
        let student = identity
            .resolve(&row.student_eid)
            .and_then(|uuid| students.get(&uuid).copied());

        let Some(student) = student else {
            warn!("第 {} 行学号 {} 无法识别", row.row_num, row.student_eid);
            items.push(unknown_student_item(row));
            continue;
        };

        if !seen_students.insert(student.student_uuid) {
            warn!(
                "学号 {} 在上传文件中重复出现（第 {} 行）",
                row.student_eid, row.row_num
            );
        }

        items.extend(
            alignments
                .iter()
                .filter_map(|alignment| compare_cell(row, student, alignment)),
        );
    }

    let report = ReconcileReport { items, issues };
    debug!(
        "成绩对比完成: {} 行, {} 条结果, {} 条待确认, {} 个问题",
        wrapper.rows.len(),
        report.items.len(),
        report.actionable_count(),
        report.issues.len()
    );
    report
}

fn unknown_student_item(row: &ImportedRow) -> ProcessedGradeItem {
    ProcessedGradeItem {
        status: ProcessedGradeStatus::UnknownStudent,
        row_num: row.row_num,
        student_eid: row.student_eid.clone(),
        student_uuid: None,
        student_name: None,
        assignment_id: None,
        assignment_name: None,
        old_grade: None,
        new_grade: None,
        old_comment: None,
        new_comment: None,
    }
}

fn compare_cell(
    row: &ImportedRow,
    student: &StudentGradeRow,
    alignment: &ColumnAlignment<'_>,
) -> Option<ProcessedGradeItem> {
    let assignment = alignment.assignment;
    let existing = student.grade_for(assignment.id);

    let old_grade = existing.and_then(|e| non_blank(e.grade.as_deref()));
    let old_comment = existing.and_then(|e| non_blank(e.comment.as_deref()));
    let new_grade = alignment.grade_column.and_then(|c| row.cell(c));
    let new_comment = alignment.comment_column.and_then(|c| row.cell(c));

    let status = classify(old_grade, new_grade, old_comment, new_comment)?;

    Some(ProcessedGradeItem {
        status,
        row_num: row.row_num,
        student_eid: student.student_eid.clone(),
        student_uuid: Some(student.student_uuid),
        student_name: Some(student.display_name()),
        assignment_id: Some(assignment.id),
        assignment_name: Some(assignment.name.clone()),
        old_grade: old_grade.map(str::to_string),
        new_grade: new_grade.map(str::to_string),
        old_comment: old_comment.map(str::to_string),
        new_comment: new_comment.map(str::to_string),
    })
}

/// 单元格分类；空白的导入单元格表示"未提供"，不会清除已有数据
pub fn classify(
    old_grade: Option<&str>,
    new_grade: Option<&str>,
    old_comment: Option<&str>,
    new_comment: Option<&str>,
) -> Option<ProcessedGradeStatus> {
    let comment_changed = matches!(new_comment, Some(new) if old_comment != Some(new));

    match (old_grade, new_grade) {
        (None, Some(_)) => Some(ProcessedGradeStatus::New),
        (Some(old), Some(new)) if !grades_equivalent(old, new) => {
            Some(ProcessedGradeStatus::Modified)
        }
        _ if comment_changed => Some(ProcessedGradeStatus::CommentOnly),
        (None, None) if old_comment.is_none() && new_comment.is_none() => None,
        _ => Some(ProcessedGradeStatus::Unchanged),
    }
}
