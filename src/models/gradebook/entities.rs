use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// 成绩项（作业）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    pub points: f64,
    pub sort_order: i32,
}

// 单个学生在单个成绩项上的成绩
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GradeEntry {
    pub grade: Option<String>,
    pub comment: Option<String>,
}

// 成绩矩阵中的一行（一个学生）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGradeRow {
    pub student_eid: String,
    pub student_uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub grades: HashMap<i64, GradeEntry>,
}

impl StudentGradeRow {
    /// "姓, 名" 形式的显示名称
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn grade_for(&self, assignment_id: i64) -> Option<&GradeEntry> {
        self.grades.get(&assignment_id)
    }
}
