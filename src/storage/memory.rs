//! 基于 JSON 快照的内存存储

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::GradebookStorage;
use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};

#[derive(Debug, Default, Deserialize)]
struct GradebookSnapshot {
    #[serde(default)]
    assignments: Vec<Assignment>,
    #[serde(default)]
    students: Vec<StudentGradeRow>,
}

/// 只读的内存成绩册
#[derive(Debug, Clone, Default)]
pub struct MemoryGradebookStorage {
    assignments: Vec<Assignment>,
    students: Vec<StudentGradeRow>,
}

impl MemoryGradebookStorage {
    pub fn new(mut assignments: Vec<Assignment>, mut students: Vec<StudentGradeRow>) -> Self {
        assignments.sort_by_key(|a| (a.sort_order, a.id));
        students.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.student_eid.cmp(&b.student_eid))
        });
        Self {
            assignments,
            students,
        }
    }

    /// 从快照文件加载
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            GradebookError::storage_load(format!("读取成绩册快照 {} 失败: {e}", path.display()))
        })?;
        let storage = Self::from_json(&data)?;

        info!(
            "成绩册快照已加载: {} ({} 个成绩项, {} 名学生)",
            path.display(),
            storage.assignments.len(),
            storage.students.len()
        );
        Ok(storage)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let snapshot: GradebookSnapshot = serde_json::from_slice(data)
            .map_err(|e| GradebookError::storage_load(format!("成绩册快照格式错误: {e}")))?;
        Ok(Self::new(snapshot.assignments, snapshot.students))
    }
}

#[async_trait::async_trait]
impl GradebookStorage for MemoryGradebookStorage {
    async fn get_assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.assignments.clone())
    }

    async fn get_grade_matrix(&self, assignments: &[Assignment]) -> Result<Vec<StudentGradeRow>> {
        let ids: HashSet<i64> = assignments.iter().map(|a| a.id).collect();

        Ok(self
            .students
            .iter()
            .map(|student| {
                let mut row = student.clone();
                row.grades.retain(|id, _| ids.contains(id));
                row
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "assignments": [
            { "id": 2, "name": "Midterm", "points": 100.0, "sort_order": 2 },
            { "id": 1, "name": "Quiz 1", "points": 10.0, "sort_order": 1 }
        ],
        "students": [
            {
                "student_eid": "jdoe",
                "student_uuid": "6f1c2b9e-3a54-4d8e-9c1a-0b7e5d2f4a10",
                "first_name": "John",
                "last_name": "Doe",
                "grades": { "1": { "grade": "8", "comment": "good" }, "2": { "grade": "70" } }
            },
            {
                "student_eid": "bchan",
                "student_uuid": "a93b6c1d-2e7f-4a58-b0c4-7d6e9f1a2b84",
                "first_name": "Ben",
                "last_name": "Chan"
            }
        ]
    }"#;

    #[actix_web::test]
    async fn test_load_snapshot_sorted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let storage = MemoryGradebookStorage::load(file.path()).await.unwrap();
        let assignments = storage.get_assignments().await.unwrap();
        assert_eq!(assignments[0].name, "Quiz 1");
        assert_eq!(assignments[1].name, "Midterm");

        let matrix = storage.get_grade_matrix(&assignments).await.unwrap();
        assert_eq!(matrix[0].student_eid, "bchan");
        assert!(matrix[0].grades.is_empty());
        assert_eq!(matrix[1].grade_for(1).unwrap().grade.as_deref(), Some("8"));
    }

    #[actix_web::test]
    async fn test_matrix_limited_to_requested_assignments() {
        let storage = MemoryGradebookStorage::from_json(SNAPSHOT.as_bytes()).unwrap();
        let assignments = storage.get_assignments().await.unwrap();

        let matrix = storage.get_grade_matrix(&assignments[..1]).await.unwrap();
        let jdoe = matrix.iter().find(|s| s.student_eid == "jdoe").unwrap();
        assert!(jdoe.grade_for(1).is_some());
        assert!(jdoe.grade_for(2).is_none());
    }

    #[actix_web::test]
    async fn test_missing_snapshot_is_load_error() {
        let err = MemoryGradebookStorage::load("/nonexistent/gradebook.json")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_invalid_snapshot_is_load_error() {
        let err = MemoryGradebookStorage::from_json(b"{ not json").unwrap_err();
        assert_eq!(err.code(), "E001");
    }
}
