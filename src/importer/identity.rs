//! 学号映射

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::StudentGradeRow;

/// 学号（eid）到内部标识（uuid）的只读映射
///
/// 只从权威成绩矩阵构建，上传文件中的数据不参与构建。
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_eid: HashMap<String, Uuid>,
}

impl IdentityMap {
    /// 从成绩矩阵构建一一对应的映射，学号或内部标识重复都视为配置错误
    pub fn from_matrix(matrix: &[StudentGradeRow]) -> Result<Self> {
        let mut by_eid = HashMap::with_capacity(matrix.len());
        let mut uuids = HashSet::with_capacity(matrix.len());

        for student in matrix {
            let eid = student.student_eid.trim().to_string();
            if let Some(existing) = by_eid.insert(eid.clone(), student.student_uuid) {
                return Err(GradebookError::duplicate_student(format!(
                    "学号 {eid} 同时对应 {existing} 和 {}",
                    student.student_uuid
                )));
            }
            if !uuids.insert(student.student_uuid) {
                return Err(GradebookError::duplicate_student(format!(
                    "内部标识 {} 被多个学号使用（包括 {eid}）",
                    student.student_uuid
                )));
            }
        }

        Ok(Self { by_eid })
    }

    pub fn resolve(&self, eid: &str) -> Option<Uuid> {
        self.by_eid.get(eid.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_eid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_eid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(eid: &str, uuid: Uuid) -> StudentGradeRow {
        StudentGradeRow {
            student_eid: eid.to_string(),
            student_uuid: uuid,
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            grades: HashMap::new(),
        }
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let jdoe = Uuid::new_v4();
        let asmith = Uuid::new_v4();
        let map =
            IdentityMap::from_matrix(&[student("jdoe", jdoe), student("asmith", asmith)]).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("jdoe"), Some(jdoe));
        assert_eq!(map.resolve(" asmith "), Some(asmith));
        assert_eq!(map.resolve("JDOE"), None);
        assert_eq!(map.resolve("ghost"), None);
    }

    #[test]
    fn test_duplicate_eid_is_configuration_error() {
        let err = IdentityMap::from_matrix(&[
            student("jdoe", Uuid::new_v4()),
            student("jdoe ", Uuid::new_v4()),
        ])
        .unwrap_err();
        assert_eq!(err.code(), "E009");
        assert!(err.message().contains("jdoe"));
    }

    #[test]
    fn test_shared_uuid_is_configuration_error() {
        let shared = Uuid::new_v4();
        let err = IdentityMap::from_matrix(&[student("jdoe", shared), student("bsmith", shared)])
            .unwrap_err();
        assert_eq!(err.code(), "E009");
        assert!(err.message().contains("bsmith"));
        assert!(err.message().contains(&shared.to_string()));
    }

    #[test]
    fn test_empty_matrix() {
        let map = IdentityMap::from_matrix(&[]).unwrap();
        assert!(map.is_empty());
    }
}
