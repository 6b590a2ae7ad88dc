//! 测试用成绩册数据

use std::collections::HashMap;
use uuid::Uuid;

use super::parser::{CsvGradeParser, GradeFileParser};
use crate::models::gradebook::entities::{Assignment, GradeEntry, StudentGradeRow};
use crate::models::imports::entities::ImportedGradeWrapper;

pub fn assignment(id: i64, name: &str, points: f64) -> Assignment {
    Assignment {
        id,
        name: name.to_string(),
        points,
        sort_order: id as i32,
    }
}

pub fn student(
    eid: &str,
    first_name: &str,
    last_name: &str,
    grades: &[(i64, Option<&str>, Option<&str>)],
) -> StudentGradeRow {
    StudentGradeRow {
        student_eid: eid.to_string(),
        student_uuid: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        grades: grades
            .iter()
            .map(|(id, grade, comment)| {
                (
                    *id,
                    GradeEntry {
                        grade: grade.map(str::to_string),
                        comment: comment.map(str::to_string),
                    },
                )
            })
            .collect::<HashMap<_, _>>(),
    }
}

pub fn csv_wrapper(data: &str) -> ImportedGradeWrapper {
    CsvGradeParser
        .parse(data.as_bytes())
        .expect("fixture csv should parse")
}

/// 三个成绩项、四个学生的成绩册
pub fn sample_gradebook() -> (Vec<Assignment>, Vec<StudentGradeRow>) {
    let assignments = vec![
        assignment(1, "Quiz 1", 10.0),
        assignment(2, "Midterm", 100.0),
        assignment(3, "Lab, Part \"A\"", 12.5),
    ];
    let matrix = vec![
        student(
            "jdoe",
            "John",
            "Doe",
            &[(1, Some("8"), Some("good")), (2, Some("74.5"), None)],
        ),
        student(
            "asmith",
            "Alice",
            "Smith",
            &[(1, Some("10.0"), Some("perfect")), (3, Some("11"), Some("late, see note"))],
        ),
        student("bchan", "Ben", "Chan", &[]),
        student("olee", "Oscar", "Lee", &[(2, None, Some("absent"))]),
    ];
    (assignments, matrix)
}
