use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};

pub mod memory;

pub use memory::MemoryGradebookStorage;

#[async_trait::async_trait]
pub trait GradebookStorage: Send + Sync {
    // 按排序获取全部成绩项
    async fn get_assignments(&self) -> Result<Vec<Assignment>>;
    // 获取指定成绩项的成绩矩阵，每个学生一行
    async fn get_grade_matrix(&self, assignments: &[Assignment]) -> Result<Vec<StudentGradeRow>>;
}

/// 根据配置创建存储后端
pub async fn create_storage() -> Result<Arc<dyn GradebookStorage>> {
    let config = AppConfig::get();

    match config.gradebook.storage_type.as_str() {
        "memory" => {
            let storage = MemoryGradebookStorage::load(&config.gradebook.data_path).await?;
            Ok(Arc::new(storage))
        }
        other => Err(GradebookError::storage_plugin_not_found(format!(
            "未知的成绩册存储类型: {other}"
        ))),
    }
}
