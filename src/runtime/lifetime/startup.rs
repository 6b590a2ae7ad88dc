use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::GradebookStorage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn GradebookStorage>,
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    debug!(
        "Creating {} gradebook storage from {}",
        config.gradebook.storage_type, config.gradebook.data_path
    );
    let storage = crate::storage::create_storage().await?;
    warn!("Gradebook storage initialized");

    // 启动时检查一次学号是否唯一，冲突在导入时才会报错
    match storage.get_assignments().await {
        Ok(assignments) => match storage.get_grade_matrix(&assignments).await {
            Ok(matrix) => {
                if let Err(e) = crate::importer::IdentityMap::from_matrix(&matrix) {
                    warn!("Gradebook contains conflicting student ids: {}", e.message());
                }
            }
            Err(e) => warn!("Failed to load grade matrix: {}", e),
        },
        Err(e) => warn!("Failed to load assignments: {}", e),
    }

    Ok(StartupContext { storage })
}
