pub mod import;
pub mod template;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::{AppConfig, ExportConfig, ImportConfig};
use crate::errors::Result;
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};
use crate::models::gradebook::requests::TemplateDownloadParams;
use crate::storage::GradebookStorage;

pub struct GradebookService {
    storage: Option<Arc<dyn GradebookStorage>>,
    import: Option<ImportConfig>,
    export: Option<ExportConfig>,
}

impl GradebookService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            import: None,
            export: None,
        }
    }

    pub fn with_storage(storage: Arc<dyn GradebookStorage>) -> Self {
        Self {
            storage: Some(storage),
            ..Self::new_lazy()
        }
    }

    /// 使用指定配置，未指定时读取全局配置
    pub fn with_config(mut self, import: ImportConfig, export: ExportConfig) -> Self {
        self.import = Some(import);
        self.export = Some(export);
        self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Option<Arc<dyn GradebookStorage>> {
        if let Some(storage) = &self.storage {
            Some(storage.clone())
        } else {
            request
                .app_data::<web::Data<Arc<dyn GradebookStorage>>>()
                .map(|data| data.get_ref().clone())
        }
    }

    pub(crate) fn import_config(&self) -> &ImportConfig {
        self.import.as_ref().unwrap_or_else(|| &AppConfig::get().import)
    }

    pub(crate) fn export_config(&self) -> &ExportConfig {
        self.export.as_ref().unwrap_or_else(|| &AppConfig::get().export)
    }

    // 下载成绩模板
    pub async fn download_template(
        &self,
        params: TemplateDownloadParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        template::download_template(self, params, request).await
    }

    // 上传成绩表并生成对比结果
    pub async fn import_grades(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_grades(self, payload, request).await
    }
}

/// 读取成绩项与成绩矩阵
pub(crate) async fn load_gradebook(
    storage: &Arc<dyn GradebookStorage>,
) -> Result<(Vec<Assignment>, Vec<StudentGradeRow>)> {
    let assignments = storage.get_assignments().await?;
    let matrix = storage.get_grade_matrix(&assignments).await?;
    Ok((assignments, matrix))
}
