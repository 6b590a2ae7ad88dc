use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::gradebook::requests::TemplateDownloadParams;
use crate::services::GradebookService;

// 懒加载的全局 GradebookService 实例
static GRADEBOOK_SERVICE: Lazy<GradebookService> = Lazy::new(GradebookService::new_lazy);

pub async fn download_template(
    req: HttpRequest,
    query: web::Query<TemplateDownloadParams>,
) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE
        .download_template(query.into_inner(), &req)
        .await
}

pub async fn import_grades(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE.import_grades(payload, &req).await
}

// 配置路由
pub fn configure_gradebook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/gradebook")
            .route("/template", web::get().to(download_template))
            .route("/import", web::post().to(import_grades)),
    );
}
