//! 成绩导入服务

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, TryStreamExt};
use tracing::{error, info, warn};

use super::{GradebookService, load_gradebook};
use crate::importer::{GradeImportSession, ImportOutcome};
use crate::models::imports::responses::GradeImportResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 上传读取错误
enum UploadError {
    Missing,
    Multiple,
    TooLarge(usize),
    Read(String),
}

impl UploadError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Missing => ErrorCode::FileNotFound,
            Self::Multiple => ErrorCode::MultifileUploadNotAllowed,
            Self::TooLarge(_) => ErrorCode::FileSizeExceeded,
            Self::Read(_) => ErrorCode::FileUploadFailed,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Missing => "缺少上传文件".to_string(),
            Self::Multiple => "一次只能上传一个文件".to_string(),
            Self::TooLarge(limit) => format!("文件大小超过限制 ({limit} 字节)"),
            Self::Read(msg) => format!("文件读取失败: {msg}"),
        }
    }

    fn into_response(self) -> HttpResponse {
        let body = ApiResponse::error_empty(self.error_code(), self.message());
        match self {
            Self::TooLarge(_) => HttpResponse::PayloadTooLarge().json(body),
            _ => HttpResponse::BadRequest().json(body),
        }
    }
}

/// 上传的文件内容
struct Upload {
    data: Vec<u8>,
    media_type: String,
    file_name: String,
}

pub async fn import_grades(
    service: &GradebookService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.import_config();

    let upload = match read_upload(&mut payload, config.max_upload_size).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("成绩文件上传被拒绝: {}", e.message());
            return Ok(e.into_response());
        }
    };

    let Some(storage) = service.get_storage(request) else {
        error!("成绩册存储未初始化");
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::GradebookUnavailable,
                "成绩册不可用",
            )),
        );
    };

    let (assignments, matrix) = match load_gradebook(&storage).await {
        Ok(data) => data,
        Err(e) => {
            error!("读取成绩册失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::GradebookUnavailable,
                    format!("读取成绩册失败: {}", e.message()),
                )),
            );
        }
    };

    let mut session = match GradeImportSession::new(&assignments, &matrix, config) {
        Ok(session) => session,
        Err(e) => {
            error!("成绩册学号冲突: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ImportStudentConflict,
                    e.message(),
                )),
            );
        }
    };

    if let Err(e) = session.submit(upload.data.as_slice(), &upload.media_type) {
        error!("处理上传文件 {} 失败: {}", upload.file_name, e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "处理上传文件失败",
            )),
        );
    }

    match session.into_outcome() {
        Some(ImportOutcome::Ready(report)) => {
            info!(
                "成绩文件 {} 对比完成: {} 条结果, {} 条待确认",
                upload.file_name,
                report.items.len(),
                report.actionable_count()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GradeImportResponse::from(report),
                "成绩文件解析完成，请确认变更",
            )))
        }
        Some(ImportOutcome::Empty) => Ok(HttpResponse::Ok().json(ApiResponse::error_empty(
            ErrorCode::ImportNothingToImport,
            "上传的文件中没有可导入的成绩",
        ))),
        Some(ImportOutcome::ParseError(failure)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileParseFailed,
                format!("无法解析上传的文件: {failure}"),
            )))
        }
        None => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "导入流程未完成",
            )),
        ),
    }
}

async fn read_upload(payload: &mut Multipart, max_size: usize) -> Result<Upload, UploadError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| UploadError::Read(e.to_string()))?;

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if upload.is_some() {
            return Err(UploadError::Multiple);
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let media_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| UploadError::Read(e.to_string()))?
        {
            if data.len() + chunk.len() > max_size {
                return Err(UploadError::TooLarge(max_size));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(Upload {
            data,
            media_type,
            file_name,
        });
    }

    upload.ok_or(UploadError::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportConfig, ImportConfig};
    use crate::storage::{GradebookStorage, MemoryGradebookStorage};
    use actix_web::{App, test, web};
    use serde_json::Value;
    use std::sync::Arc;

    const BOUNDARY: &str = "gradebook-test-boundary";

    const SNAPSHOT: &str = r#"{
        "assignments": [{ "id": 1, "name": "Quiz 1", "points": 10.0, "sort_order": 1 }],
        "students": [{
            "student_eid": "jdoe",
            "student_uuid": "6f1c2b9e-3a54-4d8e-9c1a-0b7e5d2f4a10",
            "first_name": "John",
            "last_name": "Doe",
            "grades": { "1": { "grade": "8", "comment": "good" } }
        }]
    }"#;

    async fn handler(
        req: HttpRequest,
        payload: Multipart,
        service: web::Data<GradebookService>,
    ) -> ActixResult<HttpResponse> {
        service.import_grades(payload, &req).await
    }

    fn service(snapshot: &str, max_upload_size: usize) -> GradebookService {
        let storage: Arc<dyn GradebookStorage> =
            Arc::new(MemoryGradebookStorage::from_json(snapshot.as_bytes()).unwrap());
        GradebookService::with_storage(storage).with_config(
            ImportConfig {
                max_upload_size,
                ..ImportConfig::default()
            },
            ExportConfig::default(),
        )
    }

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"grades\"\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post(service: GradebookService, body: Vec<u8>) -> (u16, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .route("/import", web::post().to(handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/import")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_import_modified_grade() {
        let csv: &[u8] =
            b"Student ID,Student Name,Quiz 1 [10],*/ Quiz 1 Comments */\njdoe,Doe John,9,great\n";
        let (status, body) = post(
            service(SNAPSHOT, 1024 * 1024),
            multipart_body(&[("file", "text/csv", csv)]),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["summary"]["modified"], 1);
        assert_eq!(body["data"]["items"][0]["status"], "modified");
        assert_eq!(body["data"]["items"][0]["old_grade"], "8");
        assert_eq!(body["data"]["items"][0]["new_grade"], "9");
    }

    #[actix_web::test]
    async fn test_unrecognized_type_is_bad_request() {
        let (status, body) = post(
            service(SNAPSHOT, 1024 * 1024),
            multipart_body(&[("file", "application/pdf", &b"%PDF-1.4"[..])]),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["code"], ErrorCode::ImportFileParseFailed as i32);
    }

    #[actix_web::test]
    async fn test_header_only_is_nothing_to_import() {
        let (status, body) = post(
            service(SNAPSHOT, 1024 * 1024),
            multipart_body(&[("file", "text/csv", &b"Student ID,Student Name,Quiz 1 [10]\n"[..])]),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["code"], ErrorCode::ImportNothingToImport as i32);
    }

    #[actix_web::test]
    async fn test_missing_and_multiple_files() {
        let (status, body) = post(
            service(SNAPSHOT, 1024 * 1024),
            multipart_body(&[("note", "text/plain", &b"hello"[..])]),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], ErrorCode::FileNotFound as i32);

        let csv: &[u8] = b"Student ID,Student Name\n";
        let (status, body) = post(
            service(SNAPSHOT, 1024 * 1024),
            multipart_body(&[("file", "text/csv", csv), ("file", "text/csv", csv)]),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], ErrorCode::MultifileUploadNotAllowed as i32);
    }

    #[actix_web::test]
    async fn test_upload_size_limit() {
        let csv: &[u8] = b"Student ID,Student Name,Quiz 1 [10]\njdoe,Doe John,9\n";
        let (status, body) = post(
            service(SNAPSHOT, 16),
            multipart_body(&[("file", "text/csv", csv)]),
        )
        .await;

        assert_eq!(status, 413);
        assert_eq!(body["code"], ErrorCode::FileSizeExceeded as i32);
    }

    #[actix_web::test]
    async fn test_duplicate_eid_in_gradebook() {
        let snapshot = r#"{
            "assignments": [{ "id": 1, "name": "Quiz 1", "points": 10.0, "sort_order": 1 }],
            "students": [
                { "student_eid": "jdoe", "student_uuid": "6f1c2b9e-3a54-4d8e-9c1a-0b7e5d2f4a10",
                  "first_name": "John", "last_name": "Doe" },
                { "student_eid": "jdoe", "student_uuid": "0d4e8a77-91b2-4c3f-8e6a-5f2d1c9b7e33",
                  "first_name": "Jane", "last_name": "Doe" }
            ]
        }"#;
        let csv: &[u8] = b"Student ID,Student Name,Quiz 1 [10]\njdoe,Doe John,9\n";
        let (status, body) = post(
            service(snapshot, 1024 * 1024),
            multipart_body(&[("file", "text/csv", csv)]),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(body["code"], ErrorCode::ImportStudentConflict as i32);
    }
}
