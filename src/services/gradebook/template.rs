//! 成绩模板下载

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header, web};
use futures_util::{Stream, stream};
use std::fs::File;
use std::io::Read;
use tracing::{debug, error};

use super::{GradebookService, load_gradebook};
use crate::importer::{TemplateArtifact, export_template};
use crate::models::gradebook::requests::TemplateDownloadParams;
use crate::models::{ApiResponse, ErrorCode};

const CHUNK_SIZE: usize = 16 * 1024;

pub async fn download_template(
    service: &GradebookService,
    params: TemplateDownloadParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
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

    let artifact = match export_template(
        &assignments,
        &matrix,
        params.include_grades,
        params.format,
        service.export_config(),
    ) {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("生成成绩模板失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::TemplateExportFailed,
                    "生成成绩模板失败",
                )),
            );
        }
    };

    let file = match artifact.reopen() {
        Ok(file) => file,
        Err(e) => {
            error!("打开模板临时文件失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::TemplateExportFailed,
                    "生成成绩模板失败",
                )),
            );
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, artifact.content_type()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.download_name()),
        ))
        .streaming(artifact_stream(file, artifact)))
}

/// 分块发送模板文件，发送结束或连接断开时临时文件随 `TemplateArtifact` 一起删除
fn artifact_stream(
    file: File,
    artifact: TemplateArtifact,
) -> impl Stream<Item = Result<web::Bytes, std::io::Error>> {
    stream::unfold(Some((file, artifact)), |state| async move {
        let (mut file, artifact) = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];

        match file.read(&mut buf) {
            Ok(0) => {
                debug!("模板发送完成: {}", artifact.path().display());
                None
            }
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(web::Bytes::from(buf)), Some((file, artifact))))
            }
            Err(e) => {
                error!("读取模板临时文件失败: {}", e);
                Some((Err(e), None))
            }
        }
    })
}
