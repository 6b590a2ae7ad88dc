use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// 查询参数解析失败时返回统一格式的错误响应
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("查询参数解析失败: {} {}: {}", req.method(), req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("查询参数无效: {err}"),
    ));
    InternalError::from_response(err, response).into()
}
