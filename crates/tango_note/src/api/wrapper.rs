use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, warn};

use crate::api::error::InnerApiError;

/// 请求处理错误的统一出口
///
/// 内部一律用 anyhow 传播，到达 axum 边界时在这里翻译成状态码和错误页
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<InnerApiError>() {
            Some(InnerApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(InnerApiError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("请求处理失败: {:?}", self.0);
        } else {
            warn!("请求被拒绝: {}", self.0);
        }

        let message = html_escape::encode_text(&self.0.to_string()).into_owned();
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"ja\">\n<head><meta charset=\"utf-8\"><title>エラー</title></head>\n\
             <body><h1>{}</h1><p>{}</p><p><a href=\"/\">トップに戻る</a></p></body>\n</html>",
            status.as_u16(),
            message
        );
        (status, Html(body)).into_response()
    }
}
