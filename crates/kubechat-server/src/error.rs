use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kubechat_core::KubechatError;

/// Sentinel carrying an explicit 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

fn status_for(e: &KubechatError) -> StatusCode {
    match e {
        KubechatError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        KubechatError::UnknownCommand(_) => StatusCode::BAD_REQUEST,
        KubechatError::ResourceNotFound(_) | KubechatError::ConfigNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        KubechatError::VerbNotSupported { .. } | KubechatError::VerbDropdownEmpty => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        KubechatError::Forbidden(_) => StatusCode::FORBIDDEN,
        KubechatError::Execution { .. } | KubechatError::Kube(_) => StatusCode::BAD_GATEWAY,
        KubechatError::InvalidPattern { .. }
        | KubechatError::Io(_)
        | KubechatError::Yaml(_)
        | KubechatError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<BadRequestError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if let Some(e) = self.0.downcast_ref::<KubechatError>() {
            status_for(e)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
