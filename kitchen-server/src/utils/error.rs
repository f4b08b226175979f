//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - HTTP 层错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误映射
//!
//! | 领域错误 | HTTP | 说明 |
//! |----------|------|------|
//! | InvalidTransition | 422 | 状态机拒绝，消息含当前状态 |
//! | NotFound | 404 | 资源不存在 |
//! | VersionConflict | 409 | 重试后仍冲突 |
//! | Validation | 400 | 参数错误 |
//! | Persistence | 500 | 不透明，细节只进日志 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::KitchenError;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// HTTP 层错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Business rule violation: {0}")]
    /// 状态机拒绝 (422)
    BusinessRule(String),

    #[error("Concurrent modification: {0}")]
    /// 乐观锁冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            Self::BusinessRule(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0005"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "E0004"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9002"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9001"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // 5xx: 细节只进日志，对外不透明
        let message = if status.is_server_error() {
            error!(error = %self, code = code, "Internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<KitchenError> for AppError {
    fn from(err: KitchenError) -> Self {
        match err {
            KitchenError::InvalidTransition { .. } => Self::BusinessRule(err.to_string()),
            KitchenError::NotFound(msg) => Self::NotFound(msg),
            KitchenError::VersionConflict(msg) => Self::Conflict(msg),
            KitchenError::Validation(msg) => Self::Validation(msg),
            KitchenError::Persistence(msg) => Self::Database(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => Self::NotFound(msg),
            RepoError::Duplicate(msg) => Self::Validation(msg),
            RepoError::Validation(msg) => Self::Validation(msg),
            RepoError::Database(msg) => Self::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let err: AppError = KitchenError::invalid_transition("READY", "pause").into();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);

        let err: AppError = KitchenError::VersionConflict("timer".into()).into();
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    }

    #[test]
    fn persistence_maps_to_opaque_500() {
        let err: AppError = KitchenError::Persistence("rocksdb: io".into()).into();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
