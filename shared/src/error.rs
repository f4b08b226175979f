//! Domain error taxonomy for the kitchen operations core
//!
//! Four kinds of failure, surfaced differently to callers:
//!
//! | 分类 | 说明 | 调用方处理 |
//! |------|------|-----------|
//! | InvalidTransition | 状态机拒绝操作 | 客户端错误，不重试 |
//! | NotFound | 订单/计时器/工位不存在 | 404 |
//! | VersionConflict | 乐观锁版本过期 | 重新读取后重试 |
//! | Validation | 参数校验失败 | 客户端错误 |
//! | Persistence | 存储层故障 | 不透明 500，不泄露内部细节 |

use thiserror::Error;

/// Unified domain error for kitchen operations
#[derive(Debug, Error)]
pub enum KitchenError {
    /// Operation attempted from a state that forbids it
    #[error("Invalid transition: cannot {operation} from {from}")]
    InvalidTransition {
        /// Current state, rendered for the caller
        from: String,
        /// The requested operation
        operation: &'static str,
    },

    /// Referenced order / timer / workstation absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stale version on a version-checked update; re-read and retry
    #[error("Concurrent modification: {0}")]
    VersionConflict(String),

    /// Request payload rejected before touching any state
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Lower-layer storage failure, distinct from the domain kinds
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl KitchenError {
    /// Convenience constructor for invalid transitions
    pub fn invalid_transition(from: impl std::fmt::Display, operation: &'static str) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            operation,
        }
    }

    /// Stable error code (前端负责本地化)
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "K1001",
            Self::NotFound(_) => "K1002",
            Self::VersionConflict(_) => "K1003",
            Self::Validation(_) => "K1004",
            Self::Persistence(_) => "K9001",
        }
    }

    /// True for errors the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

/// Result type for kitchen domain operations
pub type KitchenResult<T> = Result<T, KitchenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_state_and_operation() {
        let err = KitchenError::invalid_transition("READY", "pause");
        assert_eq!(err.to_string(), "Invalid transition: cannot pause from READY");
        assert!(err.is_client_error());
    }

    #[test]
    fn persistence_is_not_a_client_error() {
        let err = KitchenError::Persistence("disk on fire".into());
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "K9001");
    }
}
