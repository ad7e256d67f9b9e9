//! 领域层统一错误定义
//!
//! 聚焦序列化、乐观并发与状态校验等最小必要集合。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },

    // --- 仓储/持久化 ---
    #[error("concurrency conflict: type={entity_type}, id={entity_id}")]
    Concurrency {
        entity_type: String,
        entity_id: String,
    },
    #[error("duplicate key: type={entity_type}, id={entity_id}")]
    DuplicateKey {
        entity_type: String,
        entity_id: String,
    },
    #[error("entity already tracked: type={entity_type}, id={entity_id}")]
    AlreadyTracked {
        entity_type: String,
        entity_id: String,
    },

    // --- 状态 ---
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}

impl DomainError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        DomainError::InvalidState {
            reason: reason.into(),
        }
    }

    /// 是否为乐观并发冲突（调用方需重新加载后重试）
    pub fn is_concurrency(&self) -> bool {
        matches!(self, DomainError::Concurrency { .. })
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
