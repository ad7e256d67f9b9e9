use util_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("service not registered: {0}")]
    ServiceNotRegistered(&'static str),

    #[error("service already registered: {service}")]
    AlreadyRegistered { service: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("scope disposed")]
    ScopeDisposed,
}
