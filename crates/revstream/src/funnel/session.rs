use super::domain::{AccountIdentity, SessionId, SessionRecord, SignInRequest};

/// Storage abstraction so the onboarding service can be exercised in
/// isolation. Session state is explicitly passed through this seam rather
/// than read from any ambient singleton.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionStoreError>;
    fn update(&self, record: SessionRecord) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

/// Error enumeration for session store failures.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Identity verification seam. The production wiring may plug in a real
/// provider; the API binary ships a clearly delineated simulated one behind
/// this same interface.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, request: &SignInRequest) -> Result<AccountIdentity, IdentityError>;
}

/// Error enumeration for identity verification failures.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
