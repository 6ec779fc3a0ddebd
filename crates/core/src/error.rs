#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user id is empty")]
    EmptyUserId,

    #[error("user id must be a valid UUID")]
    InvalidUserId,

    #[error("token is invalid")]
    InvalidToken,

    #[error("token is expired")]
    TokenExpired,

    #[error("refresh session was not found")]
    SessionNotFound,

    #[error("refresh session is invalid")]
    InvalidSession,

    #[error("user was not found")]
    UserNotFound,

    #[error("failed to build token pair: {0}")]
    TokenCreation(String),

    #[error("credential hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
