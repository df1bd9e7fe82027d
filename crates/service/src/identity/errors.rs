use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl IdentityError {
    /// Stable numeric code for logs.
    pub fn code(&self) -> u16 {
        match self {
            IdentityError::Validation(_) => 1001,
            IdentityError::Conflict => 1002,
            IdentityError::NotFound => 1003,
            IdentityError::InvalidCredentials => 1004,
            IdentityError::InvalidToken(_) => 1005,
            IdentityError::HashError(_) => 1101,
            IdentityError::TokenError(_) => 1102,
            IdentityError::Unavailable(_) => 1201,
            IdentityError::Repository(_) => 1200,
        }
    }

    /// True for failures that mean "the caller is not authenticated".
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, IdentityError::InvalidCredentials | IdentityError::InvalidToken(_) | IdentityError::NotFound)
    }
}
