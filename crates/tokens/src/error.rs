//! Token errors

use commlink_common::Error;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign access token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid access token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        Error::Internal(err.to_string())
    }
}
