use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::waitlist::WaitlistError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("waitlist error: {0}")]
    Waitlist(#[from] WaitlistError),
    #[error("failed to read the request body: {0}")]
    Body(#[from] BytesRejection),
}

impl Error {
    /// Maps the internal error to what the client is allowed to see.
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Waitlist(er) => match er {
                WaitlistError::MalformedRequest(_) => {
                    (StatusCode::BAD_REQUEST, ClientError::MalformedRequest)
                }
                WaitlistError::InvalidEmail(reason) => (
                    StatusCode::BAD_REQUEST,
                    ClientError::InvalidInput(reason.to_string()),
                ),
                WaitlistError::Configuration(_) | WaitlistError::DeliveryFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError)
                }
            },
            Error::Body(rejection) => match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    (StatusCode::PAYLOAD_TOO_LARGE, ClientError::PayloadTooLarge)
                }
                status => (status, ClientError::MalformedRequest),
            },
        }
    }

    /// The variant name of the innermost error we know about, for log lines.
    pub fn kind(&self) -> &str {
        match self {
            Error::Waitlist(er) => er.as_ref(),
            Error::Body(_) => self.as_ref(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The `Display` output ends up in the response body.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Malformed request")]
    MalformedRequest,
    #[display("{_0}")]
    InvalidInput(String),
    #[display("Request body is too large")]
    PayloadTooLarge,
    #[display("Something went wrong. Please try again later.")]
    ServiceError,
}
