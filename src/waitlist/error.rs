use strum_macros::AsRefStr;

use crate::{email_client, nurture_client, utils::error_chain_fmt};

use super::types::DataParsingError;

pub type WaitlistResult<T> = core::result::Result<T, WaitlistError>;
pub type CollaboratorResult<T> = core::result::Result<T, CollaboratorError>;

#[derive(AsRefStr, thiserror::Error)]
pub enum WaitlistError {
    #[error("request body is not valid json")]
    MalformedRequest(#[source] serde_json::Error),
    #[error("invalid email")]
    InvalidEmail(#[from] DataParsingError),
    #[error("the delivery collaborator is not configured")]
    Configuration(#[source] CollaboratorError),
    #[error("failed to deliver the confirmation email")]
    DeliveryFailed(#[source] CollaboratorError),
}

impl std::fmt::Debug for WaitlistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("missing credential, set the '{0}' environment variable")]
    MissingCredential(&'static str),

    #[error("templating error: {0}")]
    Tera(#[from] tera::Error),
    #[error("email client error: {0}")]
    EmailClient(#[from] email_client::Error),
    #[error("nurture client error: {0}")]
    NurtureClient(#[from] nurture_client::Error),
}
