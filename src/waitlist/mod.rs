//! Waitlist intake: validates a submission and forwards it to the collaborators.
//!
//! Nothing is stored. Submitting the same address twice sends two confirmation emails.

mod collaborator;
mod error;
mod types;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

pub use collaborator::{
    Collaborator, ConfirmationMailer, NurtureCollaborator, CONFIRMATION_SUBJECT,
};
pub use error::{CollaboratorError, CollaboratorResult, WaitlistError, WaitlistResult};
pub use types::{DataParsingError, ValidEmail, WaitlistSubmission};

pub const CONFIRMATION_MESSAGE: &str = "Added to waitlist";

/// The result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: &'static str,
}

#[derive(Clone)]
pub struct WaitlistService {
    delivery: Arc<dyn Collaborator>,
    nurture: Option<Arc<dyn Collaborator>>,
}

impl WaitlistService {
    pub fn new(delivery: Arc<dyn Collaborator>, nurture: Option<Arc<dyn Collaborator>>) -> Self {
        Self { delivery, nurture }
    }

    /// Handles one raw request body.
    ///
    /// The delivery collaborator's configuration is checked first, so a missing credential
    /// fails every submission regardless of its content. Validation happens before any network
    /// call and exactly one delivery attempt is made for a valid address.
    /// A failing or unconfigured nurture collaborator is logged and otherwise ignored.
    pub async fn submit(&self, raw_payload: &[u8]) -> WaitlistResult<Confirmation> {
        self.delivery
            .check_config()
            .map_err(WaitlistError::Configuration)?;

        let payload: Value =
            serde_json::from_slice(raw_payload).map_err(WaitlistError::MalformedRequest)?;
        let WaitlistSubmission { email } = WaitlistSubmission::try_from(payload)?;

        self.delivery
            .send(&email)
            .await
            .map_err(WaitlistError::DeliveryFailed)?;
        info!(collaborator = self.delivery.name(), "confirmation delivered");

        if let Some(nurture) = &self.nurture {
            if let Err(er) = nurture.check_config() {
                warn!(
                    collaborator = nurture.name(),
                    error = %er,
                    "skipping contact registration"
                );
            } else if let Err(er) = nurture.send(&email).await {
                warn!(
                    collaborator = nurture.name(),
                    error = %er,
                    "failed to register waitlist contact"
                );
            }
        }

        Ok(Confirmation {
            message: CONFIRMATION_MESSAGE,
        })
    }
}

impl std::fmt::Debug for WaitlistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistService")
            .field("delivery", &self.delivery.name())
            .field("nurture", &self.nurture.as_ref().map(|n| n.name()))
            .finish()
    }
}
