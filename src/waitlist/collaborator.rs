//! External services a waitlist submission gets forwarded to.

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::{CREDENTIAL_ENV_VAR, NURTURE_CREDENTIAL_ENV_VAR},
    email_client::EmailClient,
    nurture_client::NurtureClient,
    templ_manager::TemplateManager,
};

use super::{CollaboratorError, CollaboratorResult, ValidEmail};

pub const CONFIRMATION_SUBJECT: &str = "You're on the waitlist!";

/// Something that accepts a waitlist contact.
#[async_trait]
pub trait Collaborator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Checked before every submission, without touching the network.
    fn check_config(&self) -> CollaboratorResult<()> {
        Ok(())
    }

    async fn send(&self, contact: &ValidEmail) -> CollaboratorResult<()>;
}

// ###################################
// ->   DELIVERY
// ###################################
/// Sends the confirmation email through the transactional email provider.
#[derive(Debug)]
pub struct ConfirmationMailer {
    email_client: EmailClient,
    templ_mgr: TemplateManager,
}

impl ConfirmationMailer {
    pub fn new(email_client: EmailClient, templ_mgr: TemplateManager) -> Self {
        Self {
            email_client,
            templ_mgr,
        }
    }
}

#[async_trait]
impl Collaborator for ConfirmationMailer {
    fn name(&self) -> &'static str {
        "confirmation mailer"
    }

    fn check_config(&self) -> CollaboratorResult<()> {
        if self.email_client.has_auth_token() {
            Ok(())
        } else {
            Err(CollaboratorError::MissingCredential(CREDENTIAL_ENV_VAR))
        }
    }

    #[tracing::instrument(name = "Sending confirmation email", skip_all)]
    async fn send(&self, contact: &ValidEmail) -> CollaboratorResult<()> {
        let email = self.templ_mgr.render_confirmation(contact.as_ref())?;

        self.email_client
            .send_email(
                contact,
                CONFIRMATION_SUBJECT,
                email.html.as_str(),
                email.text.as_str(),
            )
            .await?;

        debug!("confirmation email accepted by the provider");
        Ok(())
    }
}

// ###################################
// ->   NURTURE
// ###################################
/// Registers the contact with the marketing provider.
#[derive(Debug)]
pub struct NurtureCollaborator {
    client: NurtureClient,
}

impl NurtureCollaborator {
    pub fn new(client: NurtureClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collaborator for NurtureCollaborator {
    fn name(&self) -> &'static str {
        "nurture"
    }

    fn check_config(&self) -> CollaboratorResult<()> {
        if self.client.has_auth_token() {
            Ok(())
        } else {
            Err(CollaboratorError::MissingCredential(
                NURTURE_CREDENTIAL_ENV_VAR,
            ))
        }
    }

    #[tracing::instrument(name = "Registering nurture contact", skip_all)]
    async fn send(&self, contact: &ValidEmail) -> CollaboratorResult<()> {
        self.client.add_contact(contact).await?;
        Ok(())
    }
}
