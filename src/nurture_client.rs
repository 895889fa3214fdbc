//! HTTP client for the marketing (nurture) contacts API.
//! Only constructed when `nurture_config.enabled` is set.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::waitlist::ValidEmail;

#[derive(Debug)]
pub struct NurtureClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    auth_token: Option<SecretString>,
}

impl NurtureClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        auth_token: Option<SecretString>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;
        let auth_token = auth_token.filter(|t| !t.expose_secret().trim().is_empty());

        Ok(NurtureClient {
            http_client,
            url,
            auth_token,
        })
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Registers a contact for the drip campaign.
    pub async fn add_contact(&self, email: &ValidEmail) -> Result<()> {
        let auth_token = self.auth_token.as_ref().ok_or(Error::MissingAuthToken)?;
        let url = self
            .url
            .join("contacts")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let contact = Contact {
            email: email.as_ref(),
            unsubscribed: false,
        };

        self.http_client
            .post(url)
            .bearer_auth(auth_token.expose_secret())
            .json(&contact)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    unsubscribed: bool,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse url: {0}")]
    UrlParsing(String),
    #[error("no auth token configured")]
    MissingAuthToken,
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
