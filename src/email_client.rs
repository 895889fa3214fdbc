//! HTTP client for a Resend-style transactional email API.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::waitlist::ValidEmail;

#[derive(Debug)]
pub struct EmailClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    pub sender: ValidEmail,
    auth_token: Option<SecretString>,
}

impl EmailClient {
    /// Blank tokens count as missing.
    pub fn new<S: AsRef<str>>(
        url: S,
        sender: ValidEmail,
        auth_token: Option<SecretString>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;
        let auth_token = auth_token.filter(|t| !t.expose_secret().trim().is_empty());

        Ok(EmailClient {
            http_client,
            url,
            sender,
            auth_token,
        })
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Sends a single email. Fails without touching the network if there is no auth token.
    pub async fn send_email<S>(
        &self,
        recipient: &ValidEmail,
        subject: S,
        html_content: S,
        text_content: S,
    ) -> Result<()>
    where
        S: AsRef<str>,
    {
        let auth_token = self.auth_token.as_ref().ok_or(Error::MissingAuthToken)?;
        let url = self
            .url
            .join("emails")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let email_content = EmailContent {
            from: self.sender.as_ref(),
            to: [recipient.as_ref()],
            subject: subject.as_ref(),
            html: html_content.as_ref(),
            text: text_content.as_ref(),
        };

        self.http_client
            .post(url)
            .bearer_auth(auth_token.expose_secret())
            .json(&email_content)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
pub struct EmailContent<'a> {
    pub from: &'a str,
    pub to: [&'a str; 1],
    pub subject: &'a str,
    pub html: &'a str,
    pub text: &'a str,
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
