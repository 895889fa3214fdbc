pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tower_http::cors::AllowOrigin;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, CREDENTIAL_ENV_VAR, NURTURE_CREDENTIAL_ENV_VAR},
    templ_manager::TemplateManager,
    waitlist::{Collaborator, ConfirmationMailer, NurtureCollaborator, WaitlistService},
    EmailClient, NurtureClient, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    pub cors_origin: AllowOrigin,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, cors_origin: AllowOrigin) -> Self {
        App {
            app_state,
            listener,
            cors_origin,
        }
    }

    /// Builds all the collaborators from the config and binds the listener.
    /// A missing delivery credential is not an error here, every submission will fail instead.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let email_addr = config.email_config.valid_sender()?;
        let email_timeout = config.email_config.timeout();
        let email_client = EmailClient::new(
            &config.email_config.url,
            email_addr,
            config.email_config.auth_token,
            email_timeout,
        )?;
        if !email_client.has_auth_token() {
            warn!(
                "{:<20} - {CREDENTIAL_ENV_VAR} is not set, every waitlist submission will fail",
                "config"
            );
        }

        let tm = TemplateManager::init()?;
        let delivery: Arc<dyn Collaborator> = Arc::new(ConfirmationMailer::new(email_client, tm));

        let nurture_config = config.nurture_config;
        let nurture = if nurture_config.enabled {
            let nurture_timeout = nurture_config.timeout();
            let client = NurtureClient::new(
                &nurture_config.url,
                nurture_config.auth_token,
                nurture_timeout,
            )?;
            if client.has_auth_token() {
                info!("{:<20} - Nurture collaborator enabled", "config");
            } else {
                warn!(
                    "{:<20} - {NURTURE_CREDENTIAL_ENV_VAR} is not set, contacts will not be registered",
                    "config"
                );
            }
            Some(Arc::new(NurtureCollaborator::new(client)) as Arc<dyn Collaborator>)
        } else {
            None
        };

        let app_state = AppState::new(WaitlistService::new(delivery, nurture));
        let cors_origin = config.net_config.cors_origin()?;

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener, cors_origin);
        Ok(app)
    }
}

#[derive(Debug)]
pub struct InternalState {
    pub waitlist: WaitlistService,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Debug, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(waitlist: WaitlistService) -> Self {
        AppState(Arc::new(InternalState { waitlist }))
    }
}
