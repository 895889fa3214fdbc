use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::Serialize;

use crate::{
    waitlist::Confirmation,
    web::{self, WebResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub success: bool,
    pub message: &'static str,
}

impl From<Confirmation> for WaitlistResponse {
    fn from(confirmation: Confirmation) -> Self {
        Self {
            success: true,
            message: confirmation.message,
        }
    }
}

/// The body is read as raw bytes, so a missing or wrong `Content-Type` still gets parsed
/// and malformed bodies get the same JSON error shape as everything else.
/// Body rejections (e.g. over the size limit) are mapped the same way.
#[tracing::instrument(name = "Adding a waitlist submission", skip_all)]
pub async fn waitlist(
    State(app_state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> WebResult<Json<WaitlistResponse>> {
    let body = body?;
    let confirmation = app_state
        .waitlist
        .submit(&body)
        .await
        .map_err(web::Error::Waitlist)?;

    Ok(Json(confirmation.into()))
}
