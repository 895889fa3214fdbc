use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderName, Method, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::{
    web::{midware, routes::routes, REQUEST_ID_HEADER},
    App, Result,
};

/// Serves the app until `axum::serve` returns.
///
/// Layers, outermost first: request id, tracing, request id propagation, CORS and the
/// response mapper. Responses travel the stack bottom-up, so anything the mapper builds
/// still gets the CORS headers and the request id.
pub async fn serve(app: App) -> Result<()> {
    let App {
        app_state,
        listener,
        cors_origin,
    } = app;
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_request(|req: &Request<Body>, _: &Span| tracing::info!("START @ {}", req.uri()))
        .on_response(log_response);

    let app = Router::new().merge(routes(app_state)).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            .layer(trace)
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(cors)
            .layer(middleware::map_response(midware::response_mapper)),
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn request_span(req: &Request<Body>) -> Span {
    let req_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok());

    tracing::error_span!(
        "request",
        id = req_id,
        method = %req.method(),
        path = req.uri().path()
    )
}

/// Only server errors are logged at `error`, client mistakes are expected traffic.
fn log_response(res: &Response<Body>, latency: Duration, _: &Span) {
    let status = res.status();
    if status.is_server_error() {
        tracing::error!(%status, ?latency, "END");
    } else {
        tracing::info!(%status, ?latency, "END");
    }
}
