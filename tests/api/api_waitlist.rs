use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_partial_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY};

const SERVICE_ERROR: &str = "Something went wrong. Please try again later.";

/// Every mount of this expects the email provider to never be called.
fn no_delivery() -> Mock {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
}

#[tokio::test]
async fn api_waitlist_valid_email_returns_200() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Added to waitlist" })
    );

    Ok(())
}

#[tokio::test]
async fn api_waitlist_sends_one_confirmation_email_to_the_recipient() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_partial_json(json!({
            "from": "waitlist@example.com",
            "to": ["le_guin@example.com"],
            "subject": "You're on the waitlist!",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "le_guin@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_invalid_email_returns_400_without_delivery() -> Result<()> {
    let app = TestApp::spawn().await?;
    no_delivery().mount(&app.email_server).await;

    let res = app.api_waitlist_post(&json!({ "email": "bob" })).await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": false, "error": "Invalid email" }));

    Ok(())
}

#[tokio::test]
async fn api_waitlist_returns_400_when_email_is_missing_or_invalid() -> Result<()> {
    let app = TestApp::spawn().await?;
    no_delivery().mount(&app.email_server).await;

    let cases = [
        (json!({}), "Empty json"),
        (json!({ "name": "Bob" }), "Missing email"),
        (json!({ "email": null }), "Null email"),
        (json!({ "email": 42 }), "Number email"),
        (json!({ "email": ["alice@example.com"] }), "Array email"),
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "not-an-email" }), "No at sign"),
        (json!({ "email": "a@b" }), "No top level domain"),
        (json!(["alice@example.com"]), "Not an object"),
    ];

    for (body, description) in cases {
        let res = app.api_waitlist_post(&body).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST when the payload was: {description}."
        );

        let body: Value = res.json().await?;
        assert_eq!(body["success"], false, "{description}");
        assert!(body["error"].is_string(), "{description}");
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_malformed_body_returns_400() -> Result<()> {
    let app = TestApp::spawn().await?;
    no_delivery().mount(&app.email_server).await;

    for raw in ["email=alice@example.com", "{\"email\": ", ""] {
        let res = app.api_waitlist_post_raw(raw).await?;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {raw:?}");
        let body: Value = res.json().await?;
        assert_eq!(
            body,
            json!({ "success": false, "error": "Malformed request" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_json_without_content_type_is_accepted() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .api_waitlist_post_raw(r#"{"email":"alice@example.com"}"#)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_provider_error_returns_500_without_leaking_it() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("API key is invalid: re_leaked_key_detail"),
        )
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = res.text().await?;
    assert!(!text.contains("re_leaked_key_detail"));
    assert!(!text.contains("401"));
    let body: Value = serde_json::from_str(&text)?;
    assert_eq!(body, json!({ "success": false, "error": SERVICE_ERROR }));

    Ok(())
}

#[tokio::test]
async fn api_waitlist_provider_timeout_returns_500() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(10)))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_missing_credential_fails_every_submission() -> Result<()> {
    let app = TestApp::spawn_with(|config| config.email_config.auth_token = None).await?;
    no_delivery().mount(&app.email_server).await;

    let cases = [
        json!({ "email": "alice@example.com" }),
        json!({ "email": "bob" }),
        json!({}),
    ];

    for body in cases {
        let res = app.api_waitlist_post(&body).await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{body}");

        let text = res.text().await?;
        assert!(!text.contains("RESEND_API_KEY"));
        let resp_body: Value = serde_json::from_str(&text)?;
        assert_eq!(
            resp_body,
            json!({ "success": false, "error": SERVICE_ERROR })
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_same_email_twice_sends_two_emails() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    for _ in 0..2 {
        let res = app
            .api_waitlist_post(&json!({ "email": "alice@example.com" }))
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_nurture_disabled_by_default() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
    no_delivery().mount(&app.nurture_server).await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_nurture_enabled_registers_the_contact() -> Result<()> {
    let app = TestApp::spawn_with(|config| config.nurture_config.enabled = true).await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/contacts"))
        .and(method("POST"))
        .and(body_partial_json(json!({ "email": "alice@example.com" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.nurture_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_nurture_failure_still_returns_200() -> Result<()> {
    let app = TestApp::spawn_with(|config| config.nurture_config.enabled = true).await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.nurture_server)
        .await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_nurture_without_credential_is_skipped() -> Result<()> {
    let app = TestApp::spawn_with(|config| {
        config.nurture_config.enabled = true;
        config.nurture_config.auth_token = None;
    })
    .await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    no_delivery().mount(&app.nurture_server).await;

    let res = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_oversized_body_returns_413_json() -> Result<()> {
    let app = TestApp::spawn().await?;
    no_delivery().mount(&app.email_server).await;

    let local_part = "a".repeat(32 * 1024);
    let res = app
        .http_client
        .post(app.url("/api/waitlist"))
        .header("Content-Type", "application/json")
        .body(format!(r#"{{"email":"{local_part}@example.com"}}"#))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Request body is too large" })
    );

    Ok(())
}

#[tokio::test]
async fn api_waitlist_responses_carry_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    let ok = app
        .api_waitlist_post(&json!({ "email": "alice@example.com" }))
        .await?;
    let err = app.api_waitlist_post(&json!({ "email": "bob" })).await?;

    for res in [ok, err] {
        let req_id = res
            .headers()
            .get("x-request-id")
            .and_then(|id| id.to_str().ok())
            .unwrap_or_default();
        assert!(uuid::Uuid::parse_str(req_id).is_ok(), "got: {req_id:?}");
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_get_is_not_allowed() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/api/waitlist")).send().await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
