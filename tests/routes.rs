use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use scena_crm::mailer::LettreMailer;
use scena_crm::models::config::ServerConfig;
use scena_crm::routes::email::send_email;
use scena_crm::routes::main::health;

const SECRET: &str = "test-relay-secret";

fn test_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        relay_secret: SECRET.to_string(),
        smtp_timeout_secs: 5,
    }
}

macro_rules! relay_app {
    () => {
        test::init_service(
            App::new()
                .service(health)
                .service(web::scope("/api").service(send_email))
                .app_data(web::Data::new(LettreMailer::new(Duration::from_secs(5))))
                .app_data(web::Data::new(test_config())),
        )
        .await
    };
}

fn send_body() -> Value {
    json!({
        "smtpConfig": {
            "host": "127.0.0.1",
            "port": 1,
            "username": "crm",
            "password": "secret",
            "from": "offers@example.com",
            "fromName": "Offers"
        },
        "to": "client@example.com",
        "subject": "Your offer",
        "body": "<p>Offer attached</p>"
    })
}

#[actix_web::test]
async fn health_answers_without_auth() {
    let app = relay_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "smtp-relay-worker");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn missing_authorization_header_is_rejected() {
    let app = relay_app!();

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .set_json(send_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing authorization header");
}

#[actix_web::test]
async fn non_bearer_authorization_is_rejected() {
    let app = relay_app!();

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, format!("Token {SECRET}")))
        .set_json(send_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("Bearer"))
    );
}

#[actix_web::test]
async fn wrong_secret_is_rejected() {
    let app = relay_app!();

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, "Bearer wrongsecret"))
        .set_json(send_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid relay secret");
}

#[actix_web::test]
async fn missing_required_fields_are_listed() {
    let app = relay_app!();

    let mut body = send_body();
    body.as_object_mut().unwrap().remove("to");
    body.as_object_mut().unwrap().remove("subject");

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, format!("Bearer {SECRET}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required fields: to, subject");
}

#[actix_web::test]
async fn structurally_invalid_smtp_config_is_a_bad_request() {
    let app = relay_app!();

    let mut body = send_body();
    body["smtpConfig"]["port"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, format!("Bearer {SECRET}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Invalid SMTP configuration"))
    );
}

#[actix_web::test]
async fn undecodable_attachment_is_a_bad_request() {
    let app = relay_app!();

    let mut body = send_body();
    body["attachments"] = json!([{
        "filename": "offer.pdf",
        "content": "not base64!!!"
    }]);

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, format!("Bearer {SECRET}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Invalid attachment"))
    );
}

#[actix_web::test]
async fn unreachable_smtp_server_is_an_internal_error() {
    let app = relay_app!();

    // Port 1 on loopback refuses the connection; verification fails before
    // any send is attempted.
    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .insert_header((header::AUTHORIZATION, format!("Bearer {SECRET}")))
        .set_json(send_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("SMTP connection failed"))
    );
}
