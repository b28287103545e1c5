//! Integration tests for the HTTP authentication surface.
//!
//! These run against an in-process App without a database: service-key
//! verification and missing-credential rejection both happen before any
//! query, so the paths under test never touch PostgreSQL.

use actix_web::{App, test, web};

use dpr_server_lib::auth::ServiceKey;
use dpr_server_lib::config::{SERVICE_KEY_HEADER, SESSION_TOKEN_HEADER};
use dpr_server_lib::{api, middleware};

const TEST_SERVICE_KEY: &str = "test-service-key";

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .wrap(middleware::RequestLogger)
                .app_data(web::Data::new(ServiceKey::new(Some(
                    TEST_SERVICE_KEY.to_string(),
                ))))
                .service(
                    web::scope("/api/v1")
                        .configure(api::configure_health_routes)
                        .configure(api::configure_auth_routes),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_requires_no_credentials() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "dpr-server");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[actix_web::test]
async fn test_me_without_credentials_is_401() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains(SESSION_TOKEN_HEADER)
    );
}

#[actix_web::test]
async fn test_me_with_service_key_is_service_identity() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((SERVICE_KEY_HEADER, TEST_SERVICE_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], "service");
}

#[actix_web::test]
async fn test_me_with_wrong_service_key_is_401() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((SERVICE_KEY_HEADER, "not-the-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Invalid service key");
}

#[actix_web::test]
async fn test_service_key_beats_session_token_when_both_present() {
    // The service key is checked first and never touches the database;
    // a stray session token alongside it must not change the outcome.
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((SERVICE_KEY_HEADER, TEST_SERVICE_KEY))
        .insert_header((SESSION_TOKEN_HEADER, "dpr_st_deadbeef"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], "service");
}
