use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use cipherlab_server::server::{configure, security_headers};
use common::encryption::TAMPER_SENTINEL;
use serde_json::{json, Value};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .wrap(security_headers())
                .service(web::scope("/api").configure(configure)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_status() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["schemes"], json!(["aes", "rsa", "pgp", "tls"]));
}

#[actix_web::test]
async fn test_schemes_listing() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/schemes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let schemes = body.as_array().unwrap();
    assert_eq!(schemes.len(), 4);
    let rsa = schemes.iter().find(|s| s["id"] == "rsa").unwrap();
    assert_eq!(rsa["strength"], 90);
    assert_eq!(rsa["confidential"], true);
    assert_eq!(rsa["simulated"], false);
}

#[actix_web::test]
async fn test_round_trip_every_method() {
    let app = app!();

    for method in ["aes", "rsa", "pgp", "tls"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/keys/{method}"))
            .to_request();
        let keys: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/encrypt/{method}"))
            .set_json(json!({ "message": "hello", "publicKey": keys["publicKey"] }))
            .to_request();
        let encrypted: Value = test::call_and_read_body_json(&app, req).await;
        assert!(encrypted["encryptedMessage"].is_string(), "{method}");

        let req = test::TestRequest::post()
            .uri(&format!("/api/decrypt/{method}"))
            .set_json(json!({
                "encryptedMessage": encrypted["encryptedMessage"],
                "privateKey": keys["privateKey"],
                "simulateTamper": false,
            }))
            .to_request();
        let decrypted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(decrypted["decryptedMessage"], "hello", "{method}");
    }
}

#[actix_web::test]
async fn test_aes_key_shapes() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/keys/aes").to_request();
    let keys: Value = test::call_and_read_body_json(&app, req).await;

    let public: Value = serde_json::from_str(keys["publicKey"].as_str().unwrap()).unwrap();
    let private: Value = serde_json::from_str(keys["privateKey"].as_str().unwrap()).unwrap();
    assert_eq!(public["iv"].as_str().unwrap().len(), 32);
    assert_eq!(private["key"].as_str().unwrap().len(), 64);
}

#[actix_web::test]
async fn test_pgp_armor_payload() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/encrypt/pgp")
        .set_json(json!({ "message": "test", "publicKey": "" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let armored = body["encryptedMessage"].as_str().unwrap();
    assert!(armored.starts_with("-----BEGIN PGP MESSAGE-----"));
    assert!(armored.contains("\ndGVzdA==\n"));
}

#[actix_web::test]
async fn test_tamper_flag_and_mitm_alias() {
    let app = app!();

    for flag in ["simulateTamper", "mitm"] {
        let req = test::TestRequest::post()
            .uri("/api/decrypt/tls")
            .set_json(json!({ "encryptedMessage": "garbage", flag: true }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["decryptedMessage"], TAMPER_SENTINEL);
    }
}

#[actix_web::test]
async fn test_tampered_session_record_is_generic_500() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/encrypt/tls")
        .set_json(json!({ "message": "wire transfer: 100", "publicKey": "" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let mut record: Value =
        serde_json::from_str(body["encryptedMessage"].as_str().unwrap()).unwrap();
    // Swap in another valid tag.
    record["authTag"] = json!("AAAAAAAAAAAAAAAAAAAAAA==");

    let req = test::TestRequest::post()
        .uri("/api/decrypt/tls")
        .set_json(json!({ "encryptedMessage": record.to_string() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to decrypt message");
    assert_eq!(body["kind"], "AuthenticationError");
}

#[actix_web::test]
async fn test_unsupported_method() {
    let app = app!();

    let requests = vec![
        test::TestRequest::get().uri("/api/keys/xyz").to_request(),
        test::TestRequest::post()
            .uri("/api/encrypt/xyz")
            .set_json(json!({ "message": "hi", "publicKey": "" }))
            .to_request(),
        test::TestRequest::post()
            .uri("/api/decrypt/xyz")
            .set_json(json!({ "encryptedMessage": "hi", "mitm": true }))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unsupported encryption method: xyz");
        assert_eq!(body["kind"], "UnsupportedSchemeError");
    }
}

#[actix_web::test]
async fn test_missing_fields() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/encrypt/aes")
        .set_json(json!({ "publicKey": "{}" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "ValidationError");
    assert!(body["error"].as_str().unwrap().contains("Message is required"));

    let req = test::TestRequest::post()
        .uri("/api/decrypt/aes")
        .set_json(json!({ "encryptedMessage": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Encrypted message is required"));
}

#[actix_web::test]
async fn test_malformed_inputs_are_client_errors() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/encrypt/rsa")
        .set_json(json!({ "message": "hi", "publicKey": "not a pem" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "ParseError");

    let req = test::TestRequest::post()
        .uri("/api/decrypt/pgp")
        .set_json(json!({ "encryptedMessage": "no armor here" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/encrypt/aes")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_rsa_message_too_long() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/keys/rsa").to_request();
    let keys: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/encrypt/rsa")
        .set_json(json!({ "message": "x".repeat(300), "publicKey": keys["publicKey"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "EncryptionError");
}

#[actix_web::test]
async fn test_security_headers() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/status").to_request();
    let resp = test::call_service(&app, req).await;

    let headers = resp.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers.get("strict-transport-security").is_some());
}
