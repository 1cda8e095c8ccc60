
use actix_web::{body::to_bytes, ResponseError};
use associates_backend::{
    auth::{jwt::JwtService, password::verify_password},
    entities::{credential::{LoginRequest, RotateSecretRequest}, token::Identity},
    errors::{AppError, AuthError},
    repositories::token::TokenServiceRepository,
    settings::AppConfig,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use test_utils::*;
use uuid::Uuid;

fn login_request(identifier: &str, secret: &str) -> LoginRequest {
    LoginRequest {
        identifier: identifier.to_string(),
        secret: secret.to_string(),
    }
}

#[actix_rt::test]
async fn login_mints_token_for_matching_credential() {
    let handler = auth_handler(admin_credentials());

    let token = handler.login(login_request(ADMIN_IDENTIFIER, ADMIN_SECRET)).await.unwrap();

    assert_eq!(token.subject, ADMIN_IDENTIFIER);
    assert_eq!(token.expires_at - token.issued_at, Duration::days(7));

    let identity = handler.authenticate(Some(&token.value)).unwrap();
    assert_eq!(identity.subject, ADMIN_IDENTIFIER);
}

#[actix_rt::test]
async fn unknown_identifier_and_wrong_secret_are_indistinguishable() {
    let handler = auth_handler(admin_credentials());

    let unknown = handler.login(login_request("nobody", ADMIN_SECRET)).await.unwrap_err();
    let wrong_secret = handler.login(login_request(ADMIN_IDENTIFIER, "wrong-pw")).await.unwrap_err();

    assert_eq!(unknown, AuthError::InvalidCredentials);
    assert_eq!(unknown, wrong_secret);

    let unknown_response = unknown.error_response();
    let wrong_response = wrong_secret.error_response();
    assert_eq!(unknown_response.status(), wrong_response.status());
    assert_eq!(
        to_bytes(unknown_response.into_body()).await.unwrap(),
        to_bytes(wrong_response.into_body()).await.unwrap()
    );
}

#[actix_rt::test]
async fn empty_inputs_are_rejected_without_lookup() {
    let mut repo = MockCredentialRepo::new();
    repo.expect_get_credential().times(0);
    let handler = auth_handler(repo);

    assert_eq!(
        handler.login(login_request("", ADMIN_SECRET)).await.unwrap_err(),
        AuthError::MissingCredentials
    );
    assert_eq!(
        handler.login(login_request(ADMIN_IDENTIFIER, "")).await.unwrap_err(),
        AuthError::MissingCredentials
    );
}

#[actix_rt::test]
async fn whitespace_identifier_is_rejected_without_lookup() {
    let mut repo = MockCredentialRepo::new();
    repo.expect_get_credential().times(0);
    let handler = auth_handler(repo);

    assert_eq!(
        handler.login(login_request(" \t ", ADMIN_SECRET)).await.unwrap_err(),
        AuthError::MissingCredentials
    );
}

#[actix_rt::test]
async fn store_failure_surfaces_as_internal_error() {
    let mut repo = MockCredentialRepo::new();
    repo.expect_get_credential()
        .times(1)
        .returning(|_: &str| Err(AppError::InternalError("connection refused".into())));
    let handler = auth_handler(repo);

    let err = handler.login(login_request(ADMIN_IDENTIFIER, ADMIN_SECRET)).await.unwrap_err();

    assert!(matches!(err, AuthError::Internal(_)));
    let response = err.error_response();
    assert_eq!(response.status(), 500);
    let body = to_bytes(response.into_body()).await.unwrap();
    assert!(!String::from_utf8_lossy(&body).contains("connection refused"));
}

#[actix_rt::test]
async fn authenticate_requires_a_cookie_value() {
    let handler = auth_handler(MockCredentialRepo::new());

    assert_eq!(handler.authenticate(None).unwrap_err(), AuthError::Unauthenticated);
    assert_eq!(handler.authenticate(Some("")).unwrap_err(), AuthError::Unauthenticated);
}

#[actix_rt::test]
async fn expired_tokens_are_unauthenticated() {
    let config = test_config();
    let service = JwtService::new(&config);
    let handler = auth_handler(MockCredentialRepo::new());

    let token = service
        .create_session_token_at(ADMIN_IDENTIFIER, Utc::now() - Duration::days(8))
        .unwrap();

    assert_eq!(service.verify_session_token(&token.value).unwrap_err(), AuthError::Expired);
    assert_eq!(handler.authenticate(Some(&token.value)).unwrap_err(), AuthError::Unauthenticated);
}

#[actix_rt::test]
async fn token_expiring_one_second_ago_is_rejected() {
    let config = AppConfig {
        session_ttl_days: 1,
        ..test_config()
    };
    let service = JwtService::new(&config);

    let token = service
        .create_session_token_at(ADMIN_IDENTIFIER, Utc::now() - Duration::days(1) - Duration::seconds(1))
        .unwrap();

    assert!(service.verify_session_token(&token.value).is_err());
}

#[actix_rt::test]
async fn token_is_rejected_in_its_expiry_second() {
    let config = AppConfig {
        session_ttl_days: 1,
        ..test_config()
    };
    let service = JwtService::new(&config);

    let token = service
        .create_session_token_at(ADMIN_IDENTIFIER, Utc::now() - Duration::days(1))
        .unwrap();

    assert!(token.expires_at.timestamp() <= Utc::now().timestamp());
    assert_eq!(service.verify_session_token(&token.value).unwrap_err(), AuthError::Expired);
}

#[actix_rt::test]
async fn token_with_time_left_is_accepted() {
    let config = AppConfig {
        session_ttl_days: 1,
        ..test_config()
    };
    let service = JwtService::new(&config);

    let token = service
        .create_session_token_at(ADMIN_IDENTIFIER, Utc::now() - Duration::days(1) + Duration::seconds(30))
        .unwrap();

    assert_eq!(service.verify_session_token(&token.value).unwrap().subject, ADMIN_IDENTIFIER);
}

#[actix_rt::test]
async fn forged_tokens_are_unauthenticated() {
    let handler = auth_handler(MockCredentialRepo::new());
    let token = JwtService::new(&test_config())
        .create_session_token(ADMIN_IDENTIFIER)
        .unwrap()
        .value;

    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3);

    let exp = (Utc::now() + Duration::days(1)).timestamp();
    let forged_payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"sub":"root","iat":{},"exp":{}}}"#,
        Utc::now().timestamp(),
        exp
    ));
    let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    let none_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let unsigned = format!("{}.{}.", none_header, parts[1]);

    let truncated = &token[..token.len() - 10];

    let other_key = JwtService::new(&AppConfig {
        jwt_secret: "another_secret_that_is_also_long_enough_for_hs512".into(),
        ..test_config()
    })
    .create_session_token(ADMIN_IDENTIFIER)
    .unwrap()
    .value;

    for forged in [tampered.as_str(), unsigned.as_str(), truncated, other_key.as_str(), "garbage"] {
        assert_eq!(
            handler.authenticate(Some(forged)).unwrap_err(),
            AuthError::Unauthenticated,
            "token should be rejected: {forged}"
        );
    }
}

#[actix_rt::test]
async fn provisioning_rejects_weak_secrets() {
    let mut repo = MockCredentialRepo::new();
    repo.expect_create_credential().times(0);
    let handler = auth_handler(repo);

    let err = handler.provision_credential("admin", "password").await.unwrap_err();
    assert!(matches!(err, AuthError::WeakSecret(_)));
}

#[actix_rt::test]
async fn provisioning_stores_only_a_hash() {
    let secret = "Tq7!vRz#2mPw-Lk9xB";
    let mut repo = MockCredentialRepo::new();
    repo.expect_create_credential()
        .times(1)
        .withf(move |insert| {
            insert.identifier == "admin"
                && insert.password_hash != secret
                && verify_password(secret, &insert.password_hash).unwrap_or(false)
        })
        .returning(|_| Ok(Uuid::new_v4()));
    let handler = auth_handler(repo);

    handler.provision_credential(" admin ", secret).await.unwrap();
}

#[actix_rt::test]
async fn provisioning_existing_identifier_conflicts() {
    let mut repo = MockCredentialRepo::new();
    repo.expect_create_credential()
        .times(1)
        .returning(|_| Err(AppError::Conflict("exists".into())));
    let handler = auth_handler(repo);

    let err = handler
        .provision_credential("admin", "Tq7!vRz#2mPw-Lk9xB")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::AlreadyProvisioned);
}

fn identity(subject: &str) -> Identity {
    let now = Utc::now();
    Identity {
        subject: subject.to_string(),
        issued_at: now,
        expires_at: now + Duration::days(7),
    }
}

#[actix_rt::test]
async fn rotation_requires_the_current_secret() {
    let mut repo = admin_credentials();
    repo.expect_update_password_hash().times(0);
    let handler = auth_handler(repo);

    let err = handler
        .rotate_secret(
            &identity(ADMIN_IDENTIFIER),
            RotateSecretRequest {
                current_secret: "wrong-pw".into(),
                new_secret: "Tq7!vRz#2mPw-Lk9xB".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
}

#[actix_rt::test]
async fn rotation_replaces_the_stored_hash() {
    let new_secret = "Tq7!vRz#2mPw-Lk9xB";
    let mut repo = admin_credentials();
    repo.expect_update_password_hash()
        .times(1)
        .withf(move |identifier: &str, hash: &str| {
            identifier == ADMIN_IDENTIFIER && verify_password(new_secret, hash).unwrap_or(false)
        })
        .returning(|_, _| Ok(()));
    let handler = auth_handler(repo);

    handler
        .rotate_secret(
            &identity(ADMIN_IDENTIFIER),
            RotateSecretRequest {
                current_secret: ADMIN_SECRET.into(),
                new_secret: new_secret.into(),
            },
        )
        .await
        .unwrap();
}
