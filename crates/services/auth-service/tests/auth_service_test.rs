//! Authenticator unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use auth_service_lib::client::MockUserServiceClient;
use auth_service_lib::service::{AuthService, Authenticator};
use common::AppError;
use domain::{Password, User};

const TEST_SECRET: &str = "unit-test-secret-not-for-production";

fn user_with_password(email: &str, password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        name: "Test User".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

fn authenticator(client: MockUserServiceClient) -> Authenticator {
    Authenticator::new(Arc::new(client), TEST_SECRET.to_string(), 24)
}

#[tokio::test]
async fn login_with_valid_credentials_issues_token() {
    let user = user_with_password("alice@example.com", "password123");
    let user_id = user.id;

    let mut client = MockUserServiceClient::new();
    client
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .returning(move |_| Ok(Some(user.clone())));

    let auth = authenticator(client);
    let token = auth
        .login("alice@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 24 * 3600);
    assert_eq!(token.user_id, user_id);

    // The issued token round-trips through verification.
    let claims = auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "alice@example.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let user = user_with_password("alice@example.com", "password123");

    let mut client = MockUserServiceClient::new();
    client
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let auth = authenticator(client);
    let result = auth
        .login("alice@example.com".to_string(), "wrong-password".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_with_unknown_email_is_rejected_identically() {
    let mut client = MockUserServiceClient::new();
    client.expect_find_by_email().returning(|_| Ok(None));

    let auth = authenticator(client);
    let result = auth
        .login("nobody@example.com".to_string(), "password123".to_string())
        .await;

    // Same error kind as a wrong password: no email enumeration.
    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn tampered_token_fails_verification() {
    let user = user_with_password("alice@example.com", "password123");

    let mut client = MockUserServiceClient::new();
    client
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let auth = authenticator(client);
    let token = auth
        .login("alice@example.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let mut tampered = token.access_token.clone();
    tampered.push('x');
    assert!(auth.verify_token(&tampered).is_err());
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let auth = authenticator(MockUserServiceClient::new());
    let other = Authenticator::new(
        Arc::new(MockUserServiceClient::new()),
        "a-different-secret-entirely".to_string(),
        24,
    );

    let claims = auth_service_lib::service::Claims {
        sub: Uuid::new_v4(),
        email: "alice@example.com".to_string(),
        exp: (Utc::now() + chrono::Duration::hours(1)).timestamp(),
        iat: Utc::now().timestamp(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret("a-different-secret-entirely".as_bytes()),
    )
    .unwrap();

    assert!(other.verify_token(&token).is_ok());
    assert!(auth.verify_token(&token).is_err());
}
