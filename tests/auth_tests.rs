//! Authentication and lockout tests
//! Exercises the account directory and auth service without HTTP

use academic_portal::auth::{
    demo_accounts, Account, AccountDirectory, AccountRole, AuthService, SessionStore,
    MAX_LOGIN_ATTEMPTS,
};
use academic_portal::error::{Error, Lockout};
use std::sync::Arc;
use std::time::Duration;

const ALUNO1: &str = "aluno1@universidade.edu.br";
const ALUNO2: &str = "aluno2@universidade.edu.br";

fn service() -> AuthService {
    let directory = AccountDirectory::new(demo_accounts()).unwrap();
    AuthService::new(Arc::new(directory), SessionStore::new(Duration::from_secs(300)))
}

#[tokio::test]
async fn test_login_success_returns_public_account() {
    let auth = service();

    let outcome = auth.login(ALUNO1, "123456").await.unwrap();
    assert_eq!(outcome.account.email, ALUNO1);
    assert_eq!(outcome.account.name, "Aluno 1");
    assert_eq!(outcome.account.role, AccountRole::Aluno);
    assert_eq!(outcome.account.course, "Engenharia de Software");
    assert_eq!(outcome.session_id.len(), 64);
    assert!(outcome.session_id.chars().all(|c| c.is_ascii_hexdigit()));

    let json = serde_json::to_value(&outcome.account).unwrap();
    assert!(json.get("password").is_none());
    assert!(json.get("senha").is_none());
}

#[tokio::test]
async fn test_each_login_gets_a_distinct_token() {
    let auth = service();
    let a = auth.login(ALUNO1, "123456").await.unwrap();
    let b = auth.login(ALUNO1, "123456").await.unwrap();
    assert_ne!(a.session_id, b.session_id);
    assert_eq!(auth.sessions().len().await, 2);
}

#[tokio::test]
async fn test_three_failures_lock_the_account() {
    let auth = service();

    let err = auth.login(ALUNO1, "wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials { remaining: 2 }));
    assert_eq!(err.to_string(), "Senha incorreta! Tentativas restantes: 2");

    let err = auth.login(ALUNO1, "wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials { remaining: 1 }));

    let err = auth.login(ALUNO1, "wrong").await.unwrap_err();
    assert!(matches!(err, Error::AccountLocked(Lockout::JustLocked)));
    assert!(err.to_string().contains("bloqueada"));

    // The correct password no longer helps
    let err = auth.login(ALUNO1, "123456").await.unwrap_err();
    assert!(matches!(err, Error::AccountLocked(Lockout::AlreadyLocked)));

    let status = auth.status(Some(ALUNO1)).await.unwrap();
    assert_eq!(status.attempts, MAX_LOGIN_ATTEMPTS);
    assert!(status.locked);
    assert_eq!(status.remaining_attempts, 0);
}

#[tokio::test]
async fn test_locked_account_counter_stays_put() {
    let auth = service();
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let _ = auth.login(ALUNO1, "wrong").await;
    }
    for _ in 0..5 {
        let _ = auth.login(ALUNO1, "wrong").await;
    }

    let status = auth.status(Some(ALUNO1)).await.unwrap();
    assert_eq!(status.attempts, MAX_LOGIN_ATTEMPTS);
    assert!(status.locked);
}

#[tokio::test]
async fn test_success_resets_failure_counter() {
    let auth = service();

    let _ = auth.login(ALUNO1, "wrong").await;
    let _ = auth.login(ALUNO1, "wrong").await;
    assert_eq!(auth.status(Some(ALUNO1)).await.unwrap().remaining_attempts, 1);

    auth.login(ALUNO1, "123456").await.unwrap();

    let status = auth.status(Some(ALUNO1)).await.unwrap();
    assert_eq!(status.attempts, 0);
    assert!(!status.locked);
    assert_eq!(status.remaining_attempts, MAX_LOGIN_ATTEMPTS);

    // A fresh round of failures starts from the top again
    let err = auth.login(ALUNO1, "wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials { remaining: 2 }));
}

#[tokio::test]
async fn test_lockout_is_per_account() {
    let auth = service();
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let _ = auth.login(ALUNO1, "wrong").await;
    }

    assert!(auth.login(ALUNO2, "654321").await.is_ok());
    assert!(!auth.status(Some(ALUNO2)).await.unwrap().locked);
}

#[tokio::test]
async fn test_unknown_email_and_blank_fields() {
    let auth = service();

    let err = auth.login("ninguem@universidade.edu.br", "x").await.unwrap_err();
    assert!(matches!(err, Error::AccountNotFound));

    assert!(matches!(
        auth.login("", "123456").await.unwrap_err(),
        Error::AccountNotFound
    ));

    // A blank password is just a wrong one
    assert!(matches!(
        auth.login(ALUNO1, "").await.unwrap_err(),
        Error::InvalidCredentials { remaining: 2 }
    ));
    assert_eq!(auth.status(Some(ALUNO1)).await.unwrap().attempts, 1);
}

#[tokio::test]
async fn test_status_for_unknown_and_missing_email() {
    let auth = service();
    assert!(matches!(
        auth.status(Some("x@y.z")).await.unwrap_err(),
        Error::AccountNotFound
    ));
    assert!(matches!(auth.status(None).await.unwrap_err(), Error::EmailRequired));
    assert!(matches!(
        auth.status(Some("  ")).await.unwrap_err(),
        Error::EmailRequired
    ));
}

#[tokio::test]
async fn test_remember_password() {
    let auth = service();

    let message = auth.remember_password(Some(ALUNO2)).await.unwrap();
    assert!(message.contains(ALUNO2));

    assert!(matches!(
        auth.remember_password(Some("x@y.z")).await.unwrap_err(),
        Error::EmailNotFound
    ));
    assert!(matches!(
        auth.remember_password(None).await.unwrap_err(),
        Error::EmailRequired
    ));
}

#[tokio::test]
async fn test_check_session_and_logout() {
    let auth = service();
    let outcome = auth.login(ALUNO1, "123456").await.unwrap();
    let token = outcome.session_id.as_str();

    let user = auth.check_session(Some(token)).await.unwrap();
    assert_eq!(user.email, ALUNO1);

    assert!(auth.logout(Some(token)).await);
    assert!(matches!(
        auth.check_session(Some(token)).await.unwrap_err(),
        Error::SessionInvalid
    ));

    // Logging out twice or without a token is harmless
    assert!(!auth.logout(Some(token)).await);
    assert!(!auth.logout(None).await);
    assert!(matches!(
        auth.check_session(None).await.unwrap_err(),
        Error::SessionInvalid
    ));
}

#[tokio::test]
async fn test_concurrent_failures_never_exceed_limit() {
    let auth = service();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let auth = auth.clone();
            tokio::spawn(async move { auth.login(ALUNO1, "wrong").await })
        })
        .collect();

    let mut just_locked = 0;
    for handle in handles {
        if let Err(Error::AccountLocked(Lockout::JustLocked)) = handle.await.unwrap() {
            just_locked += 1;
        }
    }

    assert_eq!(just_locked, 1);
    let status = auth.status(Some(ALUNO1)).await.unwrap();
    assert_eq!(status.attempts, MAX_LOGIN_ATTEMPTS);
}

#[test]
fn test_duplicate_emails_are_rejected() {
    let accounts = vec![
        Account::new(1, "A", "dup@x.br", "a", AccountRole::Aluno, "C"),
        Account::new(2, "B", "dup@x.br", "b", AccountRole::Professor, "C"),
    ];
    assert!(AccountDirectory::new(accounts).is_err());
}
