//! End-to-end tests
//! Starts the real server on an ephemeral port and talks to it over HTTP

use academic_portal::api::{serve, AppState};
use academic_portal::client::{
    spawn_watchdog, ApiFailure, ClientEvent, HttpPortal, MemoryStorage, PortalApi, View,
    WatchdogConfig,
};
use academic_portal::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const ALUNO2: &str = "aluno2@universidade.edu.br";

/// Start the server on 127.0.0.1:0 and return its base URL
async fn start_server(config: Config) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::from_config(config).unwrap());

    let handle = tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_http_portal_full_flow() {
    let (base_url, server) = start_server(Config::default()).await;
    let api = HttpPortal::new(&base_url).unwrap();

    let session = api.login(ALUNO2, "654321").await.unwrap();
    assert_eq!(session.user.email, ALUNO2);
    assert_eq!(session.user.course, "Ciência da Computação");

    let user = api.check_session(&session.session_id).await.unwrap();
    assert_eq!(user.email, ALUNO2);

    let status = api.account_status(ALUNO2).await.unwrap();
    assert_eq!(status.attempts, 0);
    assert!(!status.locked);

    let message = api.remember_password(ALUNO2).await.unwrap();
    assert!(message.contains(ALUNO2));

    api.logout(Some(&session.session_id)).await.unwrap();
    let err = api.check_session(&session.session_id).await.unwrap_err();
    assert!(matches!(err, ApiFailure::Rejected { status: 401, .. }));

    server.abort();
}

#[tokio::test]
async fn test_http_portal_reports_rejections() {
    let (base_url, server) = start_server(Config::default()).await;
    let api = HttpPortal::new(format!("{}/", base_url)).unwrap();

    let err = api.login(ALUNO2, "errada").await.unwrap_err();
    assert_eq!(
        err,
        ApiFailure::Rejected {
            status: 401,
            message: "Senha incorreta! Tentativas restantes: 2".to_string()
        }
    );

    let status = api.account_status(ALUNO2).await.unwrap();
    assert_eq!(status.attempts, 1);
    assert_eq!(status.remaining_attempts, 2);

    let err = api.remember_password("x@y.z").await.unwrap_err();
    assert!(matches!(err, ApiFailure::Rejected { status: 404, .. }));

    server.abort();
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpPortal::new(format!("http://{}", addr)).unwrap();
    let err = api.login(ALUNO2, "654321").await.unwrap_err();
    assert!(matches!(err, ApiFailure::Unreachable(_)));
}

#[tokio::test]
async fn test_watchdog_against_real_server() {
    let (base_url, server) = start_server(Config::default()).await;
    let api = Arc::new(HttpPortal::new(&base_url).unwrap());
    let storage = MemoryStorage::new();

    let handle = spawn_watchdog(api.clone(), storage, WatchdogConfig::default());
    let mut views = handle.views();

    handle
        .send(ClientEvent::LoginSubmitted {
            email: ALUNO2.to_string(),
            password: "654321".to_string(),
        })
        .await;

    let dashboard = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            views.changed().await.unwrap();
            let view = views.borrow_and_update().clone();
            if view.is_dashboard() {
                return view;
            }
        }
    })
    .await
    .unwrap();

    match dashboard {
        View::Dashboard { user, notice } => {
            assert_eq!(user.email, ALUNO2);
            assert_eq!(notice.unwrap().text, format!("Bem-vindo, {}!", ALUNO2));
        }
        View::Login { .. } => unreachable!(),
    }

    handle.shutdown().await;
    server.abort();
}
