use academic_portal::auth::session::generate_token;
use academic_portal::auth::{demo_accounts, session_token, AccountDirectory, AuthService, SessionStore};
use academic_portal::Config;
use axum::http::{HeaderMap, HeaderValue};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

fn bench_token_generation(c: &mut Criterion) {
    c.bench_function("generate_token", |b| b.iter(generate_token));
}

fn bench_token_extraction(c: &mut Criterion) {
    let token = generate_token();

    let mut header = HeaderMap::new();
    header.insert("x-session-id", HeaderValue::from_str(&token).unwrap());
    c.bench_function("session_token_header", |b| {
        b.iter(|| session_token(black_box(&header)))
    });

    let mut cookie = HeaderMap::new();
    cookie.insert(
        "Cookie",
        HeaderValue::from_str(&format!("a=1; b=2; portal_session={}", token)).unwrap(),
    );
    c.bench_function("session_token_cookie", |b| {
        b.iter(|| session_token(black_box(&cookie)))
    });
}

fn bench_login(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let directory = AccountDirectory::new(demo_accounts()).unwrap();
    let auth = AuthService::new(
        Arc::new(directory),
        SessionStore::new(Duration::from_secs(300)),
    );

    c.bench_function("login_success", |b| {
        b.iter(|| {
            rt.block_on(async {
                let outcome = auth
                    .login("aluno3@universidade.edu.br", "987654")
                    .await
                    .unwrap();
                auth.logout(Some(&outcome.session_id)).await;
            })
        })
    });

    c.bench_function("status_lookup", |b| {
        b.iter(|| rt.block_on(auth.status(Some(black_box("aluno2@universidade.edu.br")))))
    });
}

fn bench_config_parsing(c: &mut Criterion) {
    let content = academic_portal::config::loader::default_config_content();
    c.bench_function("config_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(content)))
    });
}

criterion_group!(
    benches,
    bench_token_generation,
    bench_token_extraction,
    bench_login,
    bench_config_parsing
);
criterion_main!(benches);
