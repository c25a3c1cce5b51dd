use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use devfinder::{
    error::NOT_FOUND_MESSAGE, AvatarSource, Config, ErrorKind, GitHubClient, LookupController,
    LookupView, Phase, RenderCache, StalePolicy,
};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct StubState {
    hits: Arc<AtomicUsize>,
}

async fn handle_user(State(state): State<StubState>, Path(handle): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match handle.as_str() {
        "octocat" => Json(json!({
            "login": "octocat",
            "avatar_url": "",
            "name": "The Octocat",
            "company": "@github",
            "blog": "https://github.blog",
            "location": "San Francisco",
            "bio": null,
            "public_repos": 8,
            "twitter_username": null,
            "followers": 5000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        }))
        .into_response(),
        "crashing" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "limited" => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "API rate limit exceeded" })),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "shapeless" => Json(json!({ "followers": "many" })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn spawn_stub() -> Result<(String, StubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StubState::default();
    let app = Router::new()
        .route("/users/:handle", get(handle_user))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn controller_for(api_base: &str) -> LookupController<GitHubClient> {
    let config = Config {
        api_base: api_base.to_string(),
        ..Config::default()
    };
    let client = GitHubClient::new(&config).expect("client");
    LookupController::new(client, StalePolicy::default())
}

#[tokio::test]
async fn octocat_renders_profile_panel() {
    let (base, _) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);

    controller.set_query("octocat");
    controller.submit().await;

    let state = controller.snapshot();
    assert_eq!(state.phase(), Phase::Success);
    let view = LookupView::render(&state);
    assert_eq!(view.error_label, None);

    let panel = view.panel.expect("panel rendered");
    assert_eq!(panel.repos, "8");
    assert_eq!(panel.followers, "5000");
    assert_eq!(panel.joined, "Joined 25 Jan 2011");
    assert_eq!(panel.display_name, "The Octocat");
    assert_eq!(panel.bio, "No bio available.");
    assert!(matches!(panel.avatar, AvatarSource::Local(_)));
}

#[tokio::test]
async fn missing_user_renders_no_result_without_panel() {
    let (base, _) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);

    controller.lookup("___doesnotexist___").await;

    let state = controller.snapshot();
    assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    let view = LookupView::render(&state);
    assert_eq!(view.error_label.as_deref(), Some("No result"));
    assert!(view.panel.is_none());
}

#[tokio::test]
async fn every_error_status_folds_into_not_found() {
    let (base, _) = spawn_stub().await.expect("spawn stub");
    let config = Config {
        api_base: base,
        ..Config::default()
    };
    let client = GitHubClient::new(&config).expect("client");

    let mut messages = Vec::new();
    for handle in ["crashing", "limited", "nobody"] {
        let err = client.fetch_user(handle).await.expect_err("non-2xx");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        messages.push(err.user_message());
    }
    assert!(messages.iter().all(|m| m == NOT_FOUND_MESSAGE));
}

#[tokio::test]
async fn undecodable_bodies_surface_their_own_message() {
    let (base, _) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);

    for handle in ["garbled", "shapeless"] {
        controller.lookup(handle).await;
        let state = controller.snapshot();
        let error = state.error.clone().expect("decode error stored");
        assert_ne!(error, NOT_FOUND_MESSAGE);
        assert!(state.profile.is_none());
        assert_eq!(LookupView::render(&state).error_label, Some(error));
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let controller = controller_for(&format!("http://{addr}"));
    controller.lookup("octocat").await;

    let state = controller.snapshot();
    let error = state.error.expect("transport error stored");
    assert!(!error.is_empty());
    assert_ne!(error, NOT_FOUND_MESSAGE);
    assert!(state.profile.is_none());
}

#[tokio::test]
async fn repeated_lookups_are_not_cached() {
    let (base, stub) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);

    controller.lookup("octocat").await;
    controller.lookup("octocat").await;

    assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
    assert!(controller.snapshot().profile.is_some());
}

#[tokio::test]
async fn failure_after_success_clears_profile() {
    let (base, _) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);

    controller.lookup("octocat").await;
    assert!(controller.snapshot().profile.is_some());

    controller.lookup("nobody").await;
    let state = controller.snapshot();
    assert!(state.profile.is_none());
    assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
}

#[tokio::test]
async fn typing_after_lookup_leaves_rendered_view_alone() {
    let (base, stub) = spawn_stub().await.expect("spawn stub");
    let controller = controller_for(&base);
    let mut states = controller.subscribe();
    let mut rendered = RenderCache::default();

    controller.lookup("octocat").await;
    let settled = rendered
        .refresh(&states.borrow_and_update())
        .expect("settled view");
    assert!(settled.panel.is_some());

    let mut repaints = 0;
    for query in ["t", "to", "tor"] {
        controller.set_query(query);
        assert!(states.has_changed().expect("controller alive"));
        if rendered.refresh(&states.borrow_and_update()).is_some() {
            repaints += 1;
        }
    }

    assert_eq!(repaints, 0);
    assert_eq!(controller.snapshot().query, "tor");
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
}
