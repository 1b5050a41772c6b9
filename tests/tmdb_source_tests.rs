//! Exercises the TMDB client and the resolver against an in-process stand-in
//! for the TMDB API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use movie_recs::{
    models::MovieId,
    services::{
        posters::{FetchError, RetryPolicy, PLACEHOLDER_URL},
        PosterResolver, PosterSource, TmdbPosterSource,
    },
};

const TOKEN: &str = "test-token";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

const WITH_POSTER: MovieId = MovieId(550);
const ALWAYS_FAILS: MovieId = MovieId(2);
const NO_POSTER: MovieId = MovieId(3);
const MALFORMED: MovieId = MovieId(4);
const SLOW: MovieId = MovieId(5);
const NULL_POSTER: MovieId = MovieId(6);

#[derive(Default)]
struct FakeTmdb {
    hits: Mutex<HashMap<i64, usize>>,
}

impl FakeTmdb {
    fn hits(&self, id: MovieId) -> usize {
        self.hits.lock().unwrap().get(&id.0).copied().unwrap_or(0)
    }
}

async fn movie_details(
    State(state): State<Arc<FakeTmdb>>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    *state.hits.lock().unwrap().entry(id).or_insert(0) += 1;

    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if params.get("language").map(String::as_str) != Some("en-US") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match id {
        550 => Json(json!({ "id": 550, "title": "Fight Club", "poster_path": "/abc.jpg" }))
            .into_response(),
        2 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        3 => Json(json!({})).into_response(),
        4 => (StatusCode::OK, "<html>not json</html>").into_response(),
        5 => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "poster_path": "/slow.jpg" })).into_response()
        }
        6 => Json(json!({ "poster_path": null })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake_tmdb() -> (String, Arc<FakeTmdb>) {
    let state = Arc::new(FakeTmdb::default());
    let app = Router::new()
        .route("/3/movie/:id", get(movie_details))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/3", addr), state)
}

fn source(api_url: &str, token: &str, timeout: Duration) -> TmdbPosterSource {
    TmdbPosterSource::new(
        api_url.to_string(),
        token.to_string(),
        "en-US".to_string(),
        timeout,
    )
    .unwrap()
}

fn resolver(source: TmdbPosterSource) -> PosterResolver {
    PosterResolver::new(Arc::new(source), IMAGE_BASE).with_policy(RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(20),
        timeout: Duration::from_secs(5),
    })
}

#[tokio::test]
async fn test_fetch_poster_path_success() {
    let (url, _) = spawn_fake_tmdb().await;
    let source = source(&url, TOKEN, Duration::from_secs(5));

    let path = assert_ok!(source.fetch_poster_path(WITH_POSTER).await);
    assert_eq!(path.as_deref(), Some("/abc.jpg"));
}

#[tokio::test]
async fn test_resolver_success_single_request() {
    let (url, tmdb) = spawn_fake_tmdb().await;
    let resolver = resolver(source(&url, TOKEN, Duration::from_secs(5)));

    let poster = resolver.fetch_one(WITH_POSTER).await;

    assert_eq!(poster, "https://image.tmdb.org/t/p/w500/abc.jpg");
    assert_eq!(tmdb.hits(WITH_POSTER), 1);
}

#[tokio::test]
async fn test_missing_poster_is_not_retried() {
    let (url, tmdb) = spawn_fake_tmdb().await;
    let resolver = resolver(source(&url, TOKEN, Duration::from_secs(5)));

    assert_eq!(resolver.fetch_one(NO_POSTER).await, PLACEHOLDER_URL);
    assert_eq!(resolver.fetch_one(NULL_POSTER).await, PLACEHOLDER_URL);
    assert_eq!(tmdb.hits(NO_POSTER), 1);
    assert_eq!(tmdb.hits(NULL_POSTER), 1);
}

#[tokio::test]
async fn test_server_error_retried_until_exhausted() {
    let (url, tmdb) = spawn_fake_tmdb().await;
    let resolver = resolver(source(&url, TOKEN, Duration::from_secs(5)));

    assert_eq!(resolver.fetch_one(ALWAYS_FAILS).await, PLACEHOLDER_URL);
    assert_eq!(tmdb.hits(ALWAYS_FAILS), 3);
}

#[tokio::test]
async fn test_status_error_reported() {
    let (url, _) = spawn_fake_tmdb().await;
    let source = source(&url, TOKEN, Duration::from_secs(5));

    let err = assert_err!(source.fetch_poster_path(MovieId(999)).await);
    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let (url, _) = spawn_fake_tmdb().await;
    let source = source(&url, "wrong-token", Duration::from_secs(5));

    let err = assert_err!(source.fetch_poster_path(WITH_POSTER).await);
    assert!(matches!(err, FetchError::Status(401)));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (url, tmdb) = spawn_fake_tmdb().await;
    let source = source(&url, TOKEN, Duration::from_secs(5));

    let err = assert_err!(source.fetch_poster_path(MALFORMED).await);
    assert!(matches!(err, FetchError::Decode(_)));

    let resolver = resolver(source);
    assert_eq!(resolver.fetch_one(MALFORMED).await, PLACEHOLDER_URL);
    assert_eq!(tmdb.hits(MALFORMED), 4);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let (url, _) = spawn_fake_tmdb().await;
    let source = source(&url, TOKEN, Duration::from_millis(200));

    let err = assert_err!(source.fetch_poster_path(SLOW).await);
    match err {
        FetchError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_isolates_failures_and_keeps_order() {
    let (url, tmdb) = spawn_fake_tmdb().await;
    let resolver = resolver(source(&url, TOKEN, Duration::from_secs(5)));

    let urls = resolver
        .fetch_many(&[WITH_POSTER, ALWAYS_FAILS, NO_POSTER, WITH_POSTER])
        .await;

    assert_eq!(
        urls,
        vec![
            "https://image.tmdb.org/t/p/w500/abc.jpg".to_string(),
            PLACEHOLDER_URL.to_string(),
            PLACEHOLDER_URL.to_string(),
            "https://image.tmdb.org/t/p/w500/abc.jpg".to_string(),
        ]
    );
    assert_eq!(tmdb.hits(WITH_POSTER), 2);
    assert_eq!(tmdb.hits(ALWAYS_FAILS), 3);
}
