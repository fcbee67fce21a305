use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use cardback::{
    Client, CreateCardRequest, CreateClientConfig, MemoryTokenStore, TokenPair, TokenStore,
    TransactionFilter,
};
use chrono::{DateTime, Utc};
use warp::Filter;
use warp::http::StatusCode;

struct Backend {
    valid_access: String,
    refresh_token: String,
    refresh_calls: usize,
    fail_refresh: bool,
    always_reject: bool,
}

/// Fake card backend with a counter on the refresh endpoint, so tests can
/// assert how many refresh calls a scenario really produced.
#[derive(Clone)]
struct BackendHandle {
    inner: Arc<Mutex<Backend>>,
}

impl BackendHandle {
    fn new(valid_access: &str, refresh_token: &str) -> Self {
        BackendHandle {
            inner: Arc::new(Mutex::new(Backend {
                valid_access: valid_access.to_string(),
                refresh_token: refresh_token.to_string(),
                refresh_calls: 0,
                fail_refresh: false,
                always_reject: false,
            })),
        }
    }

    fn refresh_calls(&self) -> usize {
        self.inner.lock().unwrap().refresh_calls
    }

    fn fail_refresh(&self) {
        self.inner.lock().unwrap().fail_refresh = true;
    }

    /// Reject every protected request regardless of the presented token.
    fn always_reject(&self) {
        self.inner.lock().unwrap().always_reject = true;
    }
}

fn reply_json(
    status: StatusCode,
    value: serde_json::Value,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&value), status)
}

fn authorized(backend: &Backend, authorization: &Option<String>) -> bool {
    let expected = format!("Bearer {}", backend.valid_access);
    !backend.always_reject && authorization.as_deref() == Some(expected.as_str())
}

fn routes(
    handle: BackendHandle,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state = warp::any().map(move || handle.clone());

    let login = warp::post()
        .and(warp::path!("auth" / "login"))
        .and(warp::body::json())
        .and(state.clone())
        .map(|_body: serde_json::Value, handle: BackendHandle| {
            let backend = handle.inner.lock().unwrap();
            reply_json(
                StatusCode::OK,
                serde_json::json!({
                    "accessToken": backend.valid_access,
                    "refreshToken": backend.refresh_token,
                }),
            )
        });

    let refresh = warp::post()
        .and(warp::path!("auth" / "refresh"))
        .and(warp::body::json())
        .and(state.clone())
        .and_then(|body: serde_json::Value, handle: BackendHandle| async move {
            // Hold the response briefly so every concurrently rejected
            // request has joined the cycle before it settles.
            tokio::time::sleep(Duration::from_millis(100)).await;

            let mut backend = handle.inner.lock().unwrap();
            backend.refresh_calls += 1;

            let reply = if backend.fail_refresh
                || body["refreshToken"] != serde_json::json!(backend.refresh_token)
            {
                reply_json(
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({"error": "invalid refresh token"}),
                )
            } else {
                backend.valid_access = format!("access-{}", backend.refresh_calls + 1);
                reply_json(
                    StatusCode::OK,
                    serde_json::json!({
                        "accessToken": backend.valid_access,
                        "refreshToken": backend.refresh_token,
                    }),
                )
            };

            Ok::<_, warp::Rejection>(reply)
        });

    let list_cards = warp::get()
        .and(warp::path!("cards"))
        .and(warp::header::optional::<String>("authorization"))
        .and(state.clone())
        .map(|authorization: Option<String>, handle: BackendHandle| {
            let backend = handle.inner.lock().unwrap();
            if !authorized(&backend, &authorization) {
                return reply_json(
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({"error": "unauthorized"}),
                );
            }
            reply_json(
                StatusCode::OK,
                serde_json::json!([{
                    "id": "0b2a6f3e-8f0a-4b6e-9e2d-3f9f2a1c5d77",
                    "brand": "Visa",
                    "last4": "1234",
                    "nickname": "Personal",
                    "createdAt": "2026-08-01T12:00:00Z",
                }]),
            )
        });

    let create_card = warp::post()
        .and(warp::path!("cards"))
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .and(state.clone())
        .map(
            |authorization: Option<String>, body: serde_json::Value, handle: BackendHandle| {
                let backend = handle.inner.lock().unwrap();
                if !authorized(&backend, &authorization) {
                    return reply_json(
                        StatusCode::UNAUTHORIZED,
                        serde_json::json!({"error": "unauthorized"}),
                    );
                }
                reply_json(
                    StatusCode::CREATED,
                    serde_json::json!({
                        "id": "97fb7a43-25ad-4de5-a53f-6dc8d6a49d4e",
                        "brand": body["brand"],
                        "last4": body["last4"],
                        "nickname": body["nickname"],
                        "createdAt": "2026-08-02T09:30:00Z",
                    }),
                )
            },
        );

    let delete_card = warp::delete()
        .and(warp::path!("cards" / String))
        .and(warp::header::optional::<String>("authorization"))
        .and(state.clone())
        .map(|_id: String, authorization: Option<String>, handle: BackendHandle| {
            let backend = handle.inner.lock().unwrap();
            if !authorized(&backend, &authorization) {
                return reply_json(
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({"error": "unauthorized"}),
                );
            }
            reply_json(StatusCode::OK, serde_json::json!(null))
        });

    let list_transactions = warp::get()
        .and(warp::path!("transactions"))
        .and(warp::query::<HashMap<String, String>>())
        .and(warp::header::optional::<String>("authorization"))
        .and(state.clone())
        .map(
            |query: HashMap<String, String>,
             authorization: Option<String>,
             handle: BackendHandle| {
                let backend = handle.inner.lock().unwrap();
                if !authorized(&backend, &authorization) {
                    return reply_json(
                        StatusCode::UNAUTHORIZED,
                        serde_json::json!({"error": "unauthorized"}),
                    );
                }
                // Only the filtered listing returns data, so the test can
                // tell whether the query window actually went out.
                if !query.contains_key("from") || !query.contains_key("to") {
                    return reply_json(StatusCode::OK, serde_json::json!([]));
                }
                reply_json(
                    StatusCode::OK,
                    serde_json::json!([{
                        "id": "3d1f2a84-41cf-4a3f-8f07-1de1a1a7b9c2",
                        "cardId": "0b2a6f3e-8f0a-4b6e-9e2d-3f9f2a1c5d77",
                        "amount": 10000.0,
                        "currency": "COP",
                        "description": "Pago demo",
                        "status": "approved",
                        "createdAt": "2026-08-02T10:00:00Z",
                    }]),
                )
            },
        );

    login
        .or(refresh)
        .or(list_cards)
        .or(create_card)
        .or(delete_card)
        .or(list_transactions)
}

fn spawn_backend(handle: BackendHandle) -> SocketAddr {
    let (addr, server) = warp::serve(routes(handle)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn client_with_store(addr: SocketAddr, store: &Arc<dyn TokenStore>) -> Client {
    Client::new(CreateClientConfig {
        server_url: format!("http://{}", addr),
        token_store: Some(Arc::clone(store)),
    })
}

fn stale_session() -> TokenPair {
    TokenPair::new("access-1".to_string(), "refresh-1".to_string())
}

#[tokio::test]
async fn concurrent_expiry_collapses_into_one_refresh() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(&stale_session())?;
    let client = client_with_store(addr, &store);

    let (a, b, c, d) = tokio::join!(
        client.cards.get_all(),
        client.cards.get_all(),
        client.cards.get_all(),
        client.cards.get_all(),
    );

    for cards in [a?, b?, c?, d?] {
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].last4, "1234");
    }

    assert_eq!(handle.refresh_calls(), 1);
    assert_eq!(store.get().access_token.as_deref(), Some("access-2"));

    Ok(())
}

#[tokio::test]
async fn refresh_failure_fails_every_queued_request() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    handle.fail_refresh();
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(&stale_session())?;
    let client = client_with_store(addr, &store);

    let (a, b, c) =
        tokio::join!(client.cards.get_all(), client.cards.get_all(), client.cards.get_all());

    for result in [a, b, c] {
        let err = result.expect_err("request should fail when the refresh fails");
        assert!(err.to_string().contains("Token refresh failed"), "unexpected error: {err}");
    }

    assert_eq!(handle.refresh_calls(), 1);
    assert!(store.get().is_empty(), "failed refresh must clear the session");

    Ok(())
}

#[tokio::test]
async fn missing_refresh_token_clears_session_without_refresh_call() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(&TokenPair { access_token: Some("access-1".to_string()), refresh_token: None })?;
    let client = client_with_store(addr, &store);

    let err = client.cards.get_all().await.expect_err("session is unrecoverable");
    match err {
        cardback::ApiSdkError::HttpError(err) => {
            assert_eq!(err.status().map(|status| status.as_u16()), Some(401));
        }
        other => panic!("expected the original 401 to propagate, got {other}"),
    }

    assert_eq!(handle.refresh_calls(), 0);
    assert!(store.get().is_empty());

    Ok(())
}

#[tokio::test]
async fn retried_request_does_not_start_a_second_cycle() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    handle.always_reject();
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(&stale_session())?;
    let client = client_with_store(addr, &store);

    let err = client.cards.get_all().await.expect_err("backend rejects every request");
    match err {
        cardback::ApiSdkError::HttpError(err) => {
            assert_eq!(err.status().map(|status| status.as_u16()), Some(401));
        }
        other => panic!("expected the retry's 401 to propagate, got {other}"),
    }

    // The refresh succeeded; the retried request's second 401 must not
    // have started another cycle.
    assert_eq!(handle.refresh_calls(), 1);

    Ok(())
}

#[tokio::test]
async fn login_establishes_a_working_session() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let client = client_with_store(addr, &store);

    let pair = client.auth.login("demo", "secret").await?;
    assert_eq!(pair, store.get());
    assert_eq!(pair.access_token.as_deref(), Some("access-2"));

    let cards = client.cards.get_all().await?;
    assert_eq!(cards.len(), 1);
    assert_eq!(handle.refresh_calls(), 0);

    Ok(())
}

#[tokio::test]
async fn card_and_transaction_round_trip() -> Result<()> {
    let handle = BackendHandle::new("access-2", "refresh-1");
    let addr = spawn_backend(handle.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(&TokenPair::new("access-2".to_string(), "refresh-1".to_string()))?;
    let client = client_with_store(addr, &store);

    let card = client
        .cards
        .create(&CreateCardRequest {
            brand: "Mastercard".to_string(),
            last4: "9876".to_string(),
            token: "tok_demo_1".to_string(),
            nickname: "Work".to_string(),
        })
        .await?;
    assert_eq!(card.brand, "Mastercard");
    assert_eq!(card.last4, "9876");

    client.cards.delete(&card.id).await?;

    let unfiltered = client.transactions.get_all(&TransactionFilter::default()).await?;
    assert!(unfiltered.is_empty());

    let filter = TransactionFilter {
        from: Some(rfc3339("2026-08-01T00:00:00Z")?),
        to: Some(rfc3339("2026-08-03T00:00:00Z")?),
    };
    let filtered = client.transactions.get_all(&filter).await?;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].currency, "COP");
    assert_eq!(filtered[0].status, "approved");

    assert_eq!(handle.refresh_calls(), 0);

    Ok(())
}

fn rfc3339(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
