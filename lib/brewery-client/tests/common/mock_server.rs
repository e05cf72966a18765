#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use url::Url;
use uuid::Uuid;

use brewery_client::model::Beer;
use brewery_client::{ApiClient, Authentication, OAuth2Config, OAuth2ConfigBuilder};

pub const ACCESS_TOKEN: &str = "test";
pub const CLIENT_ID: &str = "messaging-client";
pub const CLIENT_SECRET: &str = "secret";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "password";

/// Where the server claims created beers live; the client must re-root it.
const ADVERTISED_ORIGIN: &str = "http://localhost:8080";

const DEFAULT_PAGE_SIZE: usize = 25;

/// Shared state of the mock beer API and authorization server.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    beers: Arc<RwLock<Vec<Beer>>>,
    token_requests: Arc<AtomicUsize>,
    api_requests: Arc<AtomicUsize>,
    token_expires_in: Arc<AtomicU64>,
    token_failure: Arc<AtomicBool>,
    last_query: Arc<RwLock<Option<HashMap<String, String>>>>,
    authorizations: Arc<RwLock<Vec<String>>>,
}

pub struct TestApp {
    base_url: Url,
    state: MockState,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind listener")?;
        let addr = listener.local_addr().context("local address")?;

        let state = MockState::default();
        state.token_expires_in.store(3600, Ordering::SeqCst);
        let app = router(state.clone());

        info!(%addr, "launching mock server");
        let server = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .expect("mock server running");
        });

        let base_url = format!("http://{addr}").parse().context("base url")?;
        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_url(&self) -> String {
        format!("{}oauth2/token", self.base_url)
    }

    pub fn oauth2_config(&self) -> OAuth2ConfigBuilder {
        OAuth2Config::client_credentials(CLIENT_ID, CLIENT_SECRET, self.token_url())
            .expect("valid token url")
            .add_scope("message.read")
            .add_scope("message.write")
    }

    pub fn client_with(&self, authentication: Authentication) -> ApiClient {
        ApiClient::builder()
            .with_base_url(self.base_url.clone())
            .expect("valid base url")
            .with_authentication(authentication)
            .build()
            .expect("valid client")
    }

    pub fn oauth2_client(&self) -> ApiClient {
        let config = self.oauth2_config().build().expect("valid oauth2 config");
        self.client_with(Authentication::OAuth2(config.into()))
    }

    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::builder()
            .with_base_url(self.base_url.clone())
            .expect("valid base url")
            .build()
            .expect("valid client")
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn api_requests(&self) -> usize {
        self.state.api_requests.load(Ordering::SeqCst)
    }

    pub fn set_token_expires_in(&self, seconds: u64) {
        self.state.token_expires_in.store(seconds, Ordering::SeqCst);
    }

    pub fn fail_token_requests(&self) {
        self.state.token_failure.store(true, Ordering::SeqCst);
    }

    pub async fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.last_query.read().await.clone()
    }

    /// `Authorization` headers received by the beer API, in order.
    pub async fn authorizations(&self) -> Vec<String> {
        self.state.authorizations.read().await.clone()
    }

    pub async fn insert(&self, beer: Beer) -> Beer {
        let beer = stamp(beer.with_id(Uuid::new_v4()));
        self.state.beers.write().await.push(beer.clone());
        beer
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: MockState) -> Router {
    let api = Router::new()
        .route("/api/v1/beer", get(list_beers).post(create_beer))
        .route(
            "/api/v1/beer/{id}",
            get(get_beer).put(update_beer).delete(delete_beer),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize));

    Router::new()
        .route("/oauth2/token", post(issue_token))
        .merge(api)
        .with_state(state)
}

fn stamp(mut beer: Beer) -> Beer {
    let now = jiff::Zoned::now().datetime();
    beer.version = Some(beer.version.map_or(0, |version| version + 1));
    beer.created_date.get_or_insert(now);
    beer.update_date = Some(now);
    beer
}

async fn authorize(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.api_requests.fetch_add(1, Ordering::SeqCst);
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let Some(authorization) = authorization else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    state
        .authorizations
        .write()
        .await
        .push(authorization.clone());

    let basic = format!(
        "Basic {}",
        base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{USERNAME}:{PASSWORD}")
        )
    );
    if authorization == format!("Bearer {ACCESS_TOKEN}") || authorization == basic {
        next.run(request).await
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn issue_token(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    // Leaves room for concurrent callers to pile up
    tokio::time::sleep(Duration::from_millis(50)).await;

    let expected = format!(
        "Basic {}",
        base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{CLIENT_ID}:{CLIENT_SECRET}")
        )
    );
    let authorized = headers
        .get(header::AUTHORIZATION)
        .is_some_and(|value| value.as_bytes() == expected.as_bytes());

    if state.token_failure.load(Ordering::SeqCst) || !authorized {
        let body = json!({"error": "invalid_client", "error_description": "client authentication failed"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let body = json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": state.token_expires_in.load(Ordering::SeqCst),
        "scope": "message.read message.write",
    });
    Json(body).into_response()
}

async fn list_beers(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page_number = params
        .get("pageNumber")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let page_size = params
        .get("pageSize")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1);
    let name = params.get("beerName").cloned();
    let hide_inventory = params
        .get("showInventory")
        .is_some_and(|value| value == "false");
    *state.last_query.write().await = Some(params);

    let beers = state.beers.read().await;
    let matching = beers
        .iter()
        .filter(|beer| {
            name.as_ref()
                .is_none_or(|name| beer.beer_name.contains(name.as_str()))
        })
        .collect::<Vec<_>>();
    let total_elements = matching.len();
    let content = matching
        .into_iter()
        .skip((page_number - 1) * page_size)
        .take(page_size)
        .map(|beer| {
            let mut value = json!(beer);
            if hide_inventory {
                value["quantityOnHand"] = Value::Null;
            }
            value
        })
        .collect::<Vec<_>>();

    Json(json!({
        "content": content,
        "number": page_number - 1,
        "size": page_size,
        "totalElements": total_elements,
        "totalPages": total_elements.div_ceil(page_size),
        "first": page_number == 1,
        "empty": content.is_empty(),
    }))
    .into_response()
}

async fn get_beer(State(state): State<MockState>, Path(id): Path<Uuid>) -> Response {
    let beers = state.beers.read().await;
    match beers.iter().find(|beer| beer.id == Some(id)) {
        Some(beer) => Json(beer.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_beer(State(state): State<MockState>, Json(beer): Json<Beer>) -> Response {
    let id = Uuid::new_v4();
    let beer = stamp(beer.with_id(id));
    state.beers.write().await.push(beer);

    let location = format!("{ADVERTISED_ORIGIN}/api/v1/beer/{id}");
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

async fn update_beer(
    State(state): State<MockState>,
    Path(id): Path<Uuid>,
    Json(update): Json<Beer>,
) -> Response {
    let mut beers = state.beers.write().await;
    let Some(beer) = beers.iter_mut().find(|beer| beer.id == Some(id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    beer.beer_name = update.beer_name;
    beer.beer_style = update.beer_style;
    beer.upc = update.upc;
    beer.price = update.price;
    beer.quantity_on_hand = update.quantity_on_hand;
    *beer = stamp(beer.clone());

    StatusCode::NO_CONTENT.into_response()
}

async fn delete_beer(State(state): State<MockState>, Path(id): Path<Uuid>) -> Response {
    let mut beers = state.beers.write().await;
    let before = beers.len();
    beers.retain(|beer| beer.id != Some(id));

    if beers.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
