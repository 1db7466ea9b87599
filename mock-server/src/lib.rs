//! Stub API server for the client's integration tests.
//!
//! Serves a small seeded user directory plus an `/echo` route that reflects
//! the headers, cookies, and query params it received, so header/cookie
//! merge behavior can be verified over real HTTP. Error responses carry JSON
//! bodies so error-path dispatches still have something to deserialize.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
}

pub type Db = Arc<RwLock<HashMap<u64, User>>>;

/// Router with user 1 ("Ann") pre-seeded.
pub fn app() -> Router {
    let mut users = HashMap::new();
    users.insert(
        1,
        User {
            id: 1,
            name: "Ann".to_string(),
        },
    );
    let db: Db = Arc::new(RwLock::new(users));
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/echo", get(echo).post(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({"error": "user not found"})),
    ))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let mut users = db.write().await;
    let id = users.keys().max().copied().unwrap_or(0) + 1;
    let user = User {
        id,
        name: input.name,
    };
    users.insert(id, user.clone());
    (StatusCode::CREATED, Json(user))
}

/// Reflect the incoming request. Header names come back lowercased, as the
/// HTTP layer normalizes them.
async fn echo(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Json<Value> {
    let mut header_map = BTreeMap::new();
    for (name, value) in headers.iter() {
        header_map.insert(
            name.as_str().to_string(),
            value.to_str().unwrap_or_default().to_string(),
        );
    }
    let cookies = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(parse_cookies)
        .unwrap_or_default();
    Json(json!({
        "headers": header_map,
        "cookies": cookies,
        "params": params,
    }))
}

fn parse_cookies(raw: &str) -> BTreeMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            pair.trim()
                .split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
        })
        .collect()
}
