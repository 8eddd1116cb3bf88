//! Demo users server: `GET /users?page=&limit=` over a fixed list of 100 users.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub total: u64,
    pub results_per_page: i64,
    pub total_page: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerResponse {
    pub data: Vec<User>,
    pub pagination: Pagination,
}

pub fn users() -> Vec<User> {
    (1..=100)
        .map(|id| User {
            id,
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
        })
        .collect()
}

async fn list_users(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    let page: i64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: i64 = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(25)
        .max(1);

    let matching: Vec<User> = users()
        .into_iter()
        .filter(|user| match query.get("search") {
            Some(search) => user.email.contains(search.as_str()),
            None => true,
        })
        .collect();

    let total = matching.len() as i64;
    let start = ((page - 1).max(0) * limit) as usize;
    let data: Vec<User> = matching.into_iter().skip(start).take(limit as usize).collect();

    Json(json!({
        "data": data,
        "pagination": {
            "page": page,
            "total": total,
            "resultsPerPage": limit,
            "totalPage": (total + limit - 1) / limit,
        }
    }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Start the server on an ephemeral port and return its base URL.
pub async fn start_server() -> anyhow::Result<String> {
    let app = Router::new()
        .route("/users", get(list_users))
        .route("/broken", get(broken));

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}
