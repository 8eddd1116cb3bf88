//! In-memory stand-in for the demo users endpoint.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::transport::{ParamValue, QueryParams, Transport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub total: u64,
    pub total_page: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<User>,
    pub pagination: PageInfo,
}

pub fn users(count: u32) -> Vec<User> {
    (1..=count)
        .map(|id| User {
            id,
            email: format!("user{}@example.com", id),
        })
        .collect()
}

/// Serves 1-based slices of a fixed user list and records every request.
pub struct UsersTransport {
    users: Mutex<Vec<User>>,
    requests: Mutex<Vec<QueryParams>>,
    failing: AtomicBool,
    delay_per_page_ms: AtomicI64,
}

impl UsersTransport {
    pub fn new(count: u32) -> Self {
        Self {
            users: Mutex::new(users(count)),
            requests: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay_per_page_ms: AtomicI64::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Lower pages answer slower: page `n` waits `(10 - n) * ms`.
    pub fn set_delay_per_page(&self, ms: i64) {
        self.delay_per_page_ms.store(ms, Ordering::SeqCst);
    }

    pub fn truncate(&self, count: usize) {
        self.users.lock().unwrap().truncate(count);
    }

    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<i64> {
        self.requests()
            .iter()
            .map(|params| int_param(params, "page", 1))
            .collect()
    }

    fn respond(&self, params: &QueryParams) -> serde_json::Value {
        let users = self.users.lock().unwrap();
        let page = int_param(params, "page", 1);
        let limit = int_param(params, "limit", 25).max(1);

        let start = ((page - 1).max(0) * limit) as usize;
        let data: Vec<User> = users.iter().skip(start).take(limit as usize).cloned().collect();
        let total = users.len() as i64;

        json!({
            "data": data,
            "pagination": {
                "page": page,
                "total": total,
                "resultsPerPage": limit,
                "totalPage": (total + limit - 1) / limit,
            }
        })
    }
}

#[async_trait]
impl Transport for UsersTransport {
    async fn get<P>(&self, url: &str, params: &QueryParams) -> Result<P>
    where
        P: DeserializeOwned + Send + 'static,
    {
        self.requests.lock().unwrap().push(params.clone());

        let delay = self.delay_per_page_ms.load(Ordering::SeqCst);
        if delay > 0 {
            let page = int_param(params, "page", 1);
            let wait = (10 - page).max(0) * delay;
            tokio::time::sleep(Duration::from_millis(wait as u64)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        if url != "/users" {
            bail!("404 Not Found: {}", url);
        }

        let body = self.respond(params);
        Ok(serde_json::from_value(body)?)
    }
}

fn int_param(params: &QueryParams, key: &str, default: i64) -> i64 {
    match params.get(key) {
        Some(ParamValue::Int(value)) => *value,
        Some(ParamValue::Str(raw)) => raw.parse().unwrap_or(default),
        _ => default,
    }
}

/// Users transport whose requests for held pages wait until released.
pub struct GatedTransport {
    inner: UsersTransport,
    gates: Mutex<HashMap<i64, Arc<Notify>>>,
    waiting: AtomicUsize,
    settled: AtomicUsize,
}

impl GatedTransport {
    pub fn new(count: u32) -> Self {
        Self {
            inner: UsersTransport::new(count),
            gates: Mutex::new(HashMap::new()),
            waiting: AtomicUsize::new(0),
            settled: AtomicUsize::new(0),
        }
    }

    /// Requests for `page` block until [`GatedTransport::release`] is called.
    pub fn hold(&self, page: i64) {
        self.gates
            .lock()
            .unwrap()
            .insert(page, Arc::new(Notify::new()));
    }

    pub fn release(&self, page: i64) {
        let gate = self.gates.lock().unwrap().get(&page).cloned();
        if let Some(gate) = gate {
            gate.notify_one();
        }
    }

    /// Number of requests that reached a held gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Number of requests that got an answer.
    pub fn settled(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }

    pub fn requested_pages(&self) -> Vec<i64> {
        self.inner.requested_pages()
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn get<P>(&self, url: &str, params: &QueryParams) -> Result<P>
    where
        P: DeserializeOwned + Send + 'static,
    {
        let page = int_param(params, "page", 1);
        let gate = self.gates.lock().unwrap().get(&page).cloned();
        if let Some(gate) = gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
        }

        let result = self.inner.get(url, params).await;
        self.settled.fetch_add(1, Ordering::SeqCst);
        result
    }
}
