//! Server-side sessions keyed by the `sessionid` cookie.
//!
//! A session holds the signed-in user, the report currently under review and pending flash
//! messages. Records live in memory and expire after the configured idle time. A session is
//! only stored (and its cookie only sent) once a handler writes to it.

use crate::error::ApiError;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracker_core::{Notice, ReportId, StaffId};

pub const SESSION_COOKIE: &str = "sessionid";

/// The signed-in account as remembered by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: StaffId,
    pub username: String,
    pub is_staff: bool,
}

#[derive(Clone, Debug)]
struct SessionData {
    user: Option<SessionUser>,
    reviewing_report: Option<ReportId>,
    messages: Vec<Notice>,
    last_seen: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            user: None,
            reviewing_report: None,
            messages: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Shared in-memory session records.
#[derive(Clone, Debug)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionStore {
    pub fn new(ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            secure_cookies,
        }
    }

    /// Number of live records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Resolve the session for a cookie value, discarding it if idle for too long.
    async fn resume(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(id) {
            Some(data) if data.last_seen.elapsed() <= self.ttl => {
                data.last_seen = Instant::now();
                true
            }
            Some(_) => {
                records.remove(id);
                tracing::debug!("expired session discarded");
                false
            }
            None => false,
        }
    }

    async fn purge_expired(&self) {
        let ttl = self.ttl;
        self.records
            .write()
            .await
            .retain(|_, data| data.last_seen.elapsed() <= ttl);
    }

    async fn contains(&self, id: &str) -> bool {
        self.records.read().await.contains_key(id)
    }

    async fn read<T>(&self, id: &str, f: impl FnOnce(&SessionData) -> T) -> Option<T> {
        self.records.read().await.get(id).map(f)
    }

    async fn write<T>(&self, id: &str, f: impl FnOnce(&mut SessionData) -> T) -> T {
        let mut records = self.records.write().await;
        f(records
            .entry(id.to_string())
            .or_insert_with(SessionData::new))
    }

    async fn rename(&self, from: &str, to: &str) {
        let mut records = self.records.write().await;
        if let Some(data) = records.remove(from) {
            records.insert(to.to_string(), data);
        }
    }

    async fn remove(&self, id: &str) {
        self.records.write().await.remove(id);
    }

    fn cookie(&self, id: &str) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.as_secs()
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn removal_cookie(&self) -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// The current request's session.
#[derive(Clone, Debug)]
pub struct Session {
    id: Arc<RwLock<String>>,
    store: SessionStore,
}

impl Session {
    fn new(id: String, store: SessionStore) -> Self {
        Self {
            id: Arc::new(RwLock::new(id)),
            store,
        }
    }

    async fn id(&self) -> String {
        self.id.read().await.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.store
            .read(&self.id().await, |data| data.user.clone())
            .await
            .flatten()
    }

    /// Record `user` as signed in, moving the session to a fresh id first.
    pub async fn log_in(&self, user: SessionUser) {
        self.cycle().await;
        self.store
            .write(&self.id().await, |data| data.user = Some(user))
            .await;
    }

    /// Move everything stored for this session to a new id and forget the old one.
    ///
    /// The response carries the new cookie. A client still holding the old id gets a fresh,
    /// empty session.
    pub async fn cycle(&self) {
        let mut id = self.id.write().await;
        let fresh = new_session_id();
        self.store.rename(&id, &fresh).await;
        *id = fresh;
    }

    /// Drop everything stored for this session (used on logout).
    pub async fn flush(&self) {
        self.store.remove(&self.id().await).await;
    }

    /// The report held in the review slot.
    pub async fn reviewing_report(&self) -> Option<ReportId> {
        self.store
            .read(&self.id().await, |data| data.reviewing_report)
            .await
            .flatten()
    }

    /// Put `report_id` in the review slot, replacing whatever was there.
    pub async fn start_review(&self, report_id: ReportId) {
        self.store
            .write(&self.id().await, |data| data.reviewing_report = Some(report_id))
            .await;
    }

    /// Empty the review slot, returning what it held.
    pub async fn finish_review(&self) -> Option<ReportId> {
        let id = self.id().await;
        if !self.store.contains(&id).await {
            return None;
        }
        self.store
            .write(&id, |data| data.reviewing_report.take())
            .await
    }

    /// Queue a flash message for the next page view.
    pub async fn notify(&self, notice: Notice) {
        self.store
            .write(&self.id().await, |data| data.messages.push(notice))
            .await;
    }

    /// Drain pending flash messages.
    pub async fn take_messages(&self) -> Vec<Notice> {
        let id = self.id().await;
        if !self.store.contains(&id).await {
            return Vec::new();
        }
        self.store
            .write(&id, |data| std::mem::take(&mut data.messages))
            .await
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| ApiError::Internal("session layer is not installed".into()))
    }
}

fn cookie_value(req: &Request) -> Option<String> {
    req.headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Middleware attaching a [`Session`] to every request.
pub async fn load_session(State(store): State<SessionStore>, mut req: Request, next: Next) -> Response {
    let presented = cookie_value(&req);
    let resumed = match &presented {
        Some(id) => store.resume(id).await,
        None => false,
    };

    let id = match (&presented, resumed) {
        (Some(id), true) => id.clone(),
        _ => {
            store.purge_expired().await;
            new_session_id()
        }
    };

    let session = Session::new(id.clone(), store.clone());
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    // The handler may have moved the session to a new id.
    let current = session.id().await;
    let stored = store.contains(&current).await;
    let cookie = if stored && (!resumed || current != id) {
        Some(store.cookie(&current))
    } else if !stored && presented.is_some() {
        Some(store.removal_cookie())
    } else {
        None
    };
    if let Some(cookie) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    response
}
