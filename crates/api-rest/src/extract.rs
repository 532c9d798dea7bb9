//! Authentication extractors.
//!
//! Both redirect to `/login?next=<path>` instead of failing with an error status.

use crate::session::{Session, SessionUser};
use axum::http::request::Parts;
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::extract::FromRequestParts;

/// Any signed-in user.
pub struct AuthUser {
    pub user: SessionUser,
    pub session: Session,
}

/// A signed-in user with the staff flag set.
pub struct StaffUser {
    pub user: SessionUser,
    pub session: Session,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match session.user().await {
            Some(user) => Ok(Self { user, session }),
            None => Err(login_redirect(&parts.uri)),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match session.user().await {
            Some(user) if user.is_staff => Ok(Self { user, session }),
            Some(user) => {
                tracing::info!(username = %user.username, path = %parts.uri.path(), "non-staff user refused");
                Err(login_redirect(&parts.uri))
            }
            None => Err(login_redirect(&parts.uri)),
        }
    }
}

/// Redirect to the login page, remembering where the visitor was going.
pub fn login_redirect(uri: &Uri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Redirect::to(&format!("/login?next={}", encode_next(target))).into_response()
}

/// Percent-encode a path for use as a query value, keeping `/` readable.
fn encode_next(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Only same-site absolute paths are accepted as a post-login destination.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_login_redirect_encodes_query() {
        let uri: Uri = "/report-queue?gender=male&page=2".parse().unwrap();
        let response = login_redirect(&uri);
        assert_eq!(
            response.headers()[LOCATION],
            "/login?next=/report-queue%3Fgender%3Dmale%26page%3D2"
        );
    }

    #[test]
    fn test_safe_next_rejects_offsite_targets() {
        assert_eq!(safe_next(Some("/review/3")), Some("/review/3"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(None), None);
    }
}
