use crate::error::ApiError;
use crate::extract::{safe_next, AuthUser};
use crate::session::{Session, SessionUser};
use crate::state::AppState;
use crate::views::{invalid_form, messages_res};
use api_shared::auth::verify_password;
use api_shared::{FormErrorsRes, PageInfoRes};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracker_core::forms::{FormData, FormErrors, LoginForm};
use utoipa::IntoParams;

const BAD_CREDENTIALS: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextParams {
    /// Local path to return to after signing in.
    pub next: Option<String>,
}

#[utoipa::path(
    get,
    path = "/login",
    params(NextParams),
    responses(
        (status = 200, description = "Login page", body = PageInfoRes)
    )
)]
#[axum::debug_handler]
pub async fn login_page(session: Session, Query(params): Query<NextParams>) -> Json<PageInfoRes> {
    Json(PageInfoRes {
        page: "login".into(),
        user: session.user().await.map(|u| u.username),
        next: safe_next(params.next.as_deref()).map(str::to_string),
        messages: messages_res(session.take_messages().await),
    })
}

#[utoipa::path(
    post,
    path = "/login",
    params(NextParams),
    request_body(content = String, content_type = "application/x-www-form-urlencoded",
        description = "username and password"),
    responses(
        (status = 303, description = "Signed in; redirect to `next` or the report queue"),
        (status = 422, description = "Missing or wrong credentials", body = FormErrorsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Sign in with a username and password.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<NextParams>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let data = FormData::new(pairs);
    // The password is never echoed back.
    let echoed = FormData::new(
        data.to_map()
            .into_iter()
            .filter(|(key, _)| key != "password")
            .flat_map(|(key, values)| values.into_iter().map(move |v| (key.clone(), v)))
            .collect(),
    );

    let credentials = match LoginForm::validate(&data) {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(invalid_form(LoginForm::NAME, errors, &echoed)),
    };

    let staff = state
        .staff
        .find_by_username(&credentials.username)?
        .filter(|staff| verify_password(&credentials.password, &staff.password_hash));
    let Some(staff) = staff else {
        tracing::info!(username = %credentials.username, "login failed");
        return Ok(invalid_form(
            LoginForm::NAME,
            FormErrors::non_field(BAD_CREDENTIALS),
            &echoed,
        ));
    };

    session
        .log_in(SessionUser {
            id: staff.id,
            username: staff.username.as_str().to_string(),
            is_staff: staff.is_staff,
        })
        .await;
    tracing::info!(username = %staff.username.as_str(), "login succeeded");

    let target = data
        .get("next")
        .or(params.next.as_deref())
        .and_then(|next| safe_next(Some(next)))
        .unwrap_or("/report-queue");
    Ok(Redirect::to(target).into_response())
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Signed out; redirect to /")
    )
)]
/// Sign out, discarding the session along with any report under review.
#[axum::debug_handler]
pub async fn logout(auth: AuthUser) -> Redirect {
    tracing::info!(username = %auth.user.username, "logout");
    auth.session.flush().await;
    Redirect::to("/")
}
