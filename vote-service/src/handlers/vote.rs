use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use shared::observability::metric_names;
use tracing::{debug, error, warn};

use crate::models::{VoteForm, VoteResponse};
use crate::publisher::SubmitError;
use crate::AppState;

/// Ballot page
///
/// GET /
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), (StatusCode, String)> {
    let resolved = state.identities.resolve(&jar);
    if resolved.minted {
        state.metrics.increment(metric_names::VOTERS_MINTED);
    }

    let page = state
        .pages
        .render_index(resolved.last_vote.as_deref())
        .map_err(|e| {
            error!(error = %e, "Failed to render ballot page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render page".to_string(),
            )
        })?;

    // Always re-issue the identity cookie so its expiry slides forward
    let jar = state.identities.remember_identity(jar, &resolved.identity);

    Ok((jar, Html(page)))
}

/// Submit a ballot
///
/// POST /vote
pub async fn submit_vote(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Response {
    let identity = state.identities.presented(&jar);

    // An unreadable body carries no choice; the publisher still decides
    // between unavailable, missing identity and invalid choice.
    let raw_choice = match form {
        Ok(Form(form)) => form.vote.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "Vote body is not a readable form");
            String::new()
        }
    };

    match state.publisher.submit(identity.as_ref(), &raw_choice).await {
        Ok(ack) => {
            let jar = state.identities.remember_identity(jar, &ack.event.voter_id);
            let jar = state.identities.remember_vote(jar, ack.event.vote);
            (jar, Json(VoteResponse::success("Vote submitted successfully!"))).into_response()
        }
        Err(SubmitError::MissingIdentity { fresh }) => {
            let jar = state.identities.remember_identity(jar, &fresh);
            (jar, SubmitError::MissingIdentity { fresh }).into_response()
        }
        Err(err) => {
            warn!(retryable = err.is_retryable(), "Vote not recorded: {}", err);
            err.into_response()
        }
    }
}
