use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{Form, Json};

use tokenwatch_core::lifecycle::{
    self, ActionOutcome, ActionResult, FailureKind, LifecycleAction,
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ActionBody {
    #[serde(default)]
    accessor: String,
}

/// Run one lifecycle action against the shared authority handle. Actions do
/// not refresh any report; the redirect back to `/` triggers a fresh build.
async fn run_action(
    app: AppState,
    action: LifecycleAction,
    accessor: String,
) -> Result<ActionOutcome, AppError> {
    let outcome = tokio::task::spawn_blocking(move || match action {
        LifecycleAction::Renew => lifecycle::renew(
            &accessor,
            app.authority.as_ref(),
            app.config.renew_increment(),
        ),
        LifecycleAction::Revoke => lifecycle::revoke(&accessor, app.authority.as_ref()),
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    if let ActionResult::Failure { kind, detail } = &outcome.result {
        tracing::warn!(
            accessor = %outcome.accessor,
            action = %outcome.action,
            ?kind,
            "lifecycle action failed: {detail}"
        );
    }
    Ok(outcome)
}

fn status_for(outcome: &ActionOutcome) -> StatusCode {
    match &outcome.result {
        ActionResult::Success => StatusCode::OK,
        ActionResult::Failure { kind, .. } => match kind {
            FailureKind::MissingInput => StatusCode::BAD_REQUEST,
            FailureKind::PermissionDenied => StatusCode::FORBIDDEN,
            FailureKind::InvalidAccessor => StatusCode::NOT_FOUND,
            FailureKind::AuthorityError => StatusCode::BAD_GATEWAY,
        },
    }
}

fn redirect_with_message(outcome: &ActionOutcome) -> Redirect {
    let message = lifecycle::operator_message(outcome);
    Redirect::to(&format!("/?notice={}", urlencoding::encode(&message)))
}

fn outcome_json(outcome: &ActionOutcome) -> serde_json::Value {
    let mut value = serde_json::json!(outcome);
    value["message"] = serde_json::Value::String(lifecycle::operator_message(outcome));
    value
}

// ---------------------------------------------------------------------------
// Form endpoints (browser flow: act, then redirect to a fresh report)
// ---------------------------------------------------------------------------

/// POST /renew
pub async fn renew_form(
    State(app): State<AppState>,
    Form(body): Form<ActionBody>,
) -> Result<Redirect, AppError> {
    let outcome = run_action(app, LifecycleAction::Renew, body.accessor).await?;
    Ok(redirect_with_message(&outcome))
}

/// POST /revoke
pub async fn revoke_form(
    State(app): State<AppState>,
    Form(body): Form<ActionBody>,
) -> Result<Redirect, AppError> {
    let outcome = run_action(app, LifecycleAction::Revoke, body.accessor).await?;
    Ok(redirect_with_message(&outcome))
}

// ---------------------------------------------------------------------------
// JSON endpoints
// ---------------------------------------------------------------------------

/// POST /api/tokens/renew
pub async fn renew_api(
    State(app): State<AppState>,
    Json(body): Json<ActionBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = run_action(app, LifecycleAction::Renew, body.accessor).await?;
    Ok((status_for(&outcome), Json(outcome_json(&outcome))))
}

/// POST /api/tokens/revoke
pub async fn revoke_api(
    State(app): State<AppState>,
    Json(body): Json<ActionBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = run_action(app, LifecycleAction::Revoke, body.accessor).await?;
    Ok((status_for(&outcome), Json(outcome_json(&outcome))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(kind: FailureKind) -> ActionOutcome {
        ActionOutcome {
            accessor: "acc-1".to_string(),
            action: LifecycleAction::Renew,
            result: ActionResult::Failure {
                kind,
                detail: "detail".to_string(),
            },
        }
    }

    #[test]
    fn status_codes_track_failure_kind() {
        assert_eq!(
            status_for(&failure(FailureKind::MissingInput)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&failure(FailureKind::PermissionDenied)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&failure(FailureKind::InvalidAccessor)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&failure(FailureKind::AuthorityError)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn redirect_notice_is_percent_encoded() {
        use axum::response::IntoResponse;

        let outcome = ActionOutcome {
            accessor: "acc-1".to_string(),
            action: LifecycleAction::Renew,
            result: ActionResult::Success,
        };
        let response = redirect_with_message(&outcome).into_response();
        let location = response
            .headers()
            .get(axum::http::header::LOCATION)
            .unwrap();
        assert_eq!(location, "/?notice=Renewed%20token%20acc-1");
    }

    #[test]
    fn outcome_json_includes_operator_message() {
        let value = outcome_json(&failure(FailureKind::PermissionDenied));
        assert_eq!(value["accessor"], "acc-1");
        assert_eq!(value["result"], "failure");
        assert!(value["message"]
            .as_str()
            .unwrap()
            .contains("Permission denied"));
    }
}
