use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    notice: Option<String>,
}

/// GET / — server-rendered inventory table. The report is rebuilt from the
/// token source and the authority on every load.
pub async fn index(
    State(app): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, AppError> {
    let state = app.clone();
    let report = tokio::task::spawn_blocking(move || state.build_report())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
    Ok(Html(render::render_index(
        &report,
        params.notice.as_deref(),
    )))
}

/// GET /api/tokens — the inventory report as JSON, with the derived
/// expiring-soon flag and formatted absolute expiry per entry.
pub async fn list_tokens(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let state = app.clone();
    let report = tokio::task::spawn_blocking(move || state.build_report())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    let tokens: Vec<serde_json::Value> = report
        .statuses
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "accessor": s.accessor,
                "policies": s.policies,
                "expiry": s.expiry,
                "expiring_soon": s.is_expiring_soon(),
                "expires_at": s.raw_expiry_time,
                "expires_at_display": s.absolute_expiry(),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "generated_at": report.generated_at,
        "source_error": report.source_error,
        "tokens": tokens,
    })))
}
