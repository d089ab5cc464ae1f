use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use crate::models::LogsQuery;
use crate::state::AppState;

/// GET /logs?limit=N - The last N log lines as plain text, oldest first.
/// A `limit` that is not a non-negative integer falls back to the default.
pub async fn logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> String {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("Ignoring bad /logs query: {rejection}");
            LogsQuery::default()
        }
    };
    let limit = query.limit.min(state.logger.capacity());
    state.logger.render_tail(limit)
}
