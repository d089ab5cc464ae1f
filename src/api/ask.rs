use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::error::{ApiError, MISSING_QUESTION};
use crate::models::{AskRequest, AskResponse};
use crate::state::AppState;

/// POST /ask - Answer a question from the indexed passages:
///   1. Embed the question
///   2. Retrieve the top-k nearest passages
///   3. Fill the prompt template with context + question
///   4. Return the model output verbatim
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = match payload {
        Ok(Json(req)) => req.question.filter(|q| !q.trim().is_empty()),
        Err(rejection) => {
            tracing::debug!("Rejected /ask body: {rejection}");
            None
        }
    };

    let Some(question) = question else {
        state.logger.error(MISSING_QUESTION, true).await;
        return Err(ApiError::BadRequest(MISSING_QUESTION.to_string()));
    };

    state.logger.info(question.clone());

    match state.rag.answer(&question).await {
        Ok(answer) => {
            state.logger.info(answer.clone());
            Ok(Json(AskResponse { question, answer }))
        }
        Err(e) => {
            let message = format!("{e:#}");
            state.logger.error(message.clone(), true).await;
            Err(ApiError::Internal(message))
        }
    }
}
