use std::collections::BTreeMap;

use axum::Json;

use crate::models::HomeResponse;

/// GET / - Static service description.
pub async fn home() -> Json<HomeResponse> {
    let endpoints = BTreeMap::from([
        (
            "/ask (POST)".to_string(),
            "Send a question and get model answer.".to_string(),
        ),
        (
            "/logs (GET)".to_string(),
            "Plain-text tail of the service log; use ?limit=N.".to_string(),
        ),
    ]);

    Json(HomeResponse {
        message: "Medical RAG API is running!".to_string(),
        endpoints,
    })
}
