/// GET /search?q=
use crate::{
    api::{ApiError, AppState},
    search::{self, SearchHit},
};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn create_search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_all))
}

async fn search_all(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    Ok(Json(search::search(&state.pool, &params.q).await?))
}
