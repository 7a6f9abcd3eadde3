use super::seek::{Seek, Viewer};
use super::state::LobbyState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SeekListQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeekList {
    pub seeks: Vec<Seek>,
}

pub async fn list_seeks(
    State(state): State<Arc<LobbyState>>,
    Query(query): Query<SeekListQuery>,
) -> Json<SeekList> {
    let viewer = query.username.filter(|u| !u.is_empty()).map(Viewer::new);
    Json(SeekList {
        seeks: state.seeks_for(viewer.as_ref()),
    })
}

pub async fn get_seek(
    State(state): State<Arc<LobbyState>>,
    Path(id): Path<String>,
) -> Result<Json<Seek>, StatusCode> {
    state.find_seek(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
