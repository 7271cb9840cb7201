//! API REST pour la gestion des playlists.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::{CreatePlaylistRequest, Error, Playlist, PlaylistStore, UpdatePlaylistRequest};

/// Router `/playlists` combinant les différents endpoints REST.
pub fn playlist_api_router(store: Arc<PlaylistStore>) -> Router {
    Router::new()
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/playlists/{id}",
            get(get_playlist)
                .put(update_playlist)
                .delete(delete_playlist),
        )
        .with_state(store)
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Playlist not found")]
    pub error: String,
}

#[utoipa::path(
    get,
    path = "/playlists",
    tag = "playlists",
    responses(
        (status = 200, description = "Liste de toutes les playlists", body = [Playlist])
    )
)]
pub async fn list_playlists(State(store): State<Arc<PlaylistStore>>) -> Response {
    (StatusCode::OK, Json(store.list())).into_response()
}

#[utoipa::path(
    get,
    path = "/playlists/{id}",
    tag = "playlists",
    params(
        ("id" = u64, Path, description = "Identifiant de la playlist")
    ),
    responses(
        (status = 200, description = "Playlist trouvée", body = Playlist),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn get_playlist(
    State(store): State<Arc<PlaylistStore>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let result = playlist_id(id).and_then(|id| store.get(id));
    respond(StatusCode::OK, result)
}

#[utoipa::path(
    post,
    path = "/playlists",
    tag = "playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist créée", body = Playlist),
        (status = 400, description = "Requête invalide", body = ErrorResponse)
    )
)]
pub async fn create_playlist(
    State(store): State<Arc<PlaylistStore>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return map_rejection(rejection),
    };
    let result = CreatePlaylistRequest::try_from(body).and_then(|req| store.create(&req));
    respond(StatusCode::CREATED, result)
}

#[utoipa::path(
    put,
    path = "/playlists/{id}",
    tag = "playlists",
    params(
        ("id" = u64, Path, description = "Identifiant de la playlist")
    ),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist mise à jour", body = Playlist),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn update_playlist(
    State(store): State<Arc<PlaylistStore>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let id = match playlist_id(id) {
        Ok(id) => id,
        Err(err) => return map_error(err),
    };
    // Un identifiant inconnu l'emporte sur un corps illisible
    if let Err(err) = store.get(id) {
        return map_error(err);
    }
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return map_rejection(rejection),
    };
    let result = UpdatePlaylistRequest::try_from(body).and_then(|req| store.update(id, &req));
    respond(StatusCode::OK, result)
}

#[utoipa::path(
    delete,
    path = "/playlists/{id}",
    tag = "playlists",
    params(
        ("id" = u64, Path, description = "Identifiant de la playlist")
    ),
    responses(
        (status = 204, description = "Playlist supprimée"),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn delete_playlist(
    State(store): State<Arc<PlaylistStore>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    match playlist_id(id).and_then(|id| store.delete(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(err),
    }
}

/// Un identifiant non numérique ne peut désigner aucune playlist.
fn playlist_id(id: Result<Path<u64>, PathRejection>) -> crate::Result<u64> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Unparsable playlist id: {}", rejection.body_text());
            Err(Error::NotFound(0))
        }
    }
}

fn respond(status: StatusCode, result: crate::Result<Playlist>) -> Response {
    match result {
        Ok(playlist) => (status, Json(playlist)).into_response(),
        Err(err) => map_error(err),
    }
}

fn map_status<S: Into<String>>(status: StatusCode, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: Error) -> Response {
    let status = match error {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    };
    debug!(%status, "{}", error);
    map_status(status, error.to_string())
}

fn map_rejection(rejection: JsonRejection) -> Response {
    debug!("Rejected request body: {}", rejection.body_text());
    map_status(StatusCode::BAD_REQUEST, rejection.body_text())
}
