//! Documentation OpenAPI pour les endpoints playlists.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API playlist.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_playlists,
        crate::api::get_playlist,
        crate::api::create_playlist,
        crate::api::update_playlist,
        crate::api::delete_playlist,
    ),
    components(
        schemas(
            crate::Playlist,
            crate::CreatePlaylistRequest,
            crate::UpdatePlaylistRequest,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "playlists", description = "Gestion des playlists en mémoire")
    ),
    info(
        title = "Playlist API",
        version = "1.0.0",
        description = r#"
# API de gestion de playlists (en mémoire)

Chaque playlist comporte un identifiant attribué par le serveur, un nom et une
liste ordonnée de titres. Les données sont perdues à l'arrêt du serveur.

## Endpoints

### GET /playlists
Liste toutes les playlists dans l'ordre d'insertion

### GET /playlists/{id}
Récupère une playlist

### POST /playlists
Crée une playlist ; `name` (chaîne non vide) et `songs` (tableau de chaînes)
sont obligatoires

### PUT /playlists/{id}
Remplace les champs fournis (`name` et/ou `songs`) ; les autres sont conservés

### DELETE /playlists/{id}
Supprime une playlist (204)

## Erreurs

Les erreurs sont renvoyées sous la forme `{"error": "<message>"}` :
- 400 : corps invalide (ex. `name is required (string)`)
- 404 : `Playlist not found`
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
