//! Implémentation du trait PlaylistApiExt pour le serveur plserver
//!
//! `plstore` étend `plserver::Server` sans que `plserver` connaisse `plstore` :
//! les routes REST et leur documentation sont ajoutées via un trait d'extension.
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plstore::{PlaylistApiExt, PlaylistStore};
//! use plserver::ServerBuilder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut server = ServerBuilder::new("MyApp", "localhost", 3000).build();
//! server.init_playlist_api(Arc::new(PlaylistStore::with_seed())).await?;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use plserver::Server;
use tracing::info;
use utoipa::OpenApi;

use crate::{ApiDoc, PlaylistStore, api};

/// Trait d'extension pour exposer le store de playlists sur un serveur
pub trait PlaylistApiExt {
    /// Enregistre les routes REST et la documentation OpenAPI
    ///
    /// # Routes enregistrées
    ///
    /// - `GET/POST /playlists`
    /// - `GET/PUT/DELETE /playlists/{id}`
    /// - Swagger UI sur le chemin de documentation du serveur
    async fn init_playlist_api(&mut self, store: Arc<PlaylistStore>) -> anyhow::Result<()>;
}

impl PlaylistApiExt for Server {
    async fn init_playlist_api(&mut self, store: Arc<PlaylistStore>) -> anyhow::Result<()> {
        info!(playlists = store.len(), "Registering playlist API");

        let api_router = api::playlist_api_router(store.clone());
        self.add_openapi(api_router, ApiDoc::openapi()).await;

        // Statut de santé : `/info`
        let name = self.info().name;
        self.add_route("/info", move || {
            let name = name.clone();
            let store = store.clone();
            async move {
                serde_json::json!({
                    "name": name,
                    "version": env!("CARGO_PKG_VERSION"),
                    "status": "ok",
                    "playlists": store.len(),
                })
            }
        })
        .await;

        Ok(())
    }
}
