//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer le serveur HTTP
//! avec Axum, en cachant la configuration du routage.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **Routes JSON simples** : Ajoutez des endpoints avec `add_route()`
//! - 🔀 **Redirections** : Redirigez des routes avec `add_redirect()`
//! - 🎯 **Handlers personnalisés** : Support SSE avec `add_handler_with_state()`
//! - 📚 **Documentation API** : OpenAPI/Swagger automatique avec `add_openapi()`
//! - ⚡ **Gestion gracieuse** : Arrêt propre sur Ctrl+C

use crate::logs::{LogState, LoggingOptions, LogsApiDoc, create_logs_router, init_logging};
use crate::logs::{log_dump, log_sse};
use axum::handler::Handler;
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use plconfig::get_config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_DOCS_PATH: &str = "/docs";
const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Info serveur sérialisable
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
    pub docs_path: String,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    docs_path: String,
    router: Arc<RwLock<Router>>,
    openapi: Arc<RwLock<Option<utoipa::openapi::OpenApi>>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé dans les logs (ex: "localhost")
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            docs_path: DEFAULT_DOCS_PATH.to_string(),
            router: Arc::new(RwLock::new(Router::new())),
            openapi: Arc::new(RwLock::new(None)),
            join_handle: None,
        }
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie est appelée à chaque requête GET sur le chemin spécifié.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use plserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({
    ///         "status": "online",
    ///         "version": "1.0.0"
    ///     })
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).route(path, get(handler));
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route(path, get(handler)).with_state(state);
        self.add_router(route).await;
    }

    /// Fusionne un router non documenté (aucune entrée OpenAPI)
    pub async fn add_router(&mut self, router: Router) {
        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(router);
    }

    /// Ajoute une redirection HTTP permanente (308)
    ///
    /// ```rust,no_run
    /// # use plserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// // Rediriger la racine vers la documentation
    /// server.add_redirect("/", "/docs").await;
    /// # }
    /// ```
    pub async fn add_redirect(&mut self, from: &str, to: &str) {
        let target = to.to_string();
        let handler = get(move || async move { Redirect::permanent(&target) });

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).route(from, handler);
    }

    /// Ajoute une API documentée avec OpenAPI
    ///
    /// Les routes de `api_router` sont fusionnées telles quelles au router principal
    /// et `openapi` est fusionné au document déjà enregistré ; les métadonnées
    /// (`info`) du dernier document ajouté sont conservées. La Swagger UI est
    /// montée une seule fois, sur `docs_path`, au moment de construire le router
    /// final ; le document JSON est servi sur `/api-docs/openapi.json`.
    pub async fn add_openapi(&mut self, api_router: Router, openapi: utoipa::openapi::OpenApi) {
        {
            let mut doc = self.openapi.write().await;
            let mut merged = openapi;
            if let Some(existing) = doc.take() {
                merged.merge(existing);
            }
            *doc = Some(merged);
        }

        self.add_router(api_router).await;
    }

    /// Construit le router final (routes + Swagger UI si une API est documentée)
    pub async fn router(&self) -> Router {
        let router = self.router.read().await.clone();
        match self.openapi.read().await.clone() {
            Some(openapi) => router.merge(
                SwaggerUi::new(self.docs_path.clone()).url(OPENAPI_JSON_PATH, openapi),
            ),
            None => router,
        }
    }

    /// Démarre le serveur HTTP
    ///
    /// Ouvre le port configuré puis sert les requêtes en tâche de fond ;
    /// Ctrl+C déclenche un arrêt gracieux. Une erreur est renvoyée si le
    /// port ne peut pas être ouvert.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            "✅ Server {} running on http://{}:{}  | Swagger: {}",
            self.name, self.base_url, self.http_port, self.docs_path
        );

        let router = self.router().await;
        self.join_handle = Some(tokio::spawn(async move {
            let shutdown = async {
                if let Err(e) = signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Ctrl+C reçu, arrêt gracieux");
            };

            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("HTTP server error: {}", e);
            }
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
            docs_path: self.docs_path.clone(),
        }
    }

    pub fn docs_path(&self) -> &str {
        &self.docs_path
    }

    /// Initialise le système de logging et enregistre les routes de logs
    ///
    /// Installe le subscriber global puis enregistre `/log-sse`, `/log-dump`
    /// et l'API documentée `/api/log_setup`.
    ///
    /// ```rust,no_run
    /// # use plserver::{ServerBuilder, logs::LoggingOptions};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let mut server = ServerBuilder::new_configured().build();
    /// server.init_logging(LoggingOptions::default()).await?;
    /// server.start().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn init_logging(&mut self, options: LoggingOptions) -> anyhow::Result<()> {
        let log_state = init_logging(options)?;
        self.register_log_routes(log_state).await;
        Ok(())
    }

    /// Enregistre les routes de logs pour un `LogState` existant
    pub async fn register_log_routes(&mut self, log_state: LogState) {
        self.add_handler_with_state("/log-sse", log_sse, log_state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(create_logs_router(log_state), LogsApiDoc::openapi())
            .await;
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
    docs_path: String,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            docs_path: DEFAULT_DOCS_PATH.to_string(),
        }
    }

    /// Builder initialisé depuis la configuration globale (`plconfig`)
    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: "Playlist-API".to_string(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
            docs_path: config.get_docs_path(),
        }
    }

    /// Chemin de la Swagger UI (défaut : `/docs`)
    pub fn docs_path(mut self, path: impl Into<String>) -> Self {
        self.docs_path = path.into();
        self
    }

    /// Construit le serveur
    ///
    /// ```rust
    /// # use plserver::ServerBuilder;
    /// let server = ServerBuilder::new("MyAPI", "localhost", 3000)
    ///     .docs_path("/swagger")
    ///     .build();
    /// assert_eq!(server.docs_path(), "/swagger");
    /// ```
    pub fn build(self) -> Server {
        let mut server = Server::new(self.name, self.base_url, self.http_port);
        server.docs_path = self.docs_path;
        server
    }
}
