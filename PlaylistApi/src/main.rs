use std::sync::Arc;

use plconfig::get_config;
use plserver::{LoggingOptions, ServerBuilder, logs::init_logging};
use plstore::{PlaylistApiExt, PlaylistStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure ==========
    // Le chargement de la configuration précède le subscriber : on rapporte
    // son origine une fois les logs installés.
    let config = get_config();
    let log_state = init_logging(LoggingOptions::from_config(&config))?;
    match config.source() {
        Some(path) => info!(config_file = %path.display(), "Configuration loaded"),
        None => info!("Configuration loaded from embedded defaults"),
    }

    let mut server = ServerBuilder::new_configured().build();
    server.register_log_routes(log_state).await;

    // ========== PHASE 2 : API playlists ==========
    let store = Arc::new(PlaylistStore::with_seed());
    info!("🎵 {} playlist(s) loaded", store.len());
    server.init_playlist_api(store).await?;

    // La racine renvoie vers la documentation interactive
    let docs_path = server.docs_path().to_string();
    server.add_redirect("/", &docs_path).await;

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
