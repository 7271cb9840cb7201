//! # plstore - Service de playlists en mémoire
//!
//! Cette crate fournit le store de playlists et son API REST :
//! - Liste, lecture, création, mise à jour partielle et suppression
//! - Validation explicite des corps de requête
//! - Routes Axum et documentation OpenAPI (feature `plserver`)
//!
//! # Architecture
//!
//! - **PlaylistStore** : propriétaire unique des playlists, partagé par `Arc`
//! - **CreatePlaylistRequest / UpdatePlaylistRequest** : schéma d'entrée validé
//!   avant toute modification du store
//! - **PlaylistApiExt** : enregistre l'API sur un `plserver::Server`
//!
//! # Exemple d'utilisation
//!
//! ```
//! use plstore::{CreatePlaylistRequest, PlaylistStore, UpdatePlaylistRequest};
//!
//! let store = PlaylistStore::with_seed();
//!
//! let created = store.create(&CreatePlaylistRequest::new("Top Hits", &["A", "B"]))?;
//! assert_eq!(created.id, 3);
//!
//! let updated = store.update(created.id, &UpdatePlaylistRequest::songs(&["X"]))?;
//! assert_eq!(updated.name, "Top Hits");
//!
//! store.delete(created.id)?;
//! assert!(store.get(created.id).is_err());
//! # Ok::<(), plstore::Error>(())
//! ```

mod error;
mod playlist;
mod store;

#[cfg(feature = "plserver")]
pub mod api;
#[cfg(feature = "plserver")]
pub mod openapi;
#[cfg(feature = "plserver")]
mod plserver_impl;

// Réexports publics
pub use error::{Error, Result};
pub use playlist::{
    CreatePlaylistRequest, NewPlaylist, Playlist, PlaylistPatch, UpdatePlaylistRequest,
};
pub use store::PlaylistStore;

#[cfg(feature = "plserver")]
pub use openapi::ApiDoc;
#[cfg(feature = "plserver")]
pub use plserver_impl::PlaylistApiExt;
