//! Types d'erreurs pour plstore

/// Erreurs du service de playlists
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Aucune playlist ne porte cet identifiant
    #[error("Playlist not found")]
    NotFound(u64),

    /// Le corps de la requête ne passe pas la validation
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid(message: &str) -> Self {
        Self::InvalidArgument(message.to_string())
    }
}

/// Type Result spécialisé pour plstore
pub type Result<T> = std::result::Result<T, Error>;
