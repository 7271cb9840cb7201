//! Store en mémoire des playlists.
//!
//! Toutes les opérations passent par un unique `Mutex` : l'attribution d'un
//! identifiant (`max + 1`) et les suppressions ne sont sûres que sérialisées.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::playlist::{CreatePlaylistRequest, Playlist, UpdatePlaylistRequest};

/// Store de playlists, propriétaire exclusif des enregistrements.
///
/// Une seule instance est créée au démarrage et partagée par `Arc` avec les
/// handlers HTTP. Son contenu disparaît avec le processus.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    playlists: Mutex<Vec<Playlist>>,
}

impl PlaylistStore {
    /// Store vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Store initialisé avec le jeu de données de démarrage
    pub fn with_seed() -> Self {
        Self::from_playlists(vec![
            Playlist::new(
                1,
                "Chill Vibes",
                vec!["Sunset Lover".into(), "Ocean Eyes".into()],
            ),
            Playlist::new(
                2,
                "Workout Mix",
                vec!["Stronger".into(), "Eye of the Tiger".into()],
            ),
        ])
    }

    /// Store initialisé avec des playlists existantes (identifiants supposés uniques).
    ///
    /// Si l'une d'elles porte l'identifiant `u64::MAX`, toute création
    /// ultérieure échoue avec `InvalidArgument`.
    pub fn from_playlists(playlists: Vec<Playlist>) -> Self {
        Self {
            playlists: Mutex::new(playlists),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Playlist>> {
        self.playlists.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Toutes les playlists, dans l'ordre d'insertion
    pub fn list(&self) -> Vec<Playlist> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, id: u64) -> Result<Playlist> {
        self.lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    /// Valide la requête puis ajoute la playlist en fin de liste.
    ///
    /// L'identifiant vaut le maximum courant + 1 (ou 1 si le store est vide) ;
    /// il est recalculé à chaque création, un identifiant supprimé peut donc
    /// être réattribué.
    pub fn create(&self, request: &CreatePlaylistRequest) -> Result<Playlist> {
        let new = request.validate()?;

        let mut playlists = self.lock();
        let id = match playlists.iter().map(|p| p.id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| Error::invalid("no playlist id left"))?,
        };
        let playlist = Playlist::new(id, new.name, new.songs);
        playlists.push(playlist.clone());

        info!(id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    /// Fusionne les champs fournis dans la playlist existante.
    ///
    /// L'existence est vérifiée avant la validation du corps, et rien n'est
    /// modifié si la validation échoue.
    pub fn update(&self, id: u64, request: &UpdatePlaylistRequest) -> Result<Playlist> {
        let mut playlists = self.lock();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::NotFound(id))?;

        let patch = request.validate()?;
        playlist.apply(patch);

        debug!(id, "Playlist updated");
        Ok(playlist.clone())
    }

    /// Retire la playlist ; les autres gardent leur identifiant et leur ordre.
    pub fn delete(&self, id: u64) -> Result<()> {
        let mut playlists = self.lock();
        let index = playlists
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::NotFound(id))?;
        playlists.remove(index);

        info!(id, "Playlist deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn ids(store: &PlaylistStore) -> Vec<u64> {
        store.list().iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_seed() {
        let store = PlaylistStore::with_seed();
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.get(1).unwrap().name, "Chill Vibes");
        assert_eq!(
            store.get(2).unwrap().songs,
            vec!["Stronger", "Eye of the Tiger"]
        );
    }

    #[test]
    fn test_create_assigns_max_plus_one() {
        let store = PlaylistStore::with_seed();
        let created = store
            .create(&CreatePlaylistRequest::new("Top Hits", &["A", "B"]))
            .unwrap();

        assert_eq!(
            created,
            Playlist::new(3, "Top Hits", vec!["A".into(), "B".into()])
        );
        assert_eq!(store.len(), 3);
        assert_eq!(store.list().last(), Some(&created));
    }

    #[test]
    fn test_create_in_empty_store_starts_at_one() {
        let store = PlaylistStore::new();
        assert!(store.is_empty());
        let created = store
            .create(&CreatePlaylistRequest::new("First", &[]))
            .unwrap();
        assert_eq!(created.id, 1);
    }

    #[test]
    fn test_create_uses_max_not_count() {
        let store = PlaylistStore::from_playlists(vec![
            Playlist::new(1, "a", vec![]),
            Playlist::new(7, "b", vec![]),
        ]);
        let created = store.create(&CreatePlaylistRequest::new("c", &[])).unwrap();
        assert_eq!(created.id, 8);
    }

    #[test]
    fn test_create_fails_when_ids_are_exhausted() {
        let store = PlaylistStore::from_playlists(vec![Playlist::new(u64::MAX, "last", vec![])]);
        let err = store.create(&CreatePlaylistRequest::new("x", &[])).unwrap_err();

        assert_eq!(err, Error::InvalidArgument("no playlist id left".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parallel_creates_get_distinct_ids() {
        const WORKERS: usize = 8;
        const PER_WORKER: usize = 25;

        let store = Arc::new(PlaylistStore::with_seed());
        let handles: Vec<_> = (0..WORKERS)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..PER_WORKER)
                        .map(|i| {
                            let name = format!("w{worker}-{i}");
                            store
                                .create(&CreatePlaylistRequest::new(name, &["A"]))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let created: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let distinct: HashSet<u64> = created.iter().copied().collect();

        assert_eq!(created.len(), WORKERS * PER_WORKER);
        assert_eq!(distinct.len(), WORKERS * PER_WORKER);
        assert!(!distinct.contains(&1) && !distinct.contains(&2));
        assert_eq!(store.len(), WORKERS * PER_WORKER + 2);
    }

    #[test]
    fn test_id_reused_after_deleting_max() {
        let store = PlaylistStore::with_seed();
        store.delete(2).unwrap();
        let created = store.create(&CreatePlaylistRequest::new("Again", &[])).unwrap();
        assert_eq!(created.id, 2);
    }

    #[test]
    fn test_invalid_create_leaves_store_untouched() {
        let store = PlaylistStore::with_seed();
        let err = store
            .create(&CreatePlaylistRequest::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "name is required (string)");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_partial_update_keeps_other_field() {
        let store = PlaylistStore::with_seed();

        let updated = store
            .update(1, &UpdatePlaylistRequest::songs(&["X"]))
            .unwrap();
        assert_eq!(updated.name, "Chill Vibes");
        assert_eq!(updated.songs, vec!["X"]);

        let renamed = store
            .update(1, &UpdatePlaylistRequest::name("Late Night"))
            .unwrap();
        assert_eq!(renamed.name, "Late Night");
        assert_eq!(renamed.songs, vec!["X"]);
        assert_eq!(store.get(1).unwrap(), renamed);
    }

    #[test]
    fn test_update_checks_existence_before_body() {
        let store = PlaylistStore::with_seed();
        let bad_body = UpdatePlaylistRequest {
            name: Some(serde_json::json!(5)),
            songs: None,
        };

        assert_eq!(store.update(99, &bad_body), Err(Error::NotFound(99)));
        assert_eq!(
            store.update(1, &bad_body).unwrap_err().to_string(),
            "name must be a string"
        );
        assert_eq!(store.get(1).unwrap().name, "Chill Vibes");
    }

    #[test]
    fn test_failed_update_does_not_apply_valid_fields() {
        let store = PlaylistStore::with_seed();
        let body = UpdatePlaylistRequest {
            name: Some(serde_json::json!("Renamed")),
            songs: Some(serde_json::json!([1, 2])),
        };

        assert!(store.update(1, &body).is_err());
        assert_eq!(store.get(1).unwrap().name, "Chill Vibes");
    }

    #[test]
    fn test_delete() {
        let store = PlaylistStore::with_seed();
        store.create(&CreatePlaylistRequest::new("Third", &[])).unwrap();

        store.delete(2).unwrap();
        assert_eq!(store.get(2), Err(Error::NotFound(2)));
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn test_missing_id_never_mutates() {
        let store = PlaylistStore::with_seed();
        let before = store.list();

        assert_eq!(store.get(42), Err(Error::NotFound(42)));
        assert_eq!(
            store.update(42, &UpdatePlaylistRequest::name("x")),
            Err(Error::NotFound(42))
        );
        assert_eq!(store.delete(42), Err(Error::NotFound(42)));
        assert_eq!(store.list(), before);
    }
}
