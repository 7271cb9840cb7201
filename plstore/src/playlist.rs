//! Modèle de données et validation des requêtes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

const NAME_REQUIRED: &str = "name is required (string)";
const SONGS_REQUIRED: &str = "songs is required (array of strings)";
const NAME_NOT_STRING: &str = "name must be a string";
const SONGS_NOT_STRINGS: &str = "songs must be an array of strings";
const BODY_NOT_OBJECT: &str = "request body must be a JSON object";

/// Une playlist : un identifiant attribué par le store, un nom et des titres ordonnés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "plserver", derive(utoipa::ToSchema))]
pub struct Playlist {
    #[cfg_attr(feature = "plserver", schema(example = 1))]
    pub id: u64,
    #[cfg_attr(feature = "plserver", schema(example = "Chill Vibes"))]
    pub name: String,
    #[cfg_attr(feature = "plserver", schema(example = json!(["Sunset Lover", "Ocean Eyes"])))]
    pub songs: Vec<String>,
}

impl Playlist {
    pub fn new(id: u64, name: impl Into<String>, songs: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            songs,
        }
    }

    /// Remplace uniquement les champs fournis ; l'identifiant ne change jamais.
    pub fn apply(&mut self, patch: PlaylistPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(songs) = patch.songs {
            self.songs = songs;
        }
    }
}

/// Champs validés d'une création
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    pub name: String,
    pub songs: Vec<String>,
}

/// Champs validés d'une mise à jour partielle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPatch {
    pub name: Option<String>,
    pub songs: Option<Vec<String>>,
}

/// Corps de `POST /playlists`.
///
/// Les champs restent en JSON brut : une valeur mal typée doit produire le
/// message de validation documenté et non un rejet générique du corps.
/// Un champ absent vaut `None`, un champ à `null` vaut `Some(Value::Null)`.
/// Seul un objet JSON est accepté (voir `TryFrom<Value>`).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "plserver", derive(utoipa::ToSchema))]
pub struct CreatePlaylistRequest {
    #[cfg_attr(feature = "plserver", schema(value_type = String, required = true, example = "Top Hits"))]
    pub name: Option<Value>,
    #[cfg_attr(feature = "plserver", schema(value_type = Vec<String>, required = true, example = json!(["A", "B"])))]
    pub songs: Option<Value>,
}

/// Corps de `PUT /playlists/{id}` : chaque champ est optionnel.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "plserver", derive(utoipa::ToSchema))]
pub struct UpdatePlaylistRequest {
    #[cfg_attr(feature = "plserver", schema(value_type = Option<String>, example = "Road Trip"))]
    pub name: Option<Value>,
    #[cfg_attr(feature = "plserver", schema(value_type = Option<Vec<String>>, example = json!(["X"])))]
    pub songs: Option<Value>,
}

/// Les clés inconnues (dont `id`) sont ignorées.
fn object_fields(body: Value) -> Result<(Option<Value>, Option<Value>)> {
    match body {
        Value::Object(mut fields) => Ok((fields.remove("name"), fields.remove("songs"))),
        _ => Err(Error::invalid(BODY_NOT_OBJECT)),
    }
}

impl TryFrom<Value> for CreatePlaylistRequest {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self> {
        let (name, songs) = object_fields(body)?;
        Ok(Self { name, songs })
    }
}

impl TryFrom<Value> for UpdatePlaylistRequest {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self> {
        let (name, songs) = object_fields(body)?;
        Ok(Self { name, songs })
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

impl CreatePlaylistRequest {
    pub fn new(name: impl Into<String>, songs: &[&str]) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            songs: Some(Value::from(songs.to_vec())),
        }
    }

    /// Le nom est vérifié avant les titres : seule la première erreur est rapportée.
    pub fn validate(&self) -> Result<NewPlaylist> {
        let name = match &self.name {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(Error::invalid(NAME_REQUIRED)),
        };
        let songs = self
            .songs
            .as_ref()
            .and_then(string_array)
            .ok_or_else(|| Error::invalid(SONGS_REQUIRED))?;

        Ok(NewPlaylist { name, songs })
    }
}

impl UpdatePlaylistRequest {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            songs: None,
        }
    }

    pub fn songs(songs: &[&str]) -> Self {
        Self {
            name: None,
            songs: Some(Value::from(songs.to_vec())),
        }
    }

    pub fn validate(&self) -> Result<PlaylistPatch> {
        let name = match &self.name {
            None => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(Error::invalid(NAME_NOT_STRING)),
        };
        let songs = match &self.songs {
            None => None,
            Some(value) => Some(string_array(value).ok_or_else(|| Error::invalid(SONGS_NOT_STRINGS))?),
        };

        Ok(PlaylistPatch { name, songs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(body: Value) -> Result<NewPlaylist> {
        CreatePlaylistRequest::try_from(body)?.validate()
    }

    fn update(body: Value) -> Result<PlaylistPatch> {
        UpdatePlaylistRequest::try_from(body)?.validate()
    }

    #[test]
    fn test_create_valid() {
        let new = create(json!({"name": "Top Hits", "songs": ["A", "B"]})).unwrap();
        assert_eq!(new.name, "Top Hits");
        assert_eq!(new.songs, vec!["A", "B"]);

        let empty = create(json!({"name": "Silence", "songs": []})).unwrap();
        assert!(empty.songs.is_empty());
    }

    #[test]
    fn test_create_rejects_bad_name() {
        let expected = Err(Error::invalid(NAME_REQUIRED));
        assert_eq!(create(json!({"songs": ["A"]})), expected);
        assert_eq!(create(json!({"name": "", "songs": ["A"]})), expected);
        assert_eq!(create(json!({"name": 12, "songs": ["A"]})), expected);
        assert_eq!(create(json!({"name": null, "songs": ["A"]})), expected);
    }

    #[test]
    fn test_create_name_checked_before_songs() {
        assert_eq!(
            create(json!({"songs": "not an array"})),
            Err(Error::invalid(NAME_REQUIRED))
        );
    }

    #[test]
    fn test_create_rejects_bad_songs() {
        let expected = Err(Error::invalid(SONGS_REQUIRED));
        assert_eq!(create(json!({"name": "X"})), expected);
        assert_eq!(create(json!({"name": "X", "songs": "A"})), expected);
        assert_eq!(create(json!({"name": "X", "songs": ["A", 5]})), expected);
        assert_eq!(create(json!({"name": "X", "songs": null})), expected);
    }

    #[test]
    fn test_update_fields_are_optional() {
        assert_eq!(update(json!({})).unwrap(), PlaylistPatch::default());

        let patch = update(json!({"songs": ["X"], "id": 42})).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.songs, Some(vec!["X".to_string()]));
    }

    #[test]
    fn test_update_rejects_bad_types() {
        assert_eq!(
            update(json!({"name": 3})),
            Err(Error::invalid(NAME_NOT_STRING))
        );
        assert_eq!(
            update(json!({"name": null})),
            Err(Error::invalid(NAME_NOT_STRING))
        );
        assert_eq!(
            update(json!({"songs": [1]})),
            Err(Error::invalid(SONGS_NOT_STRINGS))
        );
        assert_eq!(
            update(json!({"name": false, "songs": [1]})),
            Err(Error::invalid(NAME_NOT_STRING))
        );
    }

    #[test]
    fn test_only_objects_are_request_bodies() {
        let expected = Err(Error::invalid(BODY_NOT_OBJECT));
        assert_eq!(create(json!(["Array Body", ["A"]])), expected);
        assert_eq!(create(json!("Top Hits")), expected);
        assert_eq!(create(Value::Null), expected);
        let expected = Err(Error::invalid(BODY_NOT_OBJECT));
        assert_eq!(update(json!(["Array Body", ["A"]])), expected);
        assert_eq!(update(json!(42)), expected);
    }

    #[test]
    fn test_apply_patch() {
        let mut playlist = Playlist::new(1, "Chill Vibes", vec!["Ocean Eyes".into()]);
        playlist.apply(PlaylistPatch {
            name: None,
            songs: Some(vec!["X".into()]),
        });
        assert_eq!(playlist, Playlist::new(1, "Chill Vibes", vec!["X".into()]));
    }
}
