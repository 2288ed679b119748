//! Wire types shared by the API client and both views.
//!
//! Field names follow the backend's JSON (Spanish keys) through serde
//! renames, so the Rust side reads naturally while the wire stays untouched.

use serde::{Deserialize, Deserializer, Serialize};

/// A magazine issue as returned by `GET /api/ediciones`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
    /// Opaque identifier, stable across navigation.
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Absolute URL or image storage key. May be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cover_url: String,
    /// Publication date as sent by the backend (ISO date or timestamp).
    #[serde(rename = "fecha", default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(rename = "publicada", default, deserialize_with = "flag")]
    pub published: bool,
}

/// One page image of an edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(rename = "edicion_id", default, skip_serializing_if = "Option::is_none")]
    pub edition_id: Option<String>,
    #[serde(rename = "imagen_url")]
    pub image_url: String,
    /// Ordering key, unique within an edition.
    #[serde(rename = "numero")]
    pub number: u32,
}

/// Response wrapper used by most backend routes.
///
/// Some deployments return the payload bare, so both shapes decode.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        success: bool,
        data: Option<T>,
        error: Option<String>,
        message: Option<String>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwrap the payload, or return the backend's explanation when it
    /// reported failure.
    pub fn into_data(self) -> Result<T, String> {
        match self {
            Envelope::Bare(data) => Ok(data),
            Envelope::Wrapped {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope::Wrapped {
                success: true,
                data: None,
                ..
            } => Err("response envelope has no data".to_string()),
            Envelope::Wrapped { error, message, .. } => Err(error
                .or(message)
                .unwrap_or_else(|| "backend reported failure".to_string())),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// SQLite-backed deployments send `0`/`1` where others send booleans, and
/// some send either as a string.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Str(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        Flag::Null(()) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edition_decodes_spanish_keys() {
        let json = r#"{
            "id": "e1",
            "titulo": "Primavera",
            "descripcion": "Número de primavera",
            "cover_url": "covers/e1.jpg",
            "fecha": "2024-03-15",
            "publicada": true
        }"#;
        let edition: Edition = serde_json::from_str(json).unwrap();
        assert_eq!(edition.title, "Primavera");
        assert_eq!(edition.cover_url, "covers/e1.jpg");
        assert!(edition.published);
    }

    #[test]
    fn edition_published_accepts_integers() {
        let json = r#"{"id": "e1", "titulo": "T", "publicada": 1}"#;
        let edition: Edition = serde_json::from_str(json).unwrap();
        assert!(edition.published);

        let json = r#"{"id": "e2", "titulo": "T", "publicada": 0}"#;
        let edition: Edition = serde_json::from_str(json).unwrap();
        assert!(!edition.published);
    }

    #[test]
    fn edition_published_accepts_strings() {
        for (raw, expected) in [
            (r#""1""#, true),
            (r#""true""#, true),
            (r#"" TRUE ""#, true),
            (r#""0""#, false),
            (r#""false""#, false),
            (r#""""#, false),
        ] {
            let json = format!(r#"{{"id": "e1", "titulo": "T", "publicada": {raw}}}"#);
            let edition: Edition = serde_json::from_str(&json).unwrap();
            assert_eq!(edition.published, expected, "publicada = {raw}");
        }
    }

    #[test]
    fn string_flags_do_not_fail_the_whole_list() {
        let json = r#"[
            {"id": "a", "titulo": "A", "publicada": "1"},
            {"id": "b", "titulo": "B", "publicada": false}
        ]"#;
        let editions: Vec<Edition> = serde_json::from_str(json).unwrap();
        assert_eq!(editions.len(), 2);
        assert!(editions[0].published);
        assert!(!editions[1].published);
    }

    #[test]
    fn edition_tolerates_nulls_and_missing_fields() {
        let json = r#"{"id": "e1", "titulo": "T", "cover_url": null, "publicada": null}"#;
        let edition: Edition = serde_json::from_str(json).unwrap();
        assert_eq!(edition.cover_url, "");
        assert_eq!(edition.description, "");
        assert_eq!(edition.date, "");
        assert!(!edition.published);
    }

    #[test]
    fn page_decodes_with_and_without_edition_id() {
        let json = r#"{"id": "p1", "edicion_id": "e1", "imagen_url": "k1", "numero": 1}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.edition_id.as_deref(), Some("e1"));
        assert_eq!(page.number, 1);

        let json = r#"{"id": "p2", "imagen_url": "k2", "numero": 2}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.edition_id, None);
    }

    #[test]
    fn envelope_unwraps_success_data() {
        let json = r#"{"success": true, "data": [{"id": "p1", "imagen_url": "k", "numero": 1}]}"#;
        let envelope: Envelope<Vec<Page>> = serde_json::from_str(json).unwrap();
        let pages = envelope.into_data().unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn envelope_accepts_bare_arrays() {
        let json = r#"[{"id": "p1", "imagen_url": "k", "numero": 1}]"#;
        let envelope: Envelope<Vec<Page>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.into_data().unwrap()[0].id, "p1");

        let envelope: Envelope<Vec<Page>> = serde_json::from_str("[]").unwrap();
        assert!(envelope.into_data().unwrap().is_empty());
    }

    #[test]
    fn envelope_failure_carries_backend_message() {
        let json = r#"{"success": false, "error": "database offline"}"#;
        let envelope: Envelope<Vec<Page>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.into_data().unwrap_err(), "database offline");
    }

    #[test]
    fn envelope_success_without_data_is_an_error() {
        let json = r#"{"success": true}"#;
        let envelope: Envelope<Vec<Page>> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_data().is_err());
    }

    #[test]
    fn envelope_rejects_unrelated_shapes() {
        let result: Result<Envelope<Vec<Page>>, _> = serde_json::from_str(r#"{"pages": []}"#);
        assert!(result.is_err());
    }
}
