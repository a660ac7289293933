//! Request bodies and their validation.
//!
//! Missing and `null` string fields deserialize to `""` so that absent, null
//! and empty values all fail validation with the same message.

use serde::{Deserialize, Deserializer};
use service_core::error::AppError;
use validator::{Validate, ValidationErrors};

use crate::models::{Song, SongRef};

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Picks the message of the first failing field, in `order`.
fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let field_errors = errors.field_errors();
    order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// A request body that validates into a single, ordered error message.
pub trait CheckedRequest: Validate {
    /// Fields in the order their errors are reported.
    const FIELD_ORDER: &'static [&'static str];

    fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::BadRequest(anyhow::anyhow!(first_message(
                &errors,
                Self::FIELD_ORDER
            )))
        })?;
        self.check_blank()
    }

    /// Whitespace-only checks, which the derive cannot express.
    fn check_blank(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn require_non_blank(value: &str, message: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(message)));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateArtistRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Artist name is required"))]
    pub name: String,
}

impl CheckedRequest for CreateArtistRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name"];

    fn check_blank(&self) -> Result<(), AppError> {
        require_non_blank(&self.name, "Artist name is required")
    }
}

/// Song appended to an artist. `duration` is opaque; only emptiness is checked.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSongRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Title and duration are required"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Title and duration are required"))]
    pub duration: String,
}

impl CheckedRequest for AddSongRequest {
    const FIELD_ORDER: &'static [&'static str] = &["title", "duration"];
}

impl From<AddSongRequest> for Song {
    fn from(request: AddSongRequest) -> Self {
        Self {
            title: request.title,
            duration: request.duration,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Playlist name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl CheckedRequest for CreatePlaylistRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name"];

    fn check_blank(&self) -> Result<(), AppError> {
        require_non_blank(&self.name, "Playlist name is required")
    }
}

/// Song snapshot added to a playlist or to favorites. All four fields are
/// required.
#[derive(Debug, Deserialize, Validate)]
pub struct SongRefRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "artist_id is required"))]
    pub artist_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "artist_name is required"))]
    pub artist_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "duration is required"))]
    pub duration: String,
}

impl CheckedRequest for SongRefRequest {
    const FIELD_ORDER: &'static [&'static str] = &["artist_id", "artist_name", "title", "duration"];
}

impl From<SongRefRequest> for SongRef {
    fn from(request: SongRefRequest) -> Self {
        Self {
            artist_id: request.artist_id,
            artist_name: request.artist_name,
            title: request.title,
            duration: request.duration,
        }
    }
}
