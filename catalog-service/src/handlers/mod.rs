//! HTTP handlers for catalog-service, one module per resource group.

pub mod artists;
pub mod extract;
pub mod favorites;
pub mod health;
pub mod playlists;

use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

use crate::services::{record_store_error, StoreError};

pub use extract::JsonBody;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(err.into())
    }
}

/// Logs and counts a failed store call, passing the error on unchanged.
pub(crate) fn store_failed(operation: &'static str) -> impl FnOnce(StoreError) -> StoreError {
    move |err| {
        tracing::error!(operation, error = %err, "Store operation failed");
        record_store_error(operation);
        err
    }
}

/// Store failures on create-style endpoints are reported as 400, not 500.
pub(crate) fn rejected(err: StoreError) -> AppError {
    AppError::BadRequest(err.into())
}

/// Parses a 24-hex-digit object id. A malformed id is a client error
/// distinct from "not found", and is checked before any store access.
pub(crate) fn parse_object_id(raw: &str, kind: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid {} ID format", kind)))
}

/// Only plain non-negative decimal integers address a song slot; anything else
/// cannot name a song and is reported like an out-of-range index.
pub(crate) fn parse_song_index(raw: &str) -> Result<usize, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(index_out_of_range());
    }
    raw.parse().map_err(|_| index_out_of_range())
}

pub(crate) fn index_out_of_range() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Song index out of range"))
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_errors_name_the_resource() {
        let err = parse_object_id("not-an-id", "artist").unwrap_err();
        assert_eq!(err.to_string(), "Invalid artist ID format");
        assert!(parse_object_id("507f1f77bcf86cd799439011", "artist").is_ok());
    }

    #[test]
    fn song_index_accepts_only_plain_digits() {
        assert_eq!(parse_song_index("0").unwrap(), 0);
        assert_eq!(parse_song_index("12").unwrap(), 12);
        for raw in ["", "-1", "+1", "1.5", "abc", "99999999999999999999999"] {
            assert_eq!(
                parse_song_index(raw).unwrap_err().to_string(),
                "Song index out of range"
            );
        }
    }
}
