use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use service_core::error::AppError;

/// JSON request body, checked before any handler logic runs.
///
/// Unlike `axum::Json`, format failures are an [`AppError::BadRequest`] with
/// the catalog's fixed messages: a non-JSON content type, then a body that is
/// not valid JSON, then a body of the wrong shape (the deserializer's message).
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[derive(Debug)]
pub enum JsonBodyRejection {
    /// Content type or JSON format; always 400.
    Invalid(AppError),
    /// The body could not be read, e.g. over the length limit (413). Keeps
    /// axum's status.
    Body(BytesRejection),
}

impl From<AppError> for JsonBodyRejection {
    fn from(err: AppError) -> Self {
        JsonBodyRejection::Invalid(err)
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            JsonBodyRejection::Invalid(err) => err.into_response(),
            JsonBodyRejection::Body(rejection) => {
                let status = rejection.status();
                tracing::debug!(
                    status = status.as_u16(),
                    error = %rejection.body_text(),
                    "Request body rejected"
                );
                (
                    status,
                    Json(json!({ "success": false, "error": rejection.body_text() })),
                )
                    .into_response()
            }
        }
    }
}

/// `application/json`, with or without parameters, or any `application/*+json`.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Content-Type must be application/json"
            ))
            .into());
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonBodyRejection::Body)?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid JSON format")))?;

        let payload = serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.to_string())))?;

        Ok(JsonBody(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderValue, StatusCode};

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn accepts_json_variants() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(is_json_content_type(&headers("application/merge-patch+json")));
    }

    #[test]
    fn rejects_other_types() {
        assert!(!is_json_content_type(&HeaderMap::new()));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers(
            "application/x-www-form-urlencoded"
        )));
    }

    fn json_request(body: impl Into<Body>) -> Request {
        axum::http::Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn rejection_of(request: Request) -> (StatusCode, serde_json::Value) {
        let rejection = JsonBody::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        let response = rejection.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn oversized_body_keeps_payload_too_large_status() {
        let body = format!("{{\"name\":\"{}\"}}", "x".repeat(3 * 1024 * 1024));

        let (status, body) = rejection_of(json_request(body)).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("length limit"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = rejection_of(json_request("{\"name\":")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": "Invalid JSON format" }));
    }
}
