use axum::body::Body;
use axum::http::Request;
use catalog_service::services::MemoryCatalogStore;
use catalog_service::startup::{build_router, AppState};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Collects the `request_id` field of every `http_request` span.
#[derive(Clone, Default)]
struct RequestSpans {
    request_ids: Arc<Mutex<Vec<String>>>,
}

struct RequestIdField(Option<String>);

impl Visit for RequestIdField {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "request_id" {
            self.0 = Some(format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "request_id" {
            self.0 = Some(value.to_string());
        }
    }
}

impl<S: Subscriber> Layer<S> for RequestSpans {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() != "http_request" {
            return;
        }
        let mut field = RequestIdField(None);
        attrs.record(&mut field);
        if let Some(request_id) = field.0 {
            self.request_ids.lock().unwrap().push(request_id);
        }
    }
}

async fn span_request_ids(request: Request<Body>) -> (Vec<String>, Option<String>) {
    let spans = RequestSpans::default();
    let subscriber = tracing_subscriber::registry().with(spans.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let router = build_router(AppState::new(Arc::new(MemoryCatalogStore::new())));
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let header = response
        .headers()
        .get("x-request-id")
        .map(|value| value.to_str().unwrap().to_string());
    let request_ids = spans.request_ids.lock().unwrap().clone();
    (request_ids, header)
}

#[tokio::test]
async fn request_span_carries_the_generated_request_id() {
    let request = Request::builder()
        .uri("/api/artists")
        .body(Body::empty())
        .unwrap();

    let (request_ids, header) = span_request_ids(request).await;

    let header = header.expect("Missing x-request-id header");
    assert_eq!(request_ids, vec![header]);
}

#[tokio::test]
async fn request_span_carries_the_caller_request_id() {
    let request = Request::builder()
        .uri("/api/artists")
        .header("x-request-id", "req-789")
        .body(Body::empty())
        .unwrap();

    let (request_ids, header) = span_request_ids(request).await;

    assert_eq!(header.as_deref(), Some("req-789"));
    assert_eq!(request_ids, vec!["req-789".to_string()]);
}
