use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::booking::BookingDraft;
use crate::error::Error;
use crate::event::{EventDraft, EventPatch};
use crate::slug;
use crate::store::Store;

pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:slug", get(get_event).put(update_event))
        .route("/api/bookings", post(create_booking))
        .fallback(|| async {
            let body = json!({ "message": "Not found", "error": "unknown route" });
            (StatusCode::NOT_FOUND, Json(body))
        })
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn list_events(State(store): State<Arc<Store>>) -> Result<Response, Error> {
    let events = store.list_events().await?;

    let body = json!({
        "message": "Events fetched successfully",
        "events": events,
    });

    Ok(Json(body).into_response())
}

async fn get_event(
    State(store): State<Arc<Store>>,
    Path(raw): Path<String>,
) -> Result<Response, Error> {
    let slug = slug::normalize(&raw)?;
    let event = store.event_by_slug(&slug).await?;

    let body = json!({
        "message": "Event fetched successfully",
        "event": event,
    });

    Ok(Json(body).into_response())
}

async fn create_event(
    State(store): State<Arc<Store>>,
    Json(draft): Json<EventDraft>,
) -> Result<Response, Error> {
    let event = store.create_event(draft.validate()?).await?;

    let body = json!({
        "message": "Event created successfully",
        "event": event,
    });

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_event(
    State(store): State<Arc<Store>>,
    Path(raw): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, Error> {
    let slug = slug::normalize(&raw)?;
    let event = store.update_event(&slug, patch).await?;

    let body = json!({
        "message": "Event updated successfully",
        "event": event,
    });

    Ok(Json(body).into_response())
}

async fn create_booking(
    State(store): State<Arc<Store>>,
    Json(draft): Json<BookingDraft>,
) -> Response {
    let slug = draft.slug.clone();

    let outcome = match draft.validate() {
        Ok(booking) => store.create_booking(booking).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, slug = slug.as_deref(), "booking rejected");

            let body = json!({
                "success": false,
                "message": err.message(),
                "error": err.to_string(),
            });

            (err.status(), Json(body)).into_response()
        }
    }
}
