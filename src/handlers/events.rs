use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::events::{EventFilter, Selection};
use crate::live::{SnapshotState, SnapshotSubscription};
use crate::models::{Club, Event, EventCategory};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    category: Option<String>,
    club: Option<String>,
}

fn parse_filter(query: &EventListQuery) -> Result<EventFilter, AppError> {
    let category = match query.category.as_deref() {
        None => Selection::All,
        Some(s) if s.eq_ignore_ascii_case("all") => Selection::All,
        Some(s) => Selection::Only(EventCategory::parse(s).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unknown category '{s}'; expected Technical, Cultural or Sports"
            ))
        })?),
    };
    let club = match query.club.as_deref() {
        None => Selection::All,
        Some(s) if s.eq_ignore_ascii_case("all") => Selection::All,
        Some(s) => Selection::Only(Club::parse(s).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown club '{s}'"))
        })?),
    };
    Ok(EventFilter { category, club })
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Response, AppError> {
    let filter = parse_filter(&query)?;
    let events = state.events.list().await?;
    let events = filter.apply(&events);
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{id}' was not found")))?;
    Ok(success(event, "Event retrieved").into_response())
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FeedMessage<'a> {
    Snapshot { seq: u64, events: &'a [Event] },
    Error { message: &'a str },
}

/// Standing subscription to the events collection. Every mutation pushes a
/// fresh full snapshot; the subscription is disposed when the client goes
/// away or delivery fails.
pub async fn events_feed(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let subscription = state.events.subscribe();
    ws.on_upgrade(move |socket| stream_snapshots(socket, subscription))
}

async fn stream_snapshots(mut socket: WebSocket, mut subscription: SnapshotSubscription<Event>) {
    let mut pending = Some(subscription.current());
    loop {
        if let Some(state) = pending.take() {
            match state {
                SnapshotState::Loading => {}
                SnapshotState::Ready(snapshot) => {
                    let frame = FeedMessage::Snapshot {
                        seq: snapshot.seq,
                        events: snapshot.records.as_slice(),
                    };
                    match serde_json::to_string(&frame) {
                        Ok(body) => {
                            if socket.send(Message::Text(body)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "failed to serialise event snapshot");
                        }
                    }
                }
                SnapshotState::Failed(err) => {
                    // Delivery failure ends this subscription; no retry here.
                    warn!(error = %err, "event feed delivery failed");
                    let frame = FeedMessage::Error {
                        message: err.message(),
                    };
                    if let Ok(body) = serde_json::to_string(&frame) {
                        let _ = socket.send(Message::Text(body)).await;
                    }
                    break;
                }
            }
        }

        tokio::select! {
            next = subscription.next() => match next {
                Some(state) => pending = Some(state),
                None => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(error = %err, "websocket error");
                    break;
                }
            },
        }
    }
    subscription.dispose();
}
