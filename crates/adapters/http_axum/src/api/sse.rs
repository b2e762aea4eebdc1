//! Server-Sent Events (SSE) stream of region snapshots.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use tiledash_app::ports::ReadingStore;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/regions/{id}/stream` — SSE stream of one region's snapshots.
///
/// The current snapshot is sent first, then one `snapshot` event per change.
/// Intermediate states may be coalesced when the client reads slower than
/// the region changes; the last one is always delivered.
pub async fn stream<RS>(
    State(state): State<AppState<RS>>,
    Path(id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, ApiError>
where
    RS: ReadingStore + 'static,
{
    let region = state.regions.find(&id)?;
    let snapshots = WatchStream::new(region.subscribe()).filter_map(|snapshot| {
        match Event::default().event("snapshot").json_data(&snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize region snapshot for SSE stream");
                None
            }
        }
    });

    Ok(Sse::new(snapshots).keep_alive(KeepAlive::default()))
}
