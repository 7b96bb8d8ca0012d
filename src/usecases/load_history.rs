use crate::{
    domain::{api::ApiError, message::Message, realtime::VisitId, room_session::RoomSession},
    usecases::contracts::BackendGateway,
};

pub const HISTORY_LOAD_FAILED_TEXT: &str = "Failed to load messages";

const HISTORY_LOAD_FAILED: &str = "HISTORY_LOAD_FAILED";

/// Starts the single history fetch of a room visit.
pub fn request_history(gateway: &dyn BackendGateway, visit: VisitId, room: &str) {
    tracing::debug!(%visit, room, "requesting room history");
    gateway.request_history(visit, room);
}

/// Replaces the room's messages with the fetched history and pins the view
/// to the bottom without animation. Returns the number of messages loaded.
pub fn apply_history(
    session: &mut RoomSession,
    result: Result<Vec<Message>, ApiError>,
) -> Result<usize, ApiError> {
    match result {
        Ok(history) => {
            let count = history.len();
            session.hydrate(history);
            tracing::debug!(room = session.room_name(), count, "room history loaded");
            Ok(count)
        }
        Err(error) => {
            session.history_failed();
            tracing::warn!(
                code = HISTORY_LOAD_FAILED,
                room = session.room_name(),
                error = %error,
                "room history failed to load"
            );
            Err(error)
        }
    }
}
