use super::text_input_state::TextInputState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomSelectState {
    pub room_input: TextInputState,
}

impl RoomSelectState {
    /// Trimmed room name, or `None` when nothing usable was entered.
    pub fn room_to_join(&self) -> Option<String> {
        let room = self.room_input.text().trim();
        (!room.is_empty()).then(|| room.to_owned())
    }
}
