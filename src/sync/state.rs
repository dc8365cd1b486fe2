//! Client state owned by the sync core

use crate::api::{Message, Room, RoomId};

/// Snapshot of what the client currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub selected_room_id: Option<RoomId>,
    /// Rooms in server order
    pub rooms: Vec<Room>,
    /// Messages of the selected room; `None` while loading
    pub messages: Option<Vec<Message>>,
}

impl ClientState {
    /// The selected room, if it is still in the room list
    pub fn selected_room(&self) -> Option<&Room> {
        let id = self.selected_room_id.as_deref()?;
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn is_loading_messages(&self) -> bool {
        self.selected_room_id.is_some() && self.messages.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> Room {
        Room {
            id: id.to_string(),
            name: format!("room {}", id),
        }
    }

    #[test]
    fn test_default_is_empty() {
        let state = ClientState::default();
        assert!(state.selected_room_id.is_none());
        assert!(state.rooms.is_empty());
        assert!(state.messages.is_none());
        assert!(!state.is_loading_messages());
    }

    #[test]
    fn test_selected_room_lookup() {
        let state = ClientState {
            selected_room_id: Some("r2".to_string()),
            rooms: vec![room("r1"), room("r2")],
            messages: None,
        };
        assert_eq!(state.selected_room().unwrap().name, "room r2");
        assert!(state.is_loading_messages());
    }

    #[test]
    fn test_vanished_selection_has_no_room() {
        let state = ClientState {
            selected_room_id: Some("gone".to_string()),
            rooms: vec![room("r1")],
            messages: Some(vec![]),
        };
        assert!(state.selected_room().is_none());
    }
}
