//! Room list view with the inline create-room form

use crate::api::{Room, RoomId};

/// What the room list asks the sync core to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomIntent {
    Select(RoomId),
    Create(String),
}

#[derive(Debug, Default)]
pub struct RoomListView {
    is_creating: bool,
    draft_name: String,
}

impl RoomListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    /// One line per room, numbered from 1, the selected room marked with `>`
    pub fn render(&self, rooms: &[Room], selected: Option<&str>) -> Vec<String> {
        let mut lines: Vec<String> = rooms
            .iter()
            .enumerate()
            .map(|(i, room)| {
                let marker = if selected == Some(room.id.as_str()) { ">" } else { " " };
                format!("{} {:>2}. {}", marker, i + 1, room.name)
            })
            .collect();

        if rooms.is_empty() {
            lines.push("  (no rooms yet)".to_string());
        }
        if self.is_creating {
            lines.push(format!("  new room: {}_", self.draft_name));
        }
        lines
    }

    pub fn select(&self, room_id: &str, selected: Option<&str>) -> Option<RoomIntent> {
        if selected == Some(room_id) {
            return None;
        }
        Some(RoomIntent::Select(room_id.to_string()))
    }

    /// Select by the 1-based number shown in `render`
    pub fn select_index(
        &self,
        rooms: &[Room],
        number: usize,
        selected: Option<&str>,
    ) -> Option<RoomIntent> {
        let room = rooms.get(number.checked_sub(1)?)?;
        self.select(&room.id, selected)
    }

    pub fn begin_create(&mut self) {
        self.is_creating = true;
    }

    pub fn cancel_create(&mut self) {
        self.is_creating = false;
        self.draft_name.clear();
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    /// Submit the form. A blank name keeps the form open and emits nothing.
    pub fn submit_create(&mut self) -> Option<RoomIntent> {
        if self.draft_name.trim().is_empty() {
            return None;
        }
        let intent = RoomIntent::Create(self.draft_name.clone());
        self.cancel_create();
        Some(intent)
    }
}
