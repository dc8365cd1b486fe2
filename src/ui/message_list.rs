//! Message list view
//!
//! Renders the selected room's messages into a fixed-height window of text
//! lines and drives follow mode. Heights are measured in lines.

use super::follow::{FollowTracker, ScrollAction, ScrollMetrics};
use crate::api::Message;

pub const LOADING_TEXT: &str = "Loading messages...";
pub const JUMP_HINT: &str = "  -- newer messages below, /latest to jump --";

pub struct MessageListView {
    messages: Option<Vec<Message>>,
    follow: FollowTracker,
    viewport_lines: usize,
    scroll_top: usize,
}

impl MessageListView {
    pub fn new(viewport_lines: usize) -> Self {
        Self {
            messages: None,
            follow: FollowTracker::new(),
            viewport_lines: viewport_lines.max(1),
            scroll_top: 0,
        }
    }

    pub fn messages(&self) -> Option<&[Message]> {
        self.messages.as_deref()
    }

    pub fn follow(&self) -> &FollowTracker {
        &self.follow
    }

    /// Show a new batch (or the loading state) and report the scroll taken
    pub fn apply(&mut self, messages: Option<Vec<Message>>) -> ScrollAction {
        let previous_was_loading = self.messages.is_none();
        self.messages = messages;

        let action = if self.messages.is_some() {
            self.follow.on_messages_applied(previous_was_loading)
        } else {
            ScrollAction::None
        };

        if action != ScrollAction::None {
            self.scroll_top = self.max_scroll_top();
        }
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
        self.follow.on_scroll(self.metrics());
        action
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_top = self.scroll_top.saturating_sub(lines);
        self.follow.on_scroll(self.metrics());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_top = (self.scroll_top + lines).min(self.max_scroll_top());
        self.follow.on_scroll(self.metrics());
    }

    pub fn jump_to_latest(&mut self) -> ScrollAction {
        self.scroll_top = self.max_scroll_top();
        self.follow.jump_to_latest()
    }

    /// Visible lines, plus the jump hint when not following
    pub fn render(&self) -> Vec<String> {
        let lines = self.content_lines();
        let end = self.scroll_top.saturating_add(self.viewport_lines).min(lines.len());
        let mut visible: Vec<String> = lines[self.scroll_top.min(end)..end].to_vec();

        if self.follow.shows_jump_to_latest() {
            visible.push(JUMP_HINT.to_string());
        }
        visible
    }

    fn content_lines(&self) -> Vec<String> {
        let messages = match &self.messages {
            None => return vec![LOADING_TEXT.to_string()],
            Some(messages) => messages,
        };

        let mut lines = Vec::new();
        for message in messages {
            let timestamp = message
                .created_at_utc()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| message.created_at.clone());
            lines.push(format!("{}  {}", message.author, timestamp));
            for line in message.content.lines() {
                lines.push(format!("  {}", line));
            }
        }
        lines
    }

    fn max_scroll_top(&self) -> usize {
        self.content_lines().len().saturating_sub(self.viewport_lines)
    }

    fn metrics(&self) -> ScrollMetrics {
        // One line stands in for the pixel tolerance of a graphical list
        let line = super::follow::FOLLOW_TOLERANCE;
        ScrollMetrics {
            scroll_top: self.scroll_top as f64 * line,
            scroll_height: self.content_lines().len() as f64 * line,
            client_height: self.viewport_lines as f64 * line,
        }
    }
}
