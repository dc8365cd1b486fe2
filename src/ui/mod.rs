//! Terminal presentation
//!
//! Plain-text views over `ClientState`. Views hold only local UI state
//! (scroll position, form drafts) and hand intents back to the caller.

pub mod follow;
pub mod login;
pub mod message_list;
pub mod room_list;

pub use follow::{FollowState, FollowTracker, ScrollAction, ScrollMetrics};
pub use login::{LoginForm, LoginMode};
pub use message_list::MessageListView;
pub use room_list::{RoomIntent, RoomListView};
