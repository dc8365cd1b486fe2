//! Follow mode for the message list
//!
//! While the viewport sits at (or within a small tolerance of) the bottom,
//! new batches scroll it down. Once the user scrolls up, batches leave the
//! viewport alone and a jump-to-latest control is offered instead.

/// Distance from the bottom that still counts as "at the bottom"
pub const FOLLOW_TOLERANCE: f64 = 16.0;

/// Scroll geometry of the message viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - FOLLOW_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Following,
    NotFollowing,
}

/// What the view should do after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    None,
    /// Jump straight to the bottom
    Instant,
    /// Smooth-scroll to the bottom
    Animated,
}

#[derive(Debug, Clone)]
pub struct FollowTracker {
    state: FollowState,
}

impl Default for FollowTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowTracker {
    pub fn new() -> Self {
        Self {
            state: FollowState::Following,
        }
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn should_follow(&self) -> bool {
        self.state == FollowState::Following
    }

    /// Re-evaluate after any scroll movement
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.state = if metrics.is_near_bottom() {
            FollowState::Following
        } else {
            FollowState::NotFollowing
        };
    }

    /// A message batch was applied
    ///
    /// `previous_was_loading` is true when the list showed the loading state
    /// before this batch; that first fill is not animated.
    pub fn on_messages_applied(&self, previous_was_loading: bool) -> ScrollAction {
        match (self.state, previous_was_loading) {
            (FollowState::NotFollowing, _) => ScrollAction::None,
            (FollowState::Following, true) => ScrollAction::Instant,
            (FollowState::Following, false) => ScrollAction::Animated,
        }
    }

    pub fn shows_jump_to_latest(&self) -> bool {
        self.state == FollowState::NotFollowing
    }

    /// The jump-to-latest control was activated
    pub fn jump_to_latest(&mut self) -> ScrollAction {
        self.state = FollowState::Following;
        ScrollAction::Animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_top: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            scroll_height: 1000.0,
            client_height: 200.0,
        }
    }

    #[test]
    fn test_first_batch_instant_then_animated() {
        let tracker = FollowTracker::new();
        assert_eq!(tracker.on_messages_applied(true), ScrollAction::Instant);
        assert_eq!(tracker.on_messages_applied(false), ScrollAction::Animated);
    }

    #[test]
    fn test_not_following_never_scrolls() {
        let mut tracker = FollowTracker::new();
        tracker.on_scroll(metrics(100.0));

        assert!(!tracker.should_follow());
        assert_eq!(tracker.on_messages_applied(true), ScrollAction::None);
        assert_eq!(tracker.on_messages_applied(false), ScrollAction::None);
        assert!(tracker.shows_jump_to_latest());
    }

    #[test]
    fn test_tolerance_near_bottom() {
        let mut tracker = FollowTracker::new();

        tracker.on_scroll(metrics(790.0));
        assert!(tracker.should_follow());

        tracker.on_scroll(metrics(783.0));
        assert!(!tracker.should_follow());

        tracker.on_scroll(metrics(784.0));
        assert!(tracker.should_follow());
    }

    #[test]
    fn test_jump_to_latest_is_animated_and_resumes_follow() {
        let mut tracker = FollowTracker::new();
        tracker.on_scroll(metrics(0.0));

        assert_eq!(tracker.jump_to_latest(), ScrollAction::Animated);
        assert_eq!(tracker.state(), FollowState::Following);
        assert!(!tracker.shows_jump_to_latest());
    }
}
