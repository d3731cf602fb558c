//! Input channels. Each one turns host events into a [`NavCommand`] for the
//! controller; none of them touch slide state directly.

use tracing::trace;

/// Minimum horizontal travel for a touch gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
}

/// The two on-screen navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerControl {
    Forward,
    Backward,
}

impl PointerControl {
    pub fn command(self) -> NavCommand {
        match self {
            Self::Forward => NavCommand::Next,
            Self::Backward => NavCommand::Prev,
        }
    }
}

/// Keys the deck listens to. Anything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    Home,
    End,
    Other,
}

/// Result of offering a key press to the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Recognized: the host must suppress its default behavior (scrolling).
    Handled(NavCommand),
    Ignored,
}

pub fn key_command(key: Key) -> KeyOutcome {
    match key {
        Key::ArrowRight | Key::Space => KeyOutcome::Handled(NavCommand::Next),
        Key::ArrowLeft => KeyOutcome::Handled(NavCommand::Prev),
        Key::Home => KeyOutcome::Handled(NavCommand::First),
        Key::End => KeyOutcome::Handled(NavCommand::Last),
        Key::Other => KeyOutcome::Ignored,
    }
}

/// Tracks one horizontal touch gesture at a time.
///
/// Capture is passive: the tracker only reads coordinates and never asks the
/// host to consume the touch, so native scrolling keeps working.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: f32,
    end_x: f32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::with_threshold(SWIPE_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: 0.0,
            end_x: 0.0,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.start_x = x;
    }

    /// Finish the gesture. A leftward swipe moves forward, a rightward one
    /// moves back; anything within the threshold is a tap or jitter.
    pub fn touch_end(&mut self, x: f32) -> Option<NavCommand> {
        self.end_x = x;
        let diff = self.start_x - self.end_x;
        if diff.abs() <= self.threshold {
            trace!(diff, "touch below swipe threshold");
            return None;
        }
        Some(if diff > 0.0 {
            NavCommand::Next
        } else {
            NavCommand::Prev
        })
    }
}
