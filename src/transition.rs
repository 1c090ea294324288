//! Overlay closing transitions.
//!
//! When an overlay is dismissed the router asks the
//! [`ViewHost`](crate::host::ViewHost) to play a [`Transition`] on the
//! overlay's container and waits for it to finish before navigating away.
//! The host decides how to render it; the browser host toggles a CSS class
//! ([`Transition::css_class`]) and waits for `animationend` or the duration,
//! whichever comes first.

use std::time::Duration;

/// Direction for slide transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Slide out towards the left edge
    Left,
    /// Slide out towards the right edge
    Right,
    /// Slide out towards the top edge
    Up,
    /// Slide out towards the bottom edge
    Down,
}

impl SlideDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Built-in transition types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Close immediately
    #[default]
    None,

    /// Fade out
    Fade {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Slide out
    Slide {
        /// Direction to slide
        direction: SlideDirection,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

impl Transition {
    /// Create a fade transition
    pub fn fade(duration_ms: u64) -> Self {
        Self::Fade { duration_ms }
    }

    /// Create a slide transition
    pub fn slide(direction: SlideDirection, duration_ms: u64) -> Self {
        Self::Slide {
            direction,
            duration_ms,
        }
    }

    /// Create a slide-down transition, the usual modal dismissal
    pub fn slide_down(duration_ms: u64) -> Self {
        Self::slide(SlideDirection::Down, duration_ms)
    }

    /// Get the duration of this transition
    pub fn duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fade { duration_ms } | Self::Slide { duration_ms, .. } => {
                Duration::from_millis(*duration_ms)
            }
        }
    }

    /// Check if this is a no-op transition
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None) || self.duration().is_zero()
    }

    /// CSS class a browser host adds to the closing container.
    pub fn css_class(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Fade { .. } => Some("closing-fade".to_string()),
            Self::Slide { direction, .. } => Some(format!("closing-slide-{}", direction.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Transition::None.duration(), Duration::ZERO);
        assert_eq!(Transition::fade(200).duration(), Duration::from_millis(200));
        assert_eq!(
            Transition::slide_down(150).duration(),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn test_is_none() {
        assert!(Transition::None.is_none());
        assert!(Transition::fade(0).is_none());
        assert!(!Transition::fade(10).is_none());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Transition::None.css_class(), None);
        assert_eq!(
            Transition::fade(100).css_class().as_deref(),
            Some("closing-fade")
        );
        assert_eq!(
            Transition::slide(SlideDirection::Up, 100)
                .css_class()
                .as_deref(),
            Some("closing-slide-up")
        );
    }
}
