//! Shutdown-button press classification.

use crate::config::ButtonThresholds;

/// What a completed button press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    /// Too short; switch bounce.
    Bounce,
    /// Notify the host so it can shut down cleanly.
    GracefulShutdown,
    /// Reset the host without asking.
    HardReset,
}

/// Classifies press duration from the press/release edge pair.
pub struct ButtonClassifier {
    thresholds: ButtonThresholds,
    pressed_at_us: Option<u64>,
}

impl ButtonClassifier {
    pub fn new(thresholds: ButtonThresholds) -> Self {
        Self {
            thresholds,
            pressed_at_us: None,
        }
    }

    pub fn press(&mut self, now_us: u64) {
        self.pressed_at_us = Some(now_us);
    }

    /// Classify on the release edge. A release without a recorded
    /// press (noise, or a press consumed by host power-on) is bounce.
    pub fn release(&mut self, now_us: u64) -> PressAction {
        let Some(pressed_at) = self.pressed_at_us.take() else {
            return PressAction::Bounce;
        };
        let held = now_us.saturating_sub(pressed_at);
        if held < self.thresholds.bounce_us {
            PressAction::Bounce
        } else if held < self.thresholds.hard_reset_us {
            PressAction::GracefulShutdown
        } else {
            PressAction::HardReset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(held_us: u64) -> PressAction {
        let mut btn = ButtonClassifier::new(ButtonThresholds::default());
        btn.press(1_000);
        btn.release(1_000 + held_us)
    }

    #[test]
    fn test_short_press_is_bounce() {
        assert_eq!(classify(100_000), PressAction::Bounce);
    }

    #[test]
    fn test_medium_press_is_graceful() {
        assert_eq!(classify(1_000_000), PressAction::GracefulShutdown);
    }

    #[test]
    fn test_long_press_is_hard_reset() {
        assert_eq!(classify(5_000_000), PressAction::HardReset);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(249_999), PressAction::Bounce);
        assert_eq!(classify(250_000), PressAction::GracefulShutdown);
        assert_eq!(classify(2_999_999), PressAction::GracefulShutdown);
        assert_eq!(classify(3_000_000), PressAction::HardReset);
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut btn = ButtonClassifier::new(ButtonThresholds::default());
        assert_eq!(btn.release(9_000_000), PressAction::Bounce);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut btn = ButtonClassifier::new(ButtonThresholds {
            bounce_us: 10,
            hard_reset_us: 20,
        });
        btn.press(0);
        assert_eq!(btn.release(15), PressAction::GracefulShutdown);
        btn.press(0);
        assert_eq!(btn.release(25), PressAction::HardReset);
    }
}
