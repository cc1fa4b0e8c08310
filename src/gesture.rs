use crate::playback::Intent;
use std::time::Duration;
use tokio::time::Instant;

/// How long a press must last before it counts as a hold
pub const LONG_PRESS: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapSide {
    Left,
    Right,
}

impl TapSide {
    /// Left half steps back, right half (including the midline) steps forward
    pub fn from_position(x: f64, width: f64) -> Self {
        if x < width / 2.0 {
            TapSide::Left
        } else {
            TapSide::Right
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            TapSide::Left => Intent::TapLeft,
            TapSide::Right => Intent::TapRight,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Press {
    side: TapSide,
    since: Instant,
    holding: bool,
}

/// Turns raw press-down / press-up pairs into viewer intents.
///
/// A release before the threshold is a tap on the pressed side. Once the
/// threshold is reached `poll` yields `HoldStart`, and the release that
/// follows yields `HoldEnd`.
#[derive(Debug)]
pub struct PressTracker {
    threshold: Duration,
    press: Option<Press>,
}

impl Default for PressTracker {
    fn default() -> Self {
        PressTracker::new(LONG_PRESS)
    }
}

impl PressTracker {
    pub fn new(threshold: Duration) -> Self {
        PressTracker {
            threshold,
            press: None,
        }
    }

    /// Start a press. A hold still in progress is ended first.
    pub fn press(&mut self, side: TapSide, now: Instant) -> Option<Intent> {
        let ended = self.cancel();
        self.press = Some(Press {
            side,
            since: now,
            holding: false,
        });
        ended
    }

    /// When the current press turns into a hold, if it has not already
    pub fn hold_deadline(&self) -> Option<Instant> {
        self.press
            .filter(|press| !press.holding)
            .map(|press| press.since + self.threshold)
    }

    /// Emit `HoldStart` once the press has lasted long enough
    pub fn poll(&mut self, now: Instant) -> Option<Intent> {
        let threshold = self.threshold;
        let press = self.press.as_mut()?;
        if press.holding || now.saturating_duration_since(press.since) < threshold {
            return None;
        }
        press.holding = true;
        Some(Intent::HoldStart)
    }

    /// Finish the press.
    ///
    /// A long press whose `HoldStart` was never polled pauses and resumes in
    /// the same instant, so it yields nothing.
    pub fn release(&mut self, now: Instant) -> Option<Intent> {
        let press = self.press.take()?;
        if press.holding {
            Some(Intent::HoldEnd)
        } else if now.saturating_duration_since(press.since) < self.threshold {
            Some(press.side.intent())
        } else {
            None
        }
    }

    /// Abandon the press (pointer left the surface). Only an active hold
    /// produces an intent.
    pub fn cancel(&mut self) -> Option<Intent> {
        match self.press.take() {
            Some(press) if press.holding => Some(Intent::HoldEnd),
            _ => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.press.is_some_and(|press| press.holding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midline_counts_as_right() {
        assert_eq!(TapSide::from_position(0.0, 400.0), TapSide::Left);
        assert_eq!(TapSide::from_position(199.9, 400.0), TapSide::Left);
        assert_eq!(TapSide::from_position(200.0, 400.0), TapSide::Right);
        assert_eq!(TapSide::from_position(399.0, 400.0), TapSide::Right);
    }

    #[test]
    fn short_press_is_a_tap_on_its_side() {
        let t0 = Instant::now();
        let mut tracker = PressTracker::default();

        assert_eq!(tracker.press(TapSide::Left, t0), None);
        assert_eq!(tracker.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            tracker.release(t0 + Duration::from_millis(120)),
            Some(Intent::TapLeft)
        );

        tracker.press(TapSide::Right, t0);
        assert_eq!(
            tracker.release(t0 + Duration::from_millis(499)),
            Some(Intent::TapRight)
        );
    }

    #[test]
    fn long_press_holds_until_release() {
        let t0 = Instant::now();
        let mut tracker = PressTracker::default();

        tracker.press(TapSide::Right, t0);
        assert_eq!(tracker.hold_deadline(), Some(t0 + LONG_PRESS));
        assert_eq!(tracker.poll(t0 + LONG_PRESS), Some(Intent::HoldStart));
        assert!(tracker.is_holding());
        assert_eq!(tracker.hold_deadline(), None);
        assert_eq!(tracker.poll(t0 + Duration::from_secs(2)), None);

        assert_eq!(
            tracker.release(t0 + Duration::from_secs(3)),
            Some(Intent::HoldEnd)
        );
        assert!(!tracker.is_holding());
        assert_eq!(tracker.release(t0 + Duration::from_secs(4)), None);
    }

    #[test]
    fn unpolled_long_press_yields_nothing() {
        let t0 = Instant::now();
        let mut tracker = PressTracker::default();

        tracker.press(TapSide::Left, t0);
        assert_eq!(tracker.release(t0 + Duration::from_millis(800)), None);
    }

    #[test]
    fn cancel_only_reports_an_active_hold() {
        let t0 = Instant::now();
        let mut tracker = PressTracker::default();

        tracker.press(TapSide::Left, t0);
        assert_eq!(tracker.cancel(), None);

        tracker.press(TapSide::Left, t0);
        tracker.poll(t0 + LONG_PRESS);
        assert_eq!(tracker.cancel(), Some(Intent::HoldEnd));
    }

    #[test]
    fn new_press_ends_a_dangling_hold() {
        let t0 = Instant::now();
        let mut tracker = PressTracker::new(Duration::from_millis(200));

        tracker.press(TapSide::Right, t0);
        tracker.poll(t0 + Duration::from_millis(200));
        assert_eq!(
            tracker.press(TapSide::Left, t0 + Duration::from_secs(1)),
            Some(Intent::HoldEnd)
        );
        assert!(!tracker.is_holding());
    }
}
