//! Animated camera navigation: fixed-duration eased transitions between view
//! destinations, driven by an external per-frame tick.
//!
//! The controller never owns the view-state; it hands interpolated states back
//! to the caller, which writes them into the orchestrator and fires change
//! notifications. Time is passed in explicitly so transitions are deterministic
//! under test.

use std::time::{Duration, Instant};

use crate::consts::FLY_DURATION_MS;
use crate::view::{NavDestination, ViewState};

pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

struct Transition {
    from: ViewState,
    dest: NavDestination,
    started: Instant,
}

#[derive(Default)]
pub struct NavigationController {
    transition: Option<Transition>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self { transition: None }
    }

    /// Begin (or replace) a transition toward `dest`.
    ///
    /// With no current view-state the destination applies immediately and is
    /// returned; the caller must notify exactly once. Otherwise the previous
    /// transition (if any) is cancelled and the new one starts from `current`,
    /// which is whatever state was last written, not the original start.
    pub fn navigate_to(
        &mut self,
        current: Option<ViewState>,
        dest: NavDestination,
        now: Instant,
    ) -> Option<ViewState> {
        match current {
            None => {
                self.transition = None;
                Some(ViewState::new(dest.zoom, dest.target))
            }
            Some(from) => {
                self.transition = Some(Transition { from, dest, started: now });
                None
            }
        }
    }

    /// Advance the active transition. Returns the state to write for this
    /// frame, or `None` when idle. The final tick lands exactly on the
    /// destination and clears the transition.
    pub fn tick(&mut self, now: Instant) -> Option<ViewState> {
        let transition = self.transition.as_ref()?;

        let elapsed = now.saturating_duration_since(transition.started);
        let raw = (elapsed.as_secs_f32() / Duration::from_millis(FLY_DURATION_MS).as_secs_f32())
            .min(1.0);
        let t = ease_in_out_cubic(raw);

        let from = &transition.from;
        let dest = &transition.dest;
        let next = ViewState::new(
            lerp(from.zoom, dest.zoom, t),
            [
                lerp(from.target[0], dest.target[0], t),
                lerp(from.target[1], dest.target[1], t),
                lerp(from.target[2], dest.target[2], t),
            ],
        );

        if raw >= 1.0 {
            self.transition = None;
        }
        Some(next)
    }

    /// Cancel any in-flight transition. Mandatory on teardown and whenever
    /// direct user input takes over the camera.
    pub fn cancel(&mut self) {
        self.transition = None;
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out_cubic(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }
}
