use std::time::{Duration, Instant};

/// How long each decorative effect stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub toast: Duration,
    pub jump: Duration,
    pub ripple: Duration,
}

/// Every feedback timer the UI owns, one named deadline per effect.
///
/// Triggering an effect overwrites its deadline, so rapid re-triggering
/// keeps it continuously visible and it hides once after the last call's
/// delay. Reduced motion suppresses the decorative effects entirely; the
/// toast is functional feedback and always fires.
pub struct Effects {
    reduced_motion: bool,
    timings: Timings,
    toast_until: Option<Instant>,
    jump_until: Option<Instant>,
    bounce: Option<(usize, Instant)>,
    ripple: Option<(usize, Instant)>,
}

impl Effects {
    pub fn new(reduced_motion: bool, timings: Timings) -> Self {
        Effects {
            reduced_motion,
            timings,
            toast_until: None,
            jump_until: None,
            bounce: None,
            ripple: None,
        }
    }

    pub fn trigger_toast(&mut self, now: Instant) {
        self.toast_until = Some(now + self.timings.toast);
    }

    pub fn trigger_jump(&mut self, now: Instant) {
        if self.reduced_motion {
            return;
        }
        self.jump_until = Some(now + self.timings.jump);
    }

    pub fn trigger_bounce(&mut self, index: usize, now: Instant) {
        if self.reduced_motion {
            return;
        }
        self.bounce = Some((index, now + self.timings.jump));
    }

    pub fn trigger_ripple(&mut self, index: usize, now: Instant) {
        if self.reduced_motion {
            return;
        }
        self.ripple = Some((index, now + self.timings.ripple));
    }

    pub fn toast_visible(&self) -> bool {
        self.toast_until.is_some()
    }

    pub fn jumping(&self) -> bool {
        self.jump_until.is_some()
    }

    pub fn bouncing(&self, index: usize) -> bool {
        matches!(self.bounce, Some((active, _)) if active == index)
    }

    pub fn rippling(&self, index: usize) -> bool {
        matches!(self.ripple, Some((active, _)) if active == index)
    }

    /// Expires finished effects. Returns true when anything changed and
    /// the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if matches!(self.toast_until, Some(until) if now >= until) {
            self.toast_until = None;
            changed = true;
        }
        if matches!(self.jump_until, Some(until) if now >= until) {
            self.jump_until = None;
            changed = true;
        }
        if matches!(self.bounce, Some((_, until)) if now >= until) {
            self.bounce = None;
            changed = true;
        }
        if matches!(self.ripple, Some((_, until)) if now >= until) {
            self.ripple = None;
            changed = true;
        }
        changed
    }
}
