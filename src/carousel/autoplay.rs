//! Autoplay clock.
//!
//! Time is fed in explicitly through [`Autoplay::tick`], so the clock can be
//! driven by a tokio interval in production and by hand in tests. Three
//! things stop it: hover, the pause control and disposal. Hover and the
//! pause control are independent; leaving the carousel does not undo an
//! explicit pause.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Autoplay {
    interval: Option<Duration>,
    hovered: bool,
    user_paused: bool,
    disposed: bool,
    elapsed: Duration,
}

impl Autoplay {
    /// A clock firing every `interval`. A zero interval yields a disabled clock.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval: Some(interval).filter(|i| !i.is_zero()),
            hovered: false,
            user_paused: false,
            disposed: false,
            elapsed: Duration::ZERO,
        }
    }

    pub fn disabled() -> Self {
        Self::every(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.is_enabled() && !self.hovered && !self.user_paused && !self.disposed
    }

    pub fn is_user_paused(&self) -> bool {
        self.user_paused
    }

    /// Add `dt` to the clock and return how many times it fired.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        let Some(interval) = self.interval else {
            return 0;
        };
        if !self.is_running() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            fired += 1;
        }
        fired
    }

    pub fn hover_enter(&mut self) {
        self.hovered = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn hover_leave(&mut self) {
        self.hovered = false;
        self.elapsed = Duration::ZERO;
    }

    /// Flip the explicit pause. Returns true when now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.user_paused = !self.user_paused;
        self.elapsed = Duration::ZERO;
        self.user_paused
    }

    /// Stop permanently.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Text of the pause control.
    pub fn pause_label(&self) -> &'static str {
        if self.user_paused { "Reanudar" } else { "Pausar" }
    }
}
