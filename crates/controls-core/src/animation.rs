//! Tweened offset animation for the browser-driven controls slide-in.

/// Easing curves. Input `t` is clamped to `[0.0, 1.0]`.
pub mod easing {
    /// Linear easing (no acceleration).
    #[cfg(test)]
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Quadratic ease-out (slow end).
    #[cfg(test)]
    pub fn ease_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * (2.0 - t)
    }

    /// Quadratic ease-in-out, the closest match to the platform's default
    /// accelerate-decelerate interpolator.
    pub fn ease_in_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            2.0 * t * t
        } else {
            -1.0 + (4.0 - 2.0 * t) * t
        }
    }
}

/// A running animation that interpolates between two values.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Starting value.
    pub start: f32,
    /// Target value.
    pub end: f32,
    /// Total duration in milliseconds.
    pub duration_ms: u32,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u32,
    /// Easing function to apply.
    pub easing: fn(f32) -> f32,
}

impl Tween {
    /// Create a new tween animation.
    pub fn new(start: f32, end: f32, duration_ms: u32, easing: fn(f32) -> f32) -> Self {
        Self {
            start,
            end,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// Advance by `dt_ms` and return the current interpolated value.
    pub fn tick(&mut self, dt_ms: u32) -> f32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.value()
    }

    /// Check if the animation has completed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f32 {
        let t = if self.duration_ms > 0 {
            self.elapsed_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        let eased = (self.easing)(t);
        self.start + (self.end - self.start) * eased
    }
}

/// Slide the top controls from their current offset back to fully shown.
///
/// The duration scales with how much of the controls is hidden, so a
/// half-hidden toolbar takes half of `max_duration_ms`.
#[derive(Debug, Clone)]
pub struct ShowAnimation {
    tween: Tween,
}

impl ShowAnimation {
    pub fn new(from_offset: i32, hidden_ratio: f32, max_duration_ms: u32) -> Self {
        let duration = (hidden_ratio * max_duration_ms as f32).abs() as u32;
        Self {
            tween: Tween::new(
                from_offset as f32,
                0.0,
                duration,
                easing::ease_in_out_quad,
            ),
        }
    }

    /// Advance by `dt_ms` and return the top controls offset for this frame.
    pub fn tick(&mut self, dt_ms: u32) -> i32 {
        self.tween.tick(dt_ms) as i32
    }

    pub fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }

    pub fn duration_ms(&self) -> u32 {
        self.tween.duration_ms
    }
}
