use grove_graph::{LinkStyle, NodeVisual, ViewTransform};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Values a [`Tween`] can interpolate.
pub trait Interpolate: Clone {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for NodeVisual {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for LinkStyle {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for ViewTransform {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Time-based interpolation between two values. Time is the session clock
/// passed in by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    started_at: Duration,
    duration: Duration,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, started_at: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing,
        }
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(t)
    }

    pub fn value(&self, now: Duration) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.interpolate(&self.to, t)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.started_at + self.duration
    }

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn end(&self) -> &T {
        &self.to
    }
}
