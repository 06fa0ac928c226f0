//! Motion primitives: a damped spring and a fixed-duration tween.
//!
//! Renderers hold one of these per animated value, set a new target whenever
//! the scene changes, and call `step(dt)` on every frame tick.

use std::time::Duration;

/// Largest integration step; longer frames are sub-stepped so a slow
/// terminal redraw can't blow the spring up.
const MAX_SUBSTEP: f64 = 1.0 / 240.0;
const REST_DELTA: f64 = 0.01;
const REST_SPEED: f64 = 0.01;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic ease-in-out on [0,1].
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Spring {
    pub const fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpringValue {
    spring: Spring,
    value: f64,
    velocity: f64,
    target: f64,
}

impl SpringValue {
    pub fn new(spring: Spring, value: f64) -> Self {
        Self {
            spring,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED
    }

    pub fn step(&mut self, dt: Duration) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        let mut remaining = dt.as_secs_f64();
        let mass = self.spring.mass.max(f64::EPSILON);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            let force = -self.spring.stiffness * (self.value - self.target)
                - self.spring.damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::EaseInOut => ease_in_out(t),
        }
    }
}

/// Interpolates `from → to` over a fixed duration.  Retargeting mid-flight
/// restarts from the current value.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(value: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            duration,
            elapsed: duration,
            easing,
        }
    }

    pub fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, self.easing.apply(t))
    }

    pub fn set_target(&mut self, to: f64) {
        if (to - self.to).abs() < f64::EPSILON {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }

    pub fn step(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(33);

    #[test]
    fn test_spring_converges() {
        let mut s = SpringValue::new(Spring::new(50.0, 15.0, 1.0), 0.0);
        s.set_target(48.0);
        for _ in 0..300 {
            s.step(FRAME);
        }
        assert!(s.is_settled());
        assert_eq!(s.value(), 48.0);
    }

    #[test]
    fn test_spring_moves_toward_target() {
        let mut s = SpringValue::new(Spring::new(40.0, 18.0, 1.0), 60.0);
        s.set_target(0.0);
        s.step(FRAME);
        let v1 = s.value();
        assert!(v1 < 60.0 && v1 > 0.0);
        s.step(FRAME);
        assert!(s.value() < v1);
    }

    #[test]
    fn test_spring_survives_long_frame() {
        let mut s = SpringValue::new(Spring::new(50.0, 15.0, 1.0), 0.0);
        s.set_target(20.0);
        s.step(Duration::from_secs(3));
        assert!((s.value() - 20.0).abs() < 1.0);
    }

    #[test]
    fn test_tween_endpoints() {
        let mut t = Tween::new(0.0, Duration::from_millis(1000), Easing::EaseInOut);
        assert!(t.is_done());
        t.set_target(0.6);
        assert_eq!(t.value(), 0.0);
        t.step(Duration::from_millis(500));
        assert!((t.value() - 0.3).abs() < 1e-9);
        t.step(Duration::from_millis(800));
        assert!(t.is_done());
        assert_eq!(t.value(), 0.6);
    }

    #[test]
    fn test_tween_retarget_starts_from_current() {
        let mut t = Tween::new(1.0, Duration::from_millis(1000), Easing::Linear);
        t.set_target(0.0);
        t.step(Duration::from_millis(250));
        assert!((t.value() - 0.75).abs() < 1e-9);
        t.set_target(1.0);
        assert!((t.value() - 0.75).abs() < 1e-9);
        t.step(Duration::from_millis(1000));
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn test_ease_in_out_shape() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_in_out(0.25) < 0.25);
    }
}
