use std::time::Duration;

/// Length of the arc fill transition.
pub const ARC_TRANSITION: Duration = Duration::from_millis(1000);
/// Length of a marker flip from number to check.
pub const FLIP_TRANSITION: Duration = Duration::from_millis(300);

/// Cubic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
        }
    }

    /// A tween that already sits at `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let t = ease_in_out(self.progress(elapsed));
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Starts a new tween towards `to` from wherever this one is at `elapsed`.
    pub fn retarget(&self, elapsed: Duration, to: f64) -> Self {
        Self {
            from: self.value_at(elapsed),
            to,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out_is_symmetric() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out(0.25) + ease_in_out(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tween_endpoints() {
        let tween = Tween::new(0.0, 60.0, ARC_TRANSITION);
        assert_eq!(tween.value_at(Duration::ZERO), 0.0);
        assert_eq!(tween.value_at(ARC_TRANSITION), 60.0);
        assert_eq!(tween.value_at(Duration::from_secs(5)), 60.0);
        assert!(!tween.is_finished(Duration::from_millis(999)));
        assert!(tween.is_finished(ARC_TRANSITION));
    }

    #[test]
    fn test_settled_is_finished_immediately() {
        let tween = Tween::settled(42.0);
        assert!(tween.is_finished(Duration::ZERO));
        assert_eq!(tween.value_at(Duration::ZERO), 42.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let tween = Tween::new(0.0, 100.0, ARC_TRANSITION);
        let halfway = Duration::from_millis(500);
        let next = tween.retarget(halfway, 20.0);
        assert!((next.from - 50.0).abs() < 1e-9);
        assert_eq!(next.to, 20.0);
    }
}
