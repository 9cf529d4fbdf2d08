//! Exponential smoothing between successive axis outputs
//!
//! Each `step` moves the current value a fixed fraction `alpha` of the way
//! toward the target and snaps onto it once the gap falls below `epsilon`,
//! so a stationary target is reached exactly instead of approached forever.

/// Default snap distance
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Single-axis exponential filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    current: f64,
    target: f64,
    alpha: f64,
    epsilon: f64,
}

impl Smoother {
    /// Create a filter at rest on 0.0
    ///
    /// `alpha` is clamped to (0, 1]; 1.0 makes the filter a pass-through.
    pub fn new(alpha: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            alpha: sanitize_alpha(alpha),
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = if epsilon.is_finite() { epsilon.abs() } else { DEFAULT_EPSILON };
        self
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = sanitize_alpha(alpha);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Whether the filter has reached its target
    pub fn settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one tick and return the new current value
    pub fn step(&mut self) -> f64 {
        let gap = self.target - self.current;
        if gap.abs() < self.epsilon {
            self.current = self.target;
        } else {
            self.current += gap * self.alpha;
            if (self.target - self.current).abs() < self.epsilon {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Jump straight to `value` with no blending
    pub fn reset(&mut self, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.current = value;
        self.target = value;
    }
}

fn sanitize_alpha(alpha: f64) -> f64 {
    if alpha.is_finite() && alpha > 0.0 {
        alpha.min(1.0)
    } else {
        1.0
    }
}
