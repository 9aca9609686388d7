//! Coordinate limit force: a smooth penalty torque outside a coordinate range.
//!
//! Inside `[lower, upper]` the torque is zero. Past a bound the stiffness
//! ramps from zero at the bound to its full value at `bound ± transition`
//! through the cubic smooth step `3s² − 2s³`, then stays constant:
//!
//! ```text
//! K_up(q)  = K_up  · step((q − upper) / transition)
//! K_low(q) = K_low · step((lower − q) / transition)
//! τ = −K_up(q)·(q − upper) + K_low(q)·(lower − q)
//!     − c·(K_up(q)/K_up + K_low(q)/K_low)·q̇
//! ```
//!
//! Torque and its first derivative are continuous everywhere, and the torque
//! at the exact bound is zero.

use chain_types::CoordinateLimitConfig;

/// Which side of the free range a coordinate is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitState {
    /// Within `[lower, upper]`.
    Free,
    /// Below the lower bound by the contained (positive) penetration.
    BelowLower(f64),
    /// Above the upper bound by the contained (positive) penetration.
    AboveUpper(f64),
}

impl LimitState {
    /// Penetration depth (0 if free).
    #[must_use]
    pub fn penetration(&self) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::BelowLower(d) | Self::AboveUpper(d) => *d,
        }
    }
}

/// Cubic smooth step on `[0, 1]`, clamped outside.
#[inline]
fn smooth_step(s: f64) -> f64 {
    let s = s.clamp(0.0, 1.0);
    s * s * (3.0 - 2.0 * s)
}

/// Penalty torque outside a coordinate's range.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateLimitForce {
    /// Force name.
    pub name: String,
    /// Index of the coordinate the force acts on.
    pub coordinate: usize,
    /// Upper bound (rad).
    pub upper: f64,
    /// Full stiffness above the upper bound (N·m/rad).
    pub upper_stiffness: f64,
    /// Lower bound (rad).
    pub lower: f64,
    /// Full stiffness below the lower bound (N·m/rad).
    pub lower_stiffness: f64,
    /// Damping while engaged (N·m·s/rad).
    pub damping: f64,
    /// Stiffness ramp width (rad).
    pub transition: f64,
}

impl CoordinateLimitForce {
    /// Resolve a validated configuration against coordinate index `coordinate`.
    #[must_use]
    pub fn new(config: &CoordinateLimitConfig, coordinate: usize) -> Self {
        Self {
            name: config.name.clone(),
            coordinate,
            upper: config.upper_limit,
            upper_stiffness: config.upper_stiffness,
            lower: config.lower_limit,
            lower_stiffness: config.lower_stiffness,
            damping: config.damping,
            transition: config.transition,
        }
    }

    /// Limit state at coordinate value `q`.
    #[must_use]
    pub fn state(&self, q: f64) -> LimitState {
        if q > self.upper {
            LimitState::AboveUpper(q - self.upper)
        } else if q < self.lower {
            LimitState::BelowLower(self.lower - q)
        } else {
            LimitState::Free
        }
    }

    /// Fractions of full stiffness engaged above and below: `(up, low)`.
    fn engagement(&self, q: f64) -> (f64, f64) {
        (
            smooth_step((q - self.upper) / self.transition),
            smooth_step((self.lower - q) / self.transition),
        )
    }

    /// Generalized torque at coordinate value `q` and rate `qdot`.
    #[must_use]
    pub fn torque(&self, q: f64, qdot: f64) -> f64 {
        let (up, low) = self.engagement(q);
        let spring = -self.upper_stiffness * up * (q - self.upper)
            + self.lower_stiffness * low * (self.lower - q);
        spring - self.damping * (up + low) * qdot
    }

    /// Elastic energy stored in the engaged spring (J).
    ///
    /// Integral of the spring torque from the bound to `q`; zero inside the
    /// free range.
    #[must_use]
    pub fn potential_energy(&self, q: f64) -> f64 {
        match self.state(q) {
            LimitState::Free => 0.0,
            LimitState::AboveUpper(d) => ramp_energy(self.upper_stiffness, self.transition, d),
            LimitState::BelowLower(d) => ramp_energy(self.lower_stiffness, self.transition, d),
        }
    }

    /// Power dissipated by the limit damping (W), never negative.
    #[must_use]
    pub fn power_dissipation(&self, q: f64, qdot: f64) -> f64 {
        let (up, low) = self.engagement(q);
        self.damping * (up + low) * qdot * qdot
    }
}

/// ∫₀ᵈ K·step(x/w)·x dx.
fn ramp_energy(k: f64, w: f64, d: f64) -> f64 {
    if d <= w {
        let s = d / w;
        k * d * d * s * s * (0.75 - 0.4 * s)
    } else {
        k * (0.35 * w * w + 0.5 * (d * d - w * w))
    }
}
