//! Frame-rate-independent interpolation laws.
//!
//! Two families are used throughout the game and must not be confused:
//! exponential decay ([`exp_smooth`]) for camera, rotor spin, engine pitch and
//! shake, and a clamped linear ramp ([`linear_ramp`]) for audio gain crossfades.

use glam::Vec3;

/// Exponential decay toward `target`: `mix(current, target, 1 - exp(-rate * dt))`.
///
/// Monotonically approaches the target without overshoot for any positive
/// `rate` and `dt`; once converged, repeated application is a fixed point.
pub fn exp_smooth(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let factor = 1.0 - (-rate * dt).exp();
    current + (target - current) * factor
}

/// Component-wise [`exp_smooth`] for vectors.
pub fn exp_smooth_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    let factor = 1.0 - (-rate * dt).exp();
    current + (target - current) * factor
}

/// Linear ramp toward `target` with a per-frame step of `speed * dt`, clamped
/// so the value lands exactly on the target instead of oscillating around it.
pub fn linear_ramp(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let diff = target - current;
    let step = speed * dt;
    if diff.abs() < step {
        target
    } else if diff > 0.0 {
        current + step
    } else {
        current - step
    }
}

/// Hermite smoothstep of `x` over `[edge0, edge1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_smooth_approaches_monotonically_without_overshoot() {
        let target = 10.0;
        let mut current = 0.0;
        let mut previous = current;
        for _ in 0..200 {
            current = exp_smooth(current, target, 5.0, 0.016);
            assert!(current >= previous, "must not move away from target");
            assert!(current <= target, "must not overshoot");
            previous = current;
        }
        assert!((target - current).abs() < 1e-3);
    }

    #[test]
    fn exp_smooth_is_idempotent_at_target() {
        let value = exp_smooth(3.5, 3.5, 12.0, 0.25);
        assert_eq!(value, 3.5);
    }

    #[test]
    fn exp_smooth_converges_faster_with_larger_dt() {
        let slow = exp_smooth(0.0, 1.0, 4.0, 0.01);
        let fast = exp_smooth(0.0, 1.0, 4.0, 0.1);
        assert!(fast > slow);
    }

    #[test]
    fn linear_ramp_lands_exactly_on_target() {
        let mut gain = 0.0;
        for _ in 0..100 {
            gain = linear_ramp(gain, 1.0, 1.5, 0.016);
        }
        assert_eq!(gain, 1.0);
    }

    #[test]
    fn linear_ramp_step_is_constant_unlike_exponential() {
        // The first two linear steps are identical; the exponential ones shrink.
        let l0 = linear_ramp(0.0, 1.0, 1.5, 0.016);
        let l1 = linear_ramp(l0, 1.0, 1.5, 0.016) - l0;
        assert!((l1 - l0).abs() < 1e-6);

        let e0 = exp_smooth(0.0, 1.0, 1.5, 0.016);
        let e1 = exp_smooth(e0, 1.0, 1.5, 0.016) - e0;
        assert!(e1 < e0);
    }

    #[test]
    fn smoothstep_is_clamped_and_centered() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
