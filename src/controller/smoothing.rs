//! Critically damped velocity smoothing.
use bevy::prelude::*;

/// Smallest smoothing time accepted, anything below is treated as this.
const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Moves `current` towards `target` like a critically damped spring.
///
/// `velocity` is the spring's internal state and must be kept between calls,
/// it is what makes successive calls continue the same motion instead of
/// restarting it. `smooth_time` is roughly the time it takes to reach the
/// target. The result never passes `target`; when it would, it lands on it
/// and the accumulator is reset.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    delta: f32,
) -> Vec2 {
    if delta <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;

    // polynomial fit of exp(-x), cheap and stable for the small x we see
    let x = omega * delta;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec2::ZERO;
    }
    output
}
