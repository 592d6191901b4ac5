use glam::{Vec2, Vec3};

/// Fraction of the remaining gap left after `delta_time` seconds.
///
/// Zero (snap) for a non-positive time constant, one (hold) for a non-positive or NaN step.
pub fn decay_factor(time_constant: f32, delta_time: f32) -> f32 {
    if !(delta_time > 0.0) {
        return 1.0;
    }
    if !(time_constant > 0.0) {
        return 0.0;
    }
    (-delta_time / time_constant).exp()
}

/// Move `current` toward `target`, shrinking the gap by `exp(-delta_time / time_constant)`.
pub fn damp(current: f32, target: f32, time_constant: f32, delta_time: f32) -> f32 {
    let k = decay_factor(time_constant, delta_time);
    if k == 0.0 {
        return target;
    }
    target + (current - target) * k
}

/// Per-axis [`damp`] for vectors.
pub fn damp_vec3(current: Vec3, target: Vec3, time_constant: f32, delta_time: f32) -> Vec3 {
    Vec3::new(
        damp(current.x, target.x, time_constant, delta_time),
        damp(current.y, target.y, time_constant, delta_time),
        damp(current.z, target.z, time_constant, delta_time),
    )
}

/// A value that can be smoothed component-wise.
pub trait Dampable: Copy + PartialEq {
    const ZERO: Self;

    fn damp_toward(self, target: Self, time_constant: f32, delta_time: f32) -> Self;

    /// Displacement from `from` to `self` divided by `delta_time`.
    fn rate_from(self, from: Self, delta_time: f32) -> Self;
}

impl Dampable for f32 {
    const ZERO: Self = 0.0;

    fn damp_toward(self, target: Self, time_constant: f32, delta_time: f32) -> Self {
        damp(self, target, time_constant, delta_time)
    }

    fn rate_from(self, from: Self, delta_time: f32) -> Self {
        (self - from) / delta_time
    }
}

impl Dampable for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn damp_toward(self, target: Self, time_constant: f32, delta_time: f32) -> Self {
        Vec2::new(
            damp(self.x, target.x, time_constant, delta_time),
            damp(self.y, target.y, time_constant, delta_time),
        )
    }

    fn rate_from(self, from: Self, delta_time: f32) -> Self {
        (self - from) / delta_time
    }
}

impl Dampable for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn damp_toward(self, target: Self, time_constant: f32, delta_time: f32) -> Self {
        damp_vec3(self, target, time_constant, delta_time)
    }

    fn rate_from(self, from: Self, delta_time: f32) -> Self {
        (self - from) / delta_time
    }
}

/// One smoothed channel: target, current value, velocity, and time constant.
///
/// Value and velocity only change together, inside [`Damped::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damped<T: Dampable> {
    value: T,
    target: T,
    velocity: T,
    time_constant: f32,
}

impl<T: Dampable> Damped<T> {
    /// Start at rest on `value`. Negative time constants are treated as zero (snap).
    pub fn new(value: T, time_constant: f32) -> Self {
        Self {
            value,
            target: value,
            velocity: T::ZERO,
            time_constant: time_constant.max(0.0),
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn time_constant(&self) -> f32 {
        self.time_constant
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Step toward the current target and return the new value.
    pub fn advance(&mut self, delta_time: f32) -> T {
        let previous = self.value;
        self.value = previous.damp_toward(self.target, self.time_constant, delta_time);
        self.velocity = if delta_time > 0.0 && self.time_constant > 0.0 {
            self.value.rate_from(previous, delta_time)
        } else {
            T::ZERO
        };
        self.value
    }
}
