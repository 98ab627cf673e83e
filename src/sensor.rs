//! Raw sensor samples as delivered by the host's sensor subsystem.

use core::ops::{Mul, Neg};
use num_traits::Float;

/// A three-axis reading in device coordinates.
///
/// Magnetic field samples are in µT, acceleration samples in m/s².
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product `self × other`.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn norm(self) -> f32 {
        Float::sqrt(self.norm_squared())
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Which physical sensor produced a sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorKind {
    MagneticField,
    Accelerometer,
}

/// Accuracy status attached to each sample by the sensor subsystem.
///
/// Ordered from worst to best, matching the platform status codes 0..=3.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorAccuracy {
    /// The reading cannot be trusted; it is dropped without touching state.
    Unreliable,
    Low,
    Medium,
    #[default]
    High,
}

impl SensorAccuracy {
    /// Map a platform status code. Codes above 3 clamp to `High`, negative
    /// codes are treated as `Unreliable`.
    pub fn from_status(code: i32) -> Self {
        match code {
            i32::MIN..=0 => Self::Unreliable,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn is_reliable(self) -> bool {
        self != Self::Unreliable
    }
}

/// One reading plus its provenance.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSample {
    pub kind: SensorKind,
    pub values: Vector3,
    pub accuracy: SensorAccuracy,
}

impl SensorSample {
    /// A magnetic field reading with `High` accuracy.
    pub fn magnetic(values: impl Into<Vector3>) -> Self {
        Self {
            kind: SensorKind::MagneticField,
            values: values.into(),
            accuracy: SensorAccuracy::High,
        }
    }

    /// An accelerometer reading with `High` accuracy.
    pub fn acceleration(values: impl Into<Vector3>) -> Self {
        Self {
            kind: SensorKind::Accelerometer,
            values: values.into(),
            accuracy: SensorAccuracy::High,
        }
    }

    /// Override the accuracy flag.
    pub fn with_accuracy(mut self, accuracy: SensorAccuracy) -> Self {
        self.accuracy = accuracy;
        self
    }
}
