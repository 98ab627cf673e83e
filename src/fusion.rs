//! Gravity + geomagnetic fusion into a device attitude.
//!
//! The accelerometer gives the "up" axis, the magnetometer gives magnetic
//! north; crossing the two yields an orthonormal East-North-Up basis
//! expressed in device coordinates. That basis can be re-expressed for a
//! differently held device ([`AxisRemap`]) and decomposed into
//! azimuth/pitch/roll ([`OrientationEstimate`]).
//!
//! ```text
//!     H = E × A          east  (normalised)
//!     A = A / |A|        up
//!     M = A × H          north
//!
//!         ┌ Hx Hy Hz ┐
//!     R = │ Mx My Mz │   world ← device
//!         └ Ax Ay Az ┘
//! ```

use num_traits::Float;

use crate::sensor::Vector3;

/// Below this `|E × A|` the fusion is rejected: the device is in free fall
/// or the field is nearly parallel to gravity (close to a magnetic pole).
const MIN_EAST_NORM: f32 = 0.1;

/// Row-major 3×3 rotation matrix mapping device coordinates to world
/// (East, North, Up) coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotationMatrix(pub [f32; 9]);

impl RotationMatrix {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Element at `row`, `col` (both 0..3).
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[row * 3 + col]
    }

    /// Re-express the matrix for a device whose axes are reassigned by `remap`.
    pub fn remap(&self, remap: AxisRemap) -> Self {
        let (x, sx) = (remap.x.index(), remap.x.is_negative());
        let (y, sy) = (remap.y.index(), remap.y.is_negative());
        let (z, sz) = remap.z_axis();

        let pick = |v: f32, negate: bool| if negate { -v } else { v };
        let mut out = [0.0f32; 9];
        for row in 0..3 {
            let base = row * 3;
            out[base + x] = pick(self.0[base], sx);
            out[base + y] = pick(self.0[base + 1], sy);
            out[base + z] = pick(self.0[base + 2], sz);
        }
        Self(out)
    }

    /// Decompose into azimuth, pitch and roll.
    pub fn orientation(&self) -> OrientationEstimate {
        let r = &self.0;
        OrientationEstimate {
            azimuth: Float::atan2(r[1], r[4]),
            pitch: Float::asin(-r[7]),
            roll: Float::atan2(-r[6], r[8]),
        }
    }
}

/// Rotation about the world East axis by the magnetic dip angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InclinationMatrix(pub [f32; 9]);

impl InclinationMatrix {
    /// Magnetic inclination in radians, positive when the field points below
    /// the horizon.
    pub fn inclination(&self) -> f32 {
        Float::atan2(self.0[5], self.0[4])
    }
}

/// Device attitude in radians.
///
/// Only meaningful when derived from a magnetic and an acceleration sample
/// taken in the same activation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationEstimate {
    /// Rotation about the up axis, 0 at magnetic north.
    pub azimuth: f32,
    /// Rotation about the (remapped) device X axis.
    pub pitch: f32,
    /// Rotation about the (remapped) device Y axis.
    pub roll: f32,
}

/// A device axis, optionally reversed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
    MinusX,
    MinusY,
    MinusZ,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Self::X | Self::MinusX => 0,
            Self::Y | Self::MinusY => 1,
            Self::Z | Self::MinusZ => 2,
        }
    }

    const fn is_negative(self) -> bool {
        matches!(self, Self::MinusX | Self::MinusY | Self::MinusZ)
    }
}

/// Which device axes the world X and Y axes are mapped onto.
///
/// The third axis is implied and signed so the result stays right-handed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "AxisPair")
)]
pub struct AxisRemap {
    x: Axis,
    y: Axis,
}

impl AxisRemap {
    /// No remapping.
    pub const IDENTITY: Self = Self {
        x: Axis::X,
        y: Axis::Y,
    };

    /// Device Y onto Z: the sensor frame of a landscape-mounted sensor read
    /// by an upright, portrait-held device.
    pub const X_Z: Self = Self {
        x: Axis::X,
        y: Axis::Z,
    };

    /// Returns `None` when both arguments name the same physical axis.
    pub const fn new(x: Axis, y: Axis) -> Option<Self> {
        if x.index() == y.index() {
            None
        } else {
            Some(Self { x, y })
        }
    }

    pub fn x(self) -> Axis {
        self.x
    }

    pub fn y(self) -> Axis {
        self.y
    }

    /// Index and sign of the implied third axis.
    fn z_axis(self) -> (usize, bool) {
        let (x, y) = (self.x.index(), self.y.index());
        let z = 3 - x - y;
        let cyclic = y == (x + 1) % 3;
        let negative = self.x.is_negative() ^ self.y.is_negative() ^ !cyclic;
        (z, negative)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct AxisPair {
    x: Axis,
    y: Axis,
}

#[cfg(feature = "serde")]
impl TryFrom<AxisPair> for AxisRemap {
    type Error = &'static str;

    fn try_from(pair: AxisPair) -> Result<Self, Self::Error> {
        Self::new(pair.x, pair.y).ok_or("remapped axes must be distinct")
    }
}

/// Fuse a gravity and a geomagnetic reading into a rotation matrix.
///
/// Returns `None` when the inputs cannot define a basis: acceleration below
/// 10% of standard gravity, non-finite components, or a magnetic field
/// (nearly) parallel to gravity.
pub fn rotation_matrix(gravity: Vector3, geomagnetic: Vector3) -> Option<RotationMatrix> {
    let (east, up, north) = basis(gravity, geomagnetic)?;
    Some(RotationMatrix([
        east.x, east.y, east.z, //
        north.x, north.y, north.z, //
        up.x, up.y, up.z,
    ]))
}

/// Magnetic inclination matrix for the same inputs as [`rotation_matrix`].
pub fn inclination_matrix(gravity: Vector3, geomagnetic: Vector3) -> Option<InclinationMatrix> {
    let (_, up, north) = basis(gravity, geomagnetic)?;
    let inv_e = 1.0 / geomagnetic.norm();
    let c = geomagnetic.dot(north) * inv_e;
    let s = -geomagnetic.dot(up) * inv_e;
    Some(InclinationMatrix([
        1.0, 0.0, 0.0, //
        0.0, c, s, //
        0.0, -s, c,
    ]))
}

/// Unit (east, up, north) vectors in device coordinates.
fn basis(gravity: Vector3, geomagnetic: Vector3) -> Option<(Vector3, Vector3, Vector3)> {
    if !gravity.is_finite() || !geomagnetic.is_finite() {
        return None;
    }

    const G: f32 = 9.81;
    const FREE_FALL_SQUARED: f32 = 0.01 * G * G;
    let gravity_sq = gravity.norm_squared();
    if gravity_sq < FREE_FALL_SQUARED {
        log::trace!("fusion rejected: free fall (|a|² = {gravity_sq})");
        return None;
    }

    let east = geomagnetic.cross(gravity);
    let east_norm = east.norm();
    if east_norm < MIN_EAST_NORM {
        log::trace!("fusion rejected: field parallel to gravity (|E×A| = {east_norm})");
        return None;
    }

    let east = east * (1.0 / east_norm);
    let up = gravity * (1.0 / Float::sqrt(gravity_sq));
    let north = up.cross(east);
    Some((east, up, north))
}
