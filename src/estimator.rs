//! Rolling device-orientation estimate fed by magnetometer and accelerometer
//! callbacks.
//!
//! The estimator is driven from a single callback thread: every accepted
//! sample overwrites the stored vector of its kind and, once both kinds are
//! present, synchronously recomputes the estimate. Nothing is smoothed.
//!
//! ```
//! use zenfinder::{OrientationEstimator, RotationDecision, SensorSample};
//!
//! let mut estimator = OrientationEstimator::new();
//! assert_eq!(estimator.current_rotation(), None);
//!
//! // Held upright in portrait, back camera facing north.
//! estimator.on_sample(SensorSample::acceleration([0.0, 9.81, 0.0]));
//! estimator.on_sample(SensorSample::magnetic([0.0, -40.0, -22.0]));
//!
//! assert_eq!(estimator.current_rotation(), Some(RotationDecision::Rotate90));
//! ```

use crate::fusion::{self, AxisRemap, OrientationEstimate};
use crate::orientation::RotationDecision;
use crate::sensor::{SensorKind, SensorSample, Vector3};

/// Orientation estimator state.
///
/// Vectors and the derived estimate belong to one activation epoch:
/// [`deactivate`](Self::deactivate) drops them (unless configured
/// otherwise) so a later [`activate`](Self::activate) never mixes stale and
/// fresh readings.
#[derive(Clone, Debug)]
pub struct OrientationEstimator {
    magnetic: Option<Vector3>,
    acceleration: Option<Vector3>,
    estimate: Option<OrientationEstimate>,
    remap: AxisRemap,
    reset_on_deactivate: bool,
    active: bool,
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationEstimator {
    /// An active estimator remapping [`AxisRemap::X_Z`].
    pub fn new() -> Self {
        Self {
            magnetic: None,
            acceleration: None,
            estimate: None,
            remap: AxisRemap::X_Z,
            reset_on_deactivate: true,
            active: true,
        }
    }

    /// Set the axis remap applied before angles are extracted.
    ///
    /// Invalidates the current estimate; it is rebuilt from the stored
    /// vectors immediately.
    pub fn remap(mut self, remap: AxisRemap) -> Self {
        self.remap = remap;
        self.estimate = None;
        self.recompute();
        self
    }

    /// Whether [`deactivate`](Self::deactivate) clears stored readings.
    pub fn reset_on_deactivate(mut self, reset: bool) -> Self {
        self.reset_on_deactivate = reset;
        self
    }

    /// Feed any sample. `Unreliable` samples are dropped, as is anything
    /// delivered while deactivated.
    pub fn on_sample(&mut self, sample: SensorSample) {
        if !sample.accuracy.is_reliable() {
            log::trace!("dropping unreliable {:?} sample", sample.kind);
            return;
        }
        match sample.kind {
            SensorKind::MagneticField => self.on_magnetic_sample(sample.values),
            SensorKind::Accelerometer => self.on_acceleration_sample(sample.values),
        }
    }

    /// Store a magnetic field reading and refresh the estimate.
    pub fn on_magnetic_sample(&mut self, v: Vector3) {
        if !self.accepting() {
            return;
        }
        self.magnetic = Some(v);
        self.recompute();
    }

    /// Store an acceleration reading and refresh the estimate.
    pub fn on_acceleration_sample(&mut self, v: Vector3) {
        if !self.accepting() {
            return;
        }
        self.acceleration = Some(v);
        self.recompute();
    }

    /// Latest estimate, `None` until both sample kinds arrived this epoch.
    pub fn estimate(&self) -> Option<OrientationEstimate> {
        self.estimate
    }

    pub fn is_ready(&self) -> bool {
        self.estimate.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rotation to apply to a still captured right now.
    pub fn current_rotation(&self) -> Option<RotationDecision> {
        self.estimate
            .and_then(|e| RotationDecision::from_roll_radians(e.roll))
    }

    /// [`current_rotation`](Self::current_rotation), or `Identity` when no
    /// estimate exists.
    pub fn current_rotation_or_default(&self) -> RotationDecision {
        self.current_rotation().unwrap_or_default()
    }

    /// Start a new activation epoch. Samples are accepted again.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// End the current epoch; sensor delivery has stopped.
    pub fn deactivate(&mut self) {
        self.active = false;
        if self.reset_on_deactivate {
            self.reset();
        }
    }

    /// Forget all readings and the estimate.
    pub fn reset(&mut self) {
        if self.magnetic.is_some() || self.acceleration.is_some() {
            log::debug!("orientation estimate reset");
        }
        self.magnetic = None;
        self.acceleration = None;
        self.estimate = None;
    }

    fn accepting(&self) -> bool {
        if !self.active {
            log::trace!("sample delivered while inactive, ignored");
        }
        self.active
    }

    /// A degenerate pair leaves the previous estimate in place.
    fn recompute(&mut self) {
        let (Some(magnetic), Some(acceleration)) = (self.magnetic, self.acceleration) else {
            return;
        };
        if let Some(r) = fusion::rotation_matrix(acceleration, magnetic) {
            self.estimate = Some(r.remap(self.remap).orientation());
        }
    }
}

/// An [`OrientationEstimator`] behind a mutex, for hosts that deliver sensor
/// callbacks on more than one thread.
///
/// One lock guards both stored vectors and the estimate, so a capture never
/// observes a half-updated pair.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct SharedEstimator {
    inner: std::sync::Mutex<OrientationEstimator>,
}

#[cfg(feature = "std")]
impl SharedEstimator {
    pub fn new(estimator: OrientationEstimator) -> Self {
        Self {
            inner: std::sync::Mutex::new(estimator),
        }
    }

    /// Run `f` with exclusive access. A poisoned lock is recovered.
    pub fn with<R>(&self, f: impl FnOnce(&mut OrientationEstimator) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn on_sample(&self, sample: SensorSample) {
        self.with(|e| e.on_sample(sample));
    }

    pub fn on_magnetic_sample(&self, v: Vector3) {
        self.with(|e| e.on_magnetic_sample(v));
    }

    pub fn on_acceleration_sample(&self, v: Vector3) {
        self.with(|e| e.on_acceleration_sample(v));
    }

    pub fn current_rotation(&self) -> Option<RotationDecision> {
        self.with(|e| e.current_rotation())
    }

    pub fn current_rotation_or_default(&self) -> RotationDecision {
        self.with(|e| e.current_rotation_or_default())
    }

    pub fn activate(&self) {
        self.with(OrientationEstimator::activate);
    }

    pub fn deactivate(&self) {
        self.with(OrientationEstimator::deactivate);
    }

    pub fn into_inner(self) -> OrientationEstimator {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
