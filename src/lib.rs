//! Camera viewfinder geometry: preview size selection and sensor-fused
//! capture rotation.
//!
//! Pure decisions over data the host platform already delivered: no camera
//! control, no rendering, no I/O, `no_std` compatible.
//!
//! # Modules
//!
//! - [`select`]: Nearest-aspect, nearest-height preview size selection
//! - [`sensor`]: Raw magnetometer/accelerometer samples and accuracy flags
//! - [`fusion`]: Gravity + geomagnetic rotation matrix, axis remap, angles
//! - [`estimator`]: Rolling orientation estimate and activation epochs
//! - [`orientation`]: Capture rotation buckets, quarter-turn group, pixel mapping
//! - [`plan`]: Surface-changed and picture-ready decision bundles
//! - [`viewfinder`]: Host-facing orchestrator behind narrow sink traits

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod estimator;
pub mod fusion;
pub mod orientation;
pub mod plan;
pub mod select;
pub mod sensor;
pub mod viewfinder;

// Re-exports: core types
pub use estimator::OrientationEstimator;
#[cfg(feature = "std")]
pub use estimator::SharedEstimator;
pub use fusion::{Axis, AxisRemap, OrientationEstimate, RotationMatrix};
pub use orientation::RotationDecision;
pub use plan::{CapturePlan, PreviewPlan, SurfaceGeometry, plan_preview};
pub use select::{InvalidInput, ResolutionSelector, Size, select_optimal};
pub use sensor::{SensorAccuracy, SensorKind, SensorSample, Vector3};
pub use viewfinder::{
    PictureSink, SampleSink, SurfaceEvent, SurfaceSink, Viewfinder, ViewfinderConfig,
};
