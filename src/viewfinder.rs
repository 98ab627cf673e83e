//! Host-facing orchestrator and the narrow capability traits it implements.
//!
//! A host platform owns the camera, the surface and the sensor subscription.
//! It forwards each callback to one of the sinks below instead of embedding
//! the decision logic in its own listeners:
//!
//! | host callback              | sink                              |
//! |----------------------------|-----------------------------------|
//! | sensor value changed       | [`SampleSink::on_sample`]         |
//! | surface created/changed/.. | [`SurfaceSink::on_surface_event`] |
//! | picture data ready         | [`PictureSink::on_picture_ready`] |
//! | pause / resume             | [`Viewfinder::pause`] / [`Viewfinder::resume`] |

use crate::estimator::OrientationEstimator;
use crate::fusion::AxisRemap;
use crate::plan::{self, CapturePlan, DEFAULT_PREVIEW_LAYOUT, PreviewPlan, SurfaceGeometry};
use crate::select::{ASPECT_TOLERANCE, InvalidInput, ResolutionSelector, Size};
use crate::sensor::SensorSample;

/// Receives raw sensor samples.
pub trait SampleSink {
    fn on_sample(&mut self, sample: SensorSample);
}

/// Receives surface lifecycle events.
pub trait SurfaceSink {
    /// Returns the plan to apply when the event calls for reconfiguration.
    fn on_surface_event(
        &mut self,
        event: SurfaceEvent<'_>,
    ) -> Result<Option<PreviewPlan>, InvalidInput>;
}

/// Receives "picture taken" notifications with the decoded dimensions.
pub trait PictureSink {
    fn on_picture_ready(&mut self, decoded_width: u32, decoded_height: u32) -> CapturePlan;
}

/// Surface lifecycle as seen by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceEvent<'a> {
    Created,
    /// Geometry changed; the camera's current capabilities are attached.
    Changed {
        geometry: SurfaceGeometry,
        preview_sizes: &'a [Size],
        picture_sizes: &'a [Size],
    },
    Destroyed,
}

/// Tunables for a [`Viewfinder`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewfinderConfig {
    /// Aspect ratio tolerance for preview selection.
    pub aspect_tolerance: f64,
    /// Landscape size of the host's preview view.
    pub preview_layout: Size,
    /// Sensor axis remap applied before extracting roll.
    pub remap: AxisRemap,
    /// Drop stored sensor readings on pause.
    pub reset_on_deactivate: bool,
}

impl Default for ViewfinderConfig {
    fn default() -> Self {
        Self {
            aspect_tolerance: ASPECT_TOLERANCE,
            preview_layout: DEFAULT_PREVIEW_LAYOUT,
            remap: AxisRemap::X_Z,
            reset_on_deactivate: true,
        }
    }
}

impl ViewfinderConfig {
    pub fn aspect_tolerance(mut self, tolerance: f64) -> Self {
        self.aspect_tolerance = tolerance;
        self
    }

    pub fn preview_layout(mut self, layout: Size) -> Self {
        self.preview_layout = layout;
        self
    }

    pub fn remap(mut self, remap: AxisRemap) -> Self {
        self.remap = remap;
        self
    }

    pub fn reset_on_deactivate(mut self, reset: bool) -> Self {
        self.reset_on_deactivate = reset;
        self
    }

    fn selector(&self) -> ResolutionSelector {
        ResolutionSelector::new().aspect_tolerance(self.aspect_tolerance)
    }

    fn estimator(&self) -> OrientationEstimator {
        OrientationEstimator::new()
            .remap(self.remap)
            .reset_on_deactivate(self.reset_on_deactivate)
    }
}

/// Selection and estimation wired behind the sink traits.
#[derive(Clone, Debug)]
pub struct Viewfinder {
    config: ViewfinderConfig,
    estimator: OrientationEstimator,
    preview: Option<PreviewPlan>,
}

impl Default for Viewfinder {
    fn default() -> Self {
        Self::new(ViewfinderConfig::default())
    }
}

impl Viewfinder {
    pub fn new(config: ViewfinderConfig) -> Self {
        Self {
            estimator: config.estimator(),
            config,
            preview: None,
        }
    }

    pub fn config(&self) -> &ViewfinderConfig {
        &self.config
    }

    pub fn estimator(&self) -> &OrientationEstimator {
        &self.estimator
    }

    /// The plan from the most recent surface change, if the surface is alive.
    pub fn preview_plan(&self) -> Option<&PreviewPlan> {
        self.preview.as_ref()
    }

    /// Sensor delivery stopped; the viewfinder is no longer visible.
    pub fn pause(&mut self) {
        self.estimator.deactivate();
    }

    /// Sensor delivery restarted.
    pub fn resume(&mut self) {
        self.estimator.activate();
    }
}

impl SampleSink for OrientationEstimator {
    fn on_sample(&mut self, sample: SensorSample) {
        OrientationEstimator::on_sample(self, sample);
    }
}

impl SampleSink for Viewfinder {
    fn on_sample(&mut self, sample: SensorSample) {
        self.estimator.on_sample(sample);
    }
}

impl SurfaceSink for Viewfinder {
    fn on_surface_event(
        &mut self,
        event: SurfaceEvent<'_>,
    ) -> Result<Option<PreviewPlan>, InvalidInput> {
        match event {
            SurfaceEvent::Created => Ok(None),
            SurfaceEvent::Changed {
                geometry,
                preview_sizes,
                picture_sizes,
            } => {
                let plan = plan::plan_preview(
                    &self.config.selector(),
                    self.config.preview_layout,
                    geometry,
                    preview_sizes,
                    picture_sizes,
                )?;
                self.preview = Some(plan);
                Ok(Some(plan))
            }
            SurfaceEvent::Destroyed => {
                self.preview = None;
                Ok(None)
            }
        }
    }
}

impl PictureSink for Viewfinder {
    fn on_picture_ready(&mut self, decoded_width: u32, decoded_height: u32) -> CapturePlan {
        let rotation = match self.estimator.current_rotation() {
            Some(r) => r,
            None => {
                log::debug!("no orientation estimate at capture, storing unrotated");
                Default::default()
            }
        };
        let plan = CapturePlan::new(rotation, decoded_width, decoded_height);
        log::debug!(
            "capture {}x{} rotated {}° to {}x{}",
            decoded_width,
            decoded_height,
            rotation.degrees(),
            plan.output.width,
            plan.output.height
        );
        plan
    }
}
