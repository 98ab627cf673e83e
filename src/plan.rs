//! Surface-changed and picture-ready decision bundles.

use crate::orientation::RotationDecision;
use crate::select::{InvalidInput, ResolutionSelector, Size};

/// Layout the host gives its preview view when nothing else is configured.
pub const DEFAULT_PREVIEW_LAYOUT: Size = Size::new(640, 480);

/// Pixel geometry of the viewfinder surface as reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceGeometry {
    pub width: u32,
    pub height: u32,
    /// Whether the host UI is currently in portrait.
    pub portrait: bool,
}

impl SurfaceGeometry {
    pub const fn new(width: u32, height: u32, portrait: bool) -> Self {
        Self {
            width,
            height,
            portrait,
        }
    }
}

/// What the host should apply after the surface changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreviewPlan {
    /// Surface the plan was computed for.
    pub surface: SurfaceGeometry,
    /// Preview size to configure on the camera.
    pub preview: Size,
    /// Picture size to configure: the camera's first declared size.
    /// `None` when it declared none.
    pub picture: Option<Size>,
    /// Clockwise rotation of the preview stream on screen.
    pub display_orientation: RotationDecision,
    /// Size for the host's preview view, transposed in portrait.
    pub view_layout: Size,
}

/// Build a [`PreviewPlan`] for a surface and the camera's declared sizes.
///
/// ```
/// use zenfinder::{ResolutionSelector, RotationDecision, Size, SurfaceGeometry};
/// use zenfinder::plan::{DEFAULT_PREVIEW_LAYOUT, plan_preview};
///
/// let previews = [Size::new(320, 240), Size::new(640, 480), Size::new(800, 600)];
/// let pictures = [Size::new(2048, 1536), Size::new(1024, 768)];
/// let plan = plan_preview(
///     &ResolutionSelector::new(),
///     DEFAULT_PREVIEW_LAYOUT,
///     SurfaceGeometry::new(480, 800, true),
///     &previews,
///     &pictures,
/// )
/// .unwrap();
///
/// assert_eq!(plan.preview, Size::new(800, 600));
/// assert_eq!(plan.picture, Some(Size::new(2048, 1536)));
/// assert_eq!(plan.display_orientation, RotationDecision::Rotate90);
/// assert_eq!(plan.view_layout, Size::new(480, 640));
/// ```
pub fn plan_preview(
    selector: &ResolutionSelector,
    preview_layout: Size,
    surface: SurfaceGeometry,
    preview_sizes: &[Size],
    picture_sizes: &[Size],
) -> Result<PreviewPlan, InvalidInput> {
    let preview = selector.select(preview_sizes, surface.width, surface.height)?;
    let picture = picture_sizes.first().copied();

    let (display_orientation, view_layout) = if surface.portrait {
        (RotationDecision::Rotate90, preview_layout.transposed())
    } else {
        (RotationDecision::Identity, preview_layout)
    };

    log::debug!("surface = {}x{}", surface.width, surface.height);
    log::debug!("preview = {}x{}", preview.width, preview.height);
    match picture {
        Some(p) => log::debug!("picture = {}x{}", p.width, p.height),
        None => log::debug!("picture = camera default"),
    }

    Ok(PreviewPlan {
        surface,
        preview,
        picture,
        display_orientation,
        view_layout,
    })
}

/// How to turn a decoded still into the image to persist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CapturePlan {
    /// Rotation to apply to the decoded bitmap.
    pub rotation: RotationDecision,
    /// Decoded dimensions.
    pub source: Size,
    /// Dimensions after rotation.
    pub output: Size,
}

impl CapturePlan {
    pub fn new(rotation: RotationDecision, decoded_width: u32, decoded_height: u32) -> Self {
        Self {
            rotation,
            source: Size::new(decoded_width, decoded_height),
            output: rotation.transform_dimensions(decoded_width, decoded_height),
        }
    }

    /// EXIF orientation tag for hosts that tag instead of rotating pixels.
    pub fn exif_orientation(&self) -> u8 {
        self.rotation.to_exif()
    }

    /// Whether the decoded bitmap can be stored as-is.
    pub fn is_passthrough(&self) -> bool {
        self.rotation.is_identity()
    }

    /// Rotate the decoded bitmap's pixels.
    ///
    /// Returns `None` when `pixels` does not hold `source.width * source.height`
    /// elements.
    #[cfg(feature = "alloc")]
    pub fn apply<T: Copy>(&self, pixels: &[T]) -> Option<alloc::vec::Vec<T>> {
        self.rotation
            .rotate_pixels(pixels, self.source.width, self.source.height)
    }
}
