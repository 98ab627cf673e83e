//! Preview size selection against a camera's discrete resolution list.
//!
//! The camera declares a fixed set of preview sizes; the viewfinder surface
//! has whatever pixel dimensions the OS gave it. Selection prefers sizes
//! whose aspect ratio is close to the surface's, then the one whose height
//! is nearest. Pure geometry, no allocations, `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use zenfinder::{Size, select_optimal};
//!
//! let sizes = [Size::new(320, 240), Size::new(640, 480), Size::new(1280, 720)];
//! let chosen = select_optimal(&sizes, 1280, 752).unwrap();
//!
//! // 1280×720 is the only 16:9-ish candidate.
//! assert_eq!(chosen, Size::new(1280, 720));
//! ```

use num_traits::Float;

/// Default absolute tolerance between candidate and target aspect ratios.
pub const ASPECT_TOLERANCE: f64 = 0.1;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The same size with width and height exchanged.
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Width divided by height. Not finite when `height` is zero.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Rejected selection input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvalidInput {
    /// The camera offered no candidate sizes.
    EmptyCandidates,
    /// Target width or height is zero.
    ZeroTargetDimension,
}

impl core::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyCandidates => f.write_str("no candidate sizes to select from"),
            Self::ZeroTargetDimension => f.write_str("target width or height is zero"),
        }
    }
}

impl core::error::Error for InvalidInput {}

/// Nearest-aspect-then-nearest-height preview size selector.
///
/// ```
/// use zenfinder::{ResolutionSelector, Size};
///
/// let sizes = [Size::new(640, 480), Size::new(800, 600)];
/// let chosen = ResolutionSelector::new()
///     .aspect_tolerance(0.05)
///     .select(&sizes, 1024, 768)
///     .unwrap();
/// assert_eq!(chosen, Size::new(800, 600));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionSelector {
    /// Maximum `|candidate_ratio - target_ratio|` for the aspect pass.
    pub aspect_tolerance: f64,
}

impl Default for ResolutionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionSelector {
    /// Selector with the default tolerance of [`ASPECT_TOLERANCE`].
    pub const fn new() -> Self {
        Self {
            aspect_tolerance: ASPECT_TOLERANCE,
        }
    }

    /// Set the aspect ratio tolerance.
    pub fn aspect_tolerance(mut self, tolerance: f64) -> Self {
        self.aspect_tolerance = tolerance;
        self
    }

    /// Pick the best candidate for a `target_width × target_height` surface.
    ///
    /// Candidates within tolerance of the target aspect ratio win over all
    /// others; among the winners (or among everything, if nothing matched)
    /// the smallest `|height - target_height|` is chosen, earliest first.
    pub fn select(
        &self,
        sizes: &[Size],
        target_width: u32,
        target_height: u32,
    ) -> Result<Size, InvalidInput> {
        if target_width == 0 || target_height == 0 {
            return Err(InvalidInput::ZeroTargetDimension);
        }
        if sizes.is_empty() {
            return Err(InvalidInput::EmptyCandidates);
        }

        let target_ratio = target_width as f64 / target_height as f64;

        // Step 1: aspect-matched candidates only. A non-finite ratio
        // (zero-height candidate) never satisfies `<=`.
        let aspect_match = nearest_height(
            sizes.iter().copied().filter(|s| {
                Float::abs(s.aspect_ratio() - target_ratio) <= self.aspect_tolerance
            }),
            target_height,
        );

        // Step 2: nothing matched, ignore aspect ratio.
        let (chosen, matched) = match aspect_match {
            Some(s) => (s, true),
            None => match nearest_height(sizes.iter().copied(), target_height) {
                Some(s) => (s, false),
                None => return Err(InvalidInput::EmptyCandidates),
            },
        };

        log::debug!(
            "preview size {}x{} for surface {}x{} (aspect match: {})",
            chosen.width,
            chosen.height,
            target_width,
            target_height,
            matched
        );
        Ok(chosen)
    }
}

/// Select the optimal preview size with the default tolerance.
///
/// Shorthand for `ResolutionSelector::new().select(..)`.
pub fn select_optimal(
    sizes: &[Size],
    target_width: u32,
    target_height: u32,
) -> Result<Size, InvalidInput> {
    ResolutionSelector::new().select(sizes, target_width, target_height)
}

/// First candidate with minimal height distance. Strict `<` keeps the
/// earliest on ties.
fn nearest_height(candidates: impl Iterator<Item = Size>, target_height: u32) -> Option<Size> {
    let mut best: Option<(Size, u32)> = None;
    for size in candidates {
        let diff = size.height.abs_diff(target_height);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((size, diff)),
        }
    }
    best.map(|(size, _)| size)
}
