//! Capture rotation: roll buckets, quarter-turn group, and pixel transforms.

use num_traits::Float;

use crate::select::Size;

/// Rotation to apply to a captured still before it is persisted.
///
/// Angles are clockwise in image coordinates (y down). The four values form
/// the cyclic group of quarter turns; `Identity` is the explicit default
/// used when no orientation estimate exists.
///
/// ```text
/// roll (floor, degrees)        rotation
/// (-45, 45]                      90°
/// (45, 135]                     180°
/// (-135, -45]                     0°
/// (135, 180] and [-180, -135]   -90°
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDecision {
    /// No rotation. EXIF 1.
    #[default]
    Identity,
    /// 90° clockwise. EXIF 6.
    Rotate90,
    /// 180°. EXIF 3.
    Rotate180,
    /// 90° counter-clockwise. EXIF 8.
    RotateMinus90,
}

impl RotationDecision {
    /// All four rotations, indexed by clockwise quarter turns.
    pub const ALL: [Self; 4] = [
        Self::Identity,
        Self::Rotate90,
        Self::Rotate180,
        Self::RotateMinus90,
    ];

    /// Bucket an integer roll angle in degrees.
    ///
    /// Values outside `[-180, 180]` are wrapped into it first; `180` and
    /// `-180` land in the same bucket.
    pub fn from_roll_degrees(degrees: i32) -> Self {
        let wrapped = degrees.rem_euclid(360);
        let d = if wrapped > 180 { wrapped - 360 } else { wrapped };

        if d > -45 && d <= 45 {
            Self::Rotate90
        } else if d > 45 && d <= 135 {
            Self::Rotate180
        } else if d > -135 && d <= -45 {
            Self::Identity
        } else {
            Self::RotateMinus90
        }
    }

    /// Bucket a roll angle in radians, floored to whole degrees.
    ///
    /// Returns `None` for a non-finite roll.
    pub fn from_roll_radians(roll: f32) -> Option<Self> {
        if !roll.is_finite() {
            return None;
        }
        let degrees = Float::floor((roll as f64).to_degrees());
        Some(Self::from_roll_degrees(degrees as i32))
    }

    /// Signed angle: 0, 90, 180 or -90.
    pub fn degrees(self) -> i32 {
        match self {
            Self::Identity => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::RotateMinus90 => -90,
        }
    }

    /// Clockwise quarter turns (0-3).
    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::Identity => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::RotateMinus90 => 3,
        }
    }

    /// Rotation by `turns` clockwise quarter turns, modulo 4.
    pub fn from_quarter_turns(turns: u8) -> Self {
        Self::ALL[(turns & 3) as usize]
    }

    /// Create from an EXIF orientation tag. Only the rotation-only tags
    /// (1, 3, 6, 8) are accepted.
    pub fn from_exif(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Identity),
            6 => Some(Self::Rotate90),
            3 => Some(Self::Rotate180),
            8 => Some(Self::RotateMinus90),
            _ => None,
        }
    }

    /// EXIF orientation tag describing this rotation.
    pub fn to_exif(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Rotate90 => 6,
            Self::Rotate180 => 3,
            Self::RotateMinus90 => 8,
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::Identity
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Apply `self` first, then `other`.
    pub fn compose(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// `self.compose(self.inverse()) == Identity`.
    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Dimensions of a `w × h` image after rotation.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Map a pixel in the rotated (display) image back to the source image.
    ///
    /// `source_w × source_h` are the pre-rotation dimensions; `(x, y)` must lie
    /// inside the rotated image.
    pub fn source_point(self, x: u32, y: u32, source_w: u32, source_h: u32) -> (u32, u32) {
        match self {
            Self::Identity => (x, y),
            Self::Rotate90 => (y, source_h - 1 - x),
            Self::Rotate180 => (source_w - 1 - x, source_h - 1 - y),
            Self::RotateMinus90 => (source_w - 1 - y, x),
        }
    }

    /// Rotate a row-major `width × height` pixel buffer.
    ///
    /// Returns `None` when `pixels.len() != width * height`.
    #[cfg(feature = "alloc")]
    pub fn rotate_pixels<T: Copy>(
        self,
        pixels: &[T],
        width: u32,
        height: u32,
    ) -> Option<alloc::vec::Vec<T>> {
        let (w, h) = (width as usize, height as usize);
        if w.checked_mul(h)? != pixels.len() {
            return None;
        }
        let out = self.transform_dimensions(width, height);
        let mut rotated = alloc::vec::Vec::with_capacity(pixels.len());
        for dy in 0..out.height {
            for dx in 0..out.width {
                let (sx, sy) = self.source_point(dx, dy, width, height);
                rotated.push(pixels[sy as usize * w + sx as usize]);
            }
        }
        Some(rotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Roll buckets ────────────────────────────────────────────────────

    #[test]
    fn bucket_edges() {
        use RotationDecision::*;
        let cases = [
            (-180, RotateMinus90),
            (-136, RotateMinus90),
            (-135, RotateMinus90),
            (-134, Identity),
            (-90, Identity),
            (-45, Identity),
            (-44, Rotate90),
            (0, Rotate90),
            (1, Rotate90),
            (45, Rotate90),
            (46, Rotate180),
            (135, Rotate180),
            (136, RotateMinus90),
            (180, RotateMinus90),
        ];
        for (deg, expected) in cases {
            assert_eq!(
                RotationDecision::from_roll_degrees(deg),
                expected,
                "roll {deg}°"
            );
        }
    }

    #[test]
    fn buckets_cover_full_circle_once() {
        // Each integer in [-180, 180] matches exactly one of the four
        // half-open intervals.
        for d in -180..=180 {
            let in_90 = (d > -45 && d <= 0) || (d > 0 && d <= 45);
            let in_180 = d > 45 && d <= 135;
            let in_m90 = (d > 135 && d <= 180) || (d >= -180 && d <= -135);
            let in_0 = d > -135 && d <= -45;
            let hits = [in_90, in_180, in_m90, in_0].iter().filter(|&&b| b).count();
            assert_eq!(hits, 1, "roll {d}° hit {hits} buckets");

            let expected = if in_90 {
                RotationDecision::Rotate90
            } else if in_180 {
                RotationDecision::Rotate180
            } else if in_m90 {
                RotationDecision::RotateMinus90
            } else {
                RotationDecision::Identity
            };
            assert_eq!(RotationDecision::from_roll_degrees(d), expected, "roll {d}°");
        }
    }

    #[test]
    fn out_of_range_wraps() {
        assert_eq!(
            RotationDecision::from_roll_degrees(-181),
            RotationDecision::from_roll_degrees(179)
        );
        assert_eq!(
            RotationDecision::from_roll_degrees(370),
            RotationDecision::from_roll_degrees(10)
        );
        assert_eq!(
            RotationDecision::from_roll_degrees(i32::MIN),
            RotationDecision::from_roll_degrees(i32::MIN.rem_euclid(360) - 360)
        );
    }

    #[test]
    fn radians_are_floored() {
        use core::f32::consts::PI;
        assert_eq!(
            RotationDecision::from_roll_radians(10f32.to_radians()),
            Some(RotationDecision::Rotate90)
        );
        assert_eq!(
            RotationDecision::from_roll_radians(-170f32.to_radians()),
            Some(RotationDecision::RotateMinus90)
        );
        assert_eq!(
            RotationDecision::from_roll_radians(0.0),
            Some(RotationDecision::Rotate90)
        );
        // -0.5° floors to -1°, still inside (-45, 0].
        assert_eq!(
            RotationDecision::from_roll_radians(-0.5f32.to_radians()),
            Some(RotationDecision::Rotate90)
        );
        // 45.5° floors to 45, the closed end of the 90° bucket.
        assert_eq!(
            RotationDecision::from_roll_radians(45.5f32.to_radians()),
            Some(RotationDecision::Rotate90)
        );
        // Just past -π floors below -180 and wraps.
        assert_eq!(
            RotationDecision::from_roll_radians(-PI),
            Some(RotationDecision::RotateMinus90)
        );
    }

    #[test]
    fn non_finite_roll_has_no_decision() {
        assert_eq!(RotationDecision::from_roll_radians(f32::NAN), None);
        assert_eq!(RotationDecision::from_roll_radians(f32::INFINITY), None);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(RotationDecision::default(), RotationDecision::Identity);
        assert_eq!(RotationDecision::default().degrees(), 0);
    }

    // ── Group laws ──────────────────────────────────────────────────────

    #[test]
    fn degrees_and_turns() {
        let degrees: [i32; 4] = RotationDecision::ALL.map(RotationDecision::degrees);
        assert_eq!(degrees, [0, 90, 180, -90]);
        for (i, r) in RotationDecision::ALL.iter().enumerate() {
            assert_eq!(r.quarter_turns() as usize, i);
            assert_eq!(RotationDecision::from_quarter_turns(i as u8 + 4), *r);
        }
    }

    #[test]
    fn exif_round_trip() {
        for r in RotationDecision::ALL {
            assert_eq!(RotationDecision::from_exif(r.to_exif()), Some(r));
        }
        for v in [0, 2, 4, 5, 7, 9] {
            assert_eq!(RotationDecision::from_exif(v), None, "EXIF {v}");
        }
    }

    #[test]
    fn composition_table() {
        for a in RotationDecision::ALL {
            for b in RotationDecision::ALL {
                let expected = (a.degrees() + b.degrees()).rem_euclid(360);
                let got = a.compose(b).degrees().rem_euclid(360);
                assert_eq!(got, expected, "{a:?}.compose({b:?})");
            }
        }
    }

    #[test]
    fn inverse_all() {
        for r in RotationDecision::ALL {
            assert_eq!(r.compose(r.inverse()), RotationDecision::Identity);
            assert_eq!(r.inverse().compose(r), RotationDecision::Identity);
        }
    }

    #[test]
    fn associativity() {
        let all = RotationDecision::ALL;
        for &a in &all {
            for &b in &all {
                for &c in &all {
                    assert_eq!(a.compose(b).compose(c), a.compose(b.compose(c)));
                }
            }
        }
    }

    #[test]
    fn swaps_axes() {
        assert!(!RotationDecision::Identity.swaps_axes());
        assert!(RotationDecision::Rotate90.swaps_axes());
        assert!(!RotationDecision::Rotate180.swaps_axes());
        assert!(RotationDecision::RotateMinus90.swaps_axes());
    }

    #[test]
    fn transform_dimensions() {
        assert_eq!(
            RotationDecision::Identity.transform_dimensions(640, 480),
            Size::new(640, 480)
        );
        assert_eq!(
            RotationDecision::Rotate90.transform_dimensions(640, 480),
            Size::new(480, 640)
        );
        assert_eq!(
            RotationDecision::Rotate180.transform_dimensions(640, 480),
            Size::new(640, 480)
        );
        assert_eq!(
            RotationDecision::RotateMinus90.transform_dimensions(640, 480),
            Size::new(480, 640)
        );
    }

    // ── Pixel mapping ───────────────────────────────────────────────────

    /// Forward-map a source pixel to its position after a clockwise rotation.
    fn forward_map_point(r: RotationDecision, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match r {
            RotationDecision::Identity => (x, y),
            RotationDecision::Rotate90 => (h - 1 - y, x),
            RotationDecision::Rotate180 => (w - 1 - x, h - 1 - y),
            RotationDecision::RotateMinus90 => (y, w - 1 - x),
        }
    }

    #[test]
    fn source_point_brute_force_4x3() {
        let (sw, sh) = (4u32, 3u32);
        for r in RotationDecision::ALL {
            let d = r.transform_dimensions(sw, sh);
            for sx in 0..sw {
                for sy in 0..sh {
                    let (dx, dy) = forward_map_point(r, sx, sy, sw, sh);
                    assert!(dx < d.width && dy < d.height, "{r:?} ({sx},{sy})");
                    assert_eq!(r.source_point(dx, dy, sw, sh), (sx, sy), "{r:?}");
                }
            }
        }
    }

    #[test]
    #[cfg(feature = "std")]
    fn rotate90_moves_top_left_to_top_right() {
        // 2×1 source "ab" rotated clockwise becomes a 1×2 column "a/b".
        let rotated = RotationDecision::Rotate90
            .rotate_pixels(&['a', 'b'], 2, 1)
            .unwrap();
        assert_eq!(rotated, ['a', 'b']);

        // 2×2: a b / c d → c a / d b
        let rotated = RotationDecision::Rotate90
            .rotate_pixels(&['a', 'b', 'c', 'd'], 2, 2)
            .unwrap();
        assert_eq!(rotated, ['c', 'a', 'd', 'b']);
    }

    #[test]
    #[cfg(feature = "std")]
    fn rotate_pixels_round_trip() {
        let pixels: Vec<u32> = (0..12).collect();
        for r in RotationDecision::ALL {
            let d = r.transform_dimensions(4, 3);
            let rotated = r.rotate_pixels(&pixels, 4, 3).unwrap();
            let back = r.inverse().rotate_pixels(&rotated, d.width, d.height).unwrap();
            assert_eq!(back, pixels, "{r:?}");
        }
    }

    #[test]
    #[cfg(feature = "std")]
    fn rotate_pixels_length_mismatch() {
        assert_eq!(RotationDecision::Rotate180.rotate_pixels(&[0u8; 5], 2, 3), None);
    }
}
