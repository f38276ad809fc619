use super::{InvalidTuning, ensure};
use serde::Deserialize;

/// Geometric thresholds for the per-frame classifiers.
///
/// Distances are in normalized frame units. The extension and strong-fold
/// thresholds are tuned independently so an ambiguous finger can fail both.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// PIP-angle cosine below which a finger reads as extended.
    pub extended_max_cos: f32,

    /// How much farther from the wrist than its MCP a tip must be to read as extended.
    pub extended_distance_margin: f32,

    /// PIP-angle cosine above which a finger reads as strongly folded.
    pub folded_min_cos: f32,

    /// How much closer to the wrist than its MCP a tip must be to read as strongly folded.
    pub folded_distance_margin: f32,

    /// How far below its PIP a tip must sit to read as strongly folded.
    pub folded_vertical_margin: f32,

    /// How far above the IP joint the thumb tip must be for a thumbs-up.
    pub thumb_up_margin: f32,

    /// Maximum horizontal offset between thumb tip and IP joint for a thumbs-up.
    pub thumb_horizontal_tolerance: f32,

    /// Margin for the y-only fold test used by the thumbs-up classifier.
    pub thumb_fold_margin: f32,

    /// Tip-to-palm over MCP-to-palm ratio under which the hand reads as a compact fist.
    pub fist_compactness_ratio: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            extended_max_cos: -0.3,
            extended_distance_margin: 0.02,
            folded_min_cos: 0.0,
            folded_distance_margin: 0.006,
            folded_vertical_margin: 0.004,
            thumb_up_margin: 0.02,
            thumb_horizontal_tolerance: 0.08,
            thumb_fold_margin: 0.02,
            fist_compactness_ratio: 0.88,
        }
    }
}

impl GestureTuning {
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        let fields = [
            ("gesture.extended_max_cos", self.extended_max_cos),
            ("gesture.extended_distance_margin", self.extended_distance_margin),
            ("gesture.folded_min_cos", self.folded_min_cos),
            ("gesture.folded_distance_margin", self.folded_distance_margin),
            ("gesture.folded_vertical_margin", self.folded_vertical_margin),
            ("gesture.thumb_up_margin", self.thumb_up_margin),
            ("gesture.thumb_horizontal_tolerance", self.thumb_horizontal_tolerance),
            ("gesture.thumb_fold_margin", self.thumb_fold_margin),
            ("gesture.fist_compactness_ratio", self.fist_compactness_ratio),
        ];
        for (field, value) in fields {
            ensure(value.is_finite(), field, "must be finite")?;
        }
        ensure(
            (-1.0..=1.0).contains(&self.extended_max_cos),
            "gesture.extended_max_cos",
            "must be a cosine within -1..=1",
        )?;
        ensure(
            (-1.0..=1.0).contains(&self.folded_min_cos),
            "gesture.folded_min_cos",
            "must be a cosine within -1..=1",
        )?;
        ensure(
            self.thumb_horizontal_tolerance >= 0.0,
            "gesture.thumb_horizontal_tolerance",
            "must not be negative",
        )?;
        ensure(
            self.fist_compactness_ratio > 0.0,
            "gesture.fist_compactness_ratio",
            "must be positive",
        )
    }
}
