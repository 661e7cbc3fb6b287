//! Spinning-wheel template definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::validate_probability_sum;
use crate::credits::Credits;
use crate::error::{Error, Result};

/// One wheel segment: a prize tier with its arc on the wheel face.
///
/// `probability` alone decides how often the segment is hit; the angle
/// range only places the pointer for presentation. Arcs are half-open
/// `[angle_start, angle_end)` in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelSegment {
    pub id: u32,
    pub name: String,
    pub icon: String,
    pub credits: Credits,
    pub probability: f64,
    pub color: String,
    pub angle_start: f64,
    pub angle_end: f64,
    #[serde(default)]
    pub is_special: bool,
    /// Landing here grants a free respin instead of credits.
    #[serde(default)]
    pub is_respin: bool,
}

impl WheelSegment {
    pub fn contains(&self, angle: f64) -> bool {
        self.angle_start <= angle && angle < self.angle_end
    }
}

/// Per-template toggles for the special effects rolled after a spin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WheelFeatures {
    /// Special segments may have their reward doubled.
    #[serde(default)]
    pub double_chance: bool,
    /// Respin segments grant a bonus spin.
    #[serde(default)]
    pub bonus_spin: bool,
    /// Negative rewards may be forgiven.
    #[serde(default)]
    pub bankruptcy_protection: bool,
    /// Any reward may pick up a lucky multiplier.
    #[serde(default)]
    pub lucky_multiplier: bool,
}

/// A spinning-wheel game template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelTemplate {
    pub id: String,
    pub name: String,
    pub cost: Credits,
    pub theme: String,
    pub segments: Vec<WheelSegment>,
    /// Suggested spin animation length for clients.
    #[serde(with = "humantime_serde")]
    pub animation: Duration,
    pub min_spins: u32,
    pub max_spins: u32,
    #[serde(default)]
    pub features: WheelFeatures,
}

impl WheelTemplate {
    pub fn segment(&self, id: u32) -> Option<&WheelSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// The segment whose arc covers `wheel_angle` (degrees on the
    /// wheel face, not the pointer reading).
    pub fn segment_at(&self, wheel_angle: f64) -> Option<&WheelSegment> {
        self.segments.iter().find(|s| s.contains(wheel_angle))
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has no segments",
                self.id
            )));
        }
        let probabilities: Vec<f64> = self.segments.iter().map(|s| s.probability).collect();
        validate_probability_sum(&self.id, &probabilities)?;

        let mut seen = Vec::new();
        for segment in &self.segments {
            if seen.contains(&segment.id) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' has duplicate segment id {}",
                    self.id, segment.id
                )));
            }
            seen.push(segment.id);
            let valid_arc = segment.angle_start.is_finite()
                && segment.angle_end.is_finite()
                && segment.angle_start >= 0.0
                && segment.angle_start < segment.angle_end
                && segment.angle_end <= 360.0;
            if !valid_arc {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' segment {} has invalid arc [{}, {})",
                    self.id, segment.id, segment.angle_start, segment.angle_end
                )));
            }
        }

        // Arcs must not overlap anywhere on the face.
        let mut arcs: Vec<(f64, f64)> = self
            .segments
            .iter()
            .map(|s| (s.angle_start, s.angle_end))
            .collect();
        arcs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in arcs.windows(2) {
            if pair[1].0 < pair[0].1 {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' segment arcs overlap at {} degrees",
                    self.id, pair[1].0
                )));
            }
        }

        if self.min_spins == 0 || self.min_spins > self.max_spins {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has invalid spin range {}..={}",
                self.id, self.min_spins, self.max_spins
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u32, probability: f64, start: f64, end: f64) -> WheelSegment {
        WheelSegment {
            id,
            name: format!("Segment {}", id),
            icon: "o".to_string(),
            credits: Credits::new(10),
            probability,
            color: "#123456".to_string(),
            angle_start: start,
            angle_end: end,
            is_special: false,
            is_respin: false,
        }
    }

    fn template(segments: Vec<WheelSegment>) -> WheelTemplate {
        WheelTemplate {
            id: "test".to_string(),
            name: "Test".to_string(),
            cost: Credits::new(5),
            theme: "test".to_string(),
            segments,
            animation: Duration::from_secs(3),
            min_spins: 3,
            max_spins: 5,
            features: WheelFeatures::default(),
        }
    }

    #[test]
    fn test_valid_wheel() {
        let t = template(vec![segment(0, 0.5, 0.0, 180.0), segment(1, 0.5, 180.0, 360.0)]);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_overlapping_arcs() {
        let t = template(vec![segment(0, 0.5, 0.0, 200.0), segment(1, 0.5, 180.0, 360.0)]);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_arc_bounds() {
        let t = template(vec![segment(0, 0.5, 0.0, 180.0), segment(1, 0.5, 180.0, 400.0)]);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_spin_range() {
        let mut t = template(vec![segment(0, 0.5, 0.0, 180.0), segment(1, 0.5, 180.0, 360.0)]);
        t.min_spins = 6;
        assert!(t.validate().is_err());
        t.min_spins = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_segment_at_boundary() {
        let t = template(vec![segment(0, 0.5, 0.0, 180.0), segment(1, 0.5, 180.0, 360.0)]);
        // Half-open arcs: the boundary belongs to the later segment.
        assert_eq!(t.segment_at(180.0).map(|s| s.id), Some(1));
        assert_eq!(t.segment_at(179.999).map(|s| s.id), Some(0));
        assert!(t.segment_at(360.0).is_none());
    }
}
