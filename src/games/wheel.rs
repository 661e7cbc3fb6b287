//! Spinning-wheel engine.
//!
//! The landed segment is drawn from the probability table first; the
//! pointer angle and spin rounds are generated afterwards so the
//! animation matches the draw, never the other way around. Feature
//! effects are rolled per spin and folded into the final credits.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::wheel::{WheelFeatures, WheelSegment};
use crate::catalog::Catalog;
use crate::credits::Credits;
use crate::error::{Error, Result};
use crate::result::{GameResult, Outcome, PrizeAward};
use crate::sampler::draw_weighted;

/// Chance that a special segment pays double.
const DOUBLE_REWARD_CHANCE: f64 = 0.10;
/// Chance that a negative reward is forgiven.
const BANKRUPTCY_PROTECTION_CHANCE: f64 = 0.30;
/// Chance that a special segment picks up a lucky multiplier.
const LUCKY_MULTIPLIER_CHANCE: f64 = 0.05;
/// Multipliers a lucky spin chooses from, uniformly.
const LUCKY_MULTIPLIERS: [i64; 3] = [2, 3, 5];

/// Effects rolled for one spin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpecialEffects {
    #[serde(default)]
    pub double_reward: bool,
    /// The spin earned a free respin.
    #[serde(default)]
    pub bonus_spin: bool,
    #[serde(default)]
    pub bankruptcy_protection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_multiplier: Option<i64>,
}

/// The full outcome of one wheel spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelOutcome {
    pub segment_id: u32,
    pub segment_name: String,
    pub segment_icon: String,
    /// Credits printed on the segment, before effects.
    pub segment_credits: Credits,
    pub is_special: bool,
    /// Where the fixed pointer reads on the stopped wheel, degrees.
    pub pointer_angle: f64,
    pub spin_rounds: u32,
    /// Rotation the animation should cover, degrees.
    pub total_angle: f64,
    #[serde(with = "humantime_serde")]
    pub animation: Duration,
    pub effects: SpecialEffects,
    /// Credits actually paid after effects.
    pub final_credits: Credits,
}

/// Spins wheels and settles segments.
#[derive(Debug, Clone)]
pub struct WheelEngine {
    catalog: Arc<Catalog>,
}

impl WheelEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn spin<R: Rng + ?Sized>(&self, template_id: &str, rng: &mut R) -> Result<GameResult> {
        let template = self.catalog.wheel(template_id)?;
        let segment = draw_weighted(rng, &template.segments, |s| s.probability).ok_or_else(
            || Error::CatalogIntegrity(format!("template '{}' has no segments", template.id)),
        )?;

        let pointer_angle = stop_angle(segment, rng);
        let spin_rounds = rng.gen_range(template.min_spins..=template.max_spins);
        let total_angle = spin_rounds as f64 * 360.0 + pointer_angle;

        let effects = roll_effects(&template.features, segment, rng);
        let final_credits = apply_effects(segment.credits, &effects);
        debug!(
            "Wheel spin: template={} segment={} credits={} final={}",
            template.id, segment.name, segment.credits, final_credits
        );

        let outcome = WheelOutcome {
            segment_id: segment.id,
            segment_name: segment.name.clone(),
            segment_icon: segment.icon.clone(),
            segment_credits: segment.credits,
            is_special: segment.is_special,
            pointer_angle,
            spin_rounds,
            total_angle,
            animation: template.animation,
            effects,
            final_credits,
        };
        // The segment itself is the prize, winning or not.
        let prize = PrizeAward::new(segment.name.clone(), final_credits);
        Ok(GameResult::assemble(
            &template.id,
            &template.name,
            &template.theme,
            template.cost,
            prize,
            Outcome::Wheel(outcome),
        ))
    }

    /// Average net credits per spin, before feature effects.
    pub fn expected_value(&self, template_id: &str) -> Result<f64> {
        let template = self.catalog.wheel(template_id)?;
        let gross: f64 = template
            .segments
            .iter()
            .map(|s| s.credits.amount() as f64 * s.probability)
            .sum();
        Ok(gross - template.cost.amount() as f64)
    }

    /// Aggregate odds of a template, for display next to the wheel.
    pub fn win_statistics(&self, template_id: &str) -> Result<WinStatistics> {
        let template = self.catalog.wheel(template_id)?;
        let winning: Vec<&WheelSegment> = template
            .segments
            .iter()
            .filter(|s| s.credits.is_positive())
            .collect();
        let win_probability: f64 = winning.iter().map(|s| s.probability).sum();
        let lose_probability: f64 = template
            .segments
            .iter()
            .filter(|s| !s.credits.is_positive())
            .map(|s| s.probability)
            .sum();
        let max_win = template
            .segments
            .iter()
            .map(|s| s.credits)
            .max()
            .unwrap_or(Credits::ZERO);
        let min_win = winning
            .iter()
            .map(|s| s.credits)
            .min()
            .unwrap_or(Credits::ZERO);
        Ok(WinStatistics {
            total_segments: template.segments.len(),
            winning_segments: winning.len(),
            losing_segments: template.segments.len() - winning.len(),
            win_probability,
            lose_probability,
            max_win,
            min_win,
            expected_value: self.expected_value(template_id)?,
        })
    }
}

/// Aggregate odds of a wheel template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinStatistics {
    pub total_segments: usize,
    pub winning_segments: usize,
    pub losing_segments: usize,
    pub win_probability: f64,
    pub lose_probability: f64,
    pub max_win: Credits,
    /// Smallest positive payout, zero when nothing pays.
    pub min_win: Credits,
    pub expected_value: f64,
}

/// Pointer reading for a stop inside the segment's arc.
///
/// The stop position is uniform over `[angle_start, angle_end)` on the
/// wheel face; the fixed pointer at the top reads the mirrored angle.
fn stop_angle<R: Rng + ?Sized>(segment: &WheelSegment, rng: &mut R) -> f64 {
    let span = segment.angle_end - segment.angle_start;
    let on_face = segment.angle_start + rng.gen::<f64>() * span;
    (360.0 - on_face) % 360.0
}

fn roll_effects<R: Rng + ?Sized>(
    features: &WheelFeatures,
    segment: &WheelSegment,
    rng: &mut R,
) -> SpecialEffects {
    let mut effects = SpecialEffects::default();
    if features.double_chance && segment.is_special {
        effects.double_reward = rng.gen_bool(DOUBLE_REWARD_CHANCE);
    }
    if features.bonus_spin {
        effects.bonus_spin = segment.is_respin;
    }
    if features.bankruptcy_protection && segment.credits.is_negative() {
        effects.bankruptcy_protection = rng.gen_bool(BANKRUPTCY_PROTECTION_CHANCE);
    }
    if features.lucky_multiplier && segment.is_special && rng.gen_bool(LUCKY_MULTIPLIER_CHANCE) {
        effects.lucky_multiplier = LUCKY_MULTIPLIERS.choose(rng).copied();
    }
    effects
}

/// Fold effects into the payout: doubling first, then the lucky
/// multiplier, then bankruptcy forgiveness on whatever is left.
fn apply_effects(base: Credits, effects: &SpecialEffects) -> Credits {
    let mut credits = base;
    if effects.double_reward {
        credits = credits.saturating_mul(2);
    }
    if let Some(multiplier) = effects.lucky_multiplier {
        credits = credits.saturating_mul(multiplier);
    }
    if effects.bankruptcy_protection && credits.is_negative() {
        credits = credits.clamped_non_negative();
    }
    credits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::build_builtin;
    use crate::catalog::wheel::WheelTemplate;
    use crate::catalog::CatalogBuilder;
    use crate::rng::GameRng;

    fn segment(credits: i64, special: bool, respin: bool) -> WheelSegment {
        WheelSegment {
            id: 0,
            name: "Test".to_string(),
            icon: "o".to_string(),
            credits: Credits::new(credits),
            probability: 1.0,
            color: "#000000".to_string(),
            angle_start: 0.0,
            angle_end: 360.0,
            is_special: special,
            is_respin: respin,
        }
    }

    #[test]
    fn test_effect_composition() {
        let effects = SpecialEffects {
            double_reward: true,
            bonus_spin: false,
            bankruptcy_protection: false,
            lucky_multiplier: Some(3),
        };
        assert_eq!(apply_effects(Credits::new(100), &effects), Credits::new(600));

        let forgiven = SpecialEffects {
            double_reward: false,
            bonus_spin: false,
            bankruptcy_protection: true,
            lucky_multiplier: None,
        };
        assert_eq!(apply_effects(Credits::new(-50), &forgiven), Credits::ZERO);
        // Forgiveness only clamps negatives.
        assert_eq!(apply_effects(Credits::new(50), &forgiven), Credits::new(50));
    }

    #[test]
    fn test_disabled_features_roll_nothing() {
        let features = WheelFeatures::default();
        let mut rng = GameRng::seed_from_u64(1);
        for _ in 0..100 {
            let effects = roll_effects(&features, &segment(-50, true, true), &mut rng);
            assert!(!effects.double_reward);
            assert!(!effects.bonus_spin);
            assert!(!effects.bankruptcy_protection);
            assert!(effects.lucky_multiplier.is_none());
        }
    }

    #[test]
    fn test_bonus_spin_follows_segment_flag() {
        let features = WheelFeatures {
            double_chance: false,
            bonus_spin: true,
            bankruptcy_protection: false,
            lucky_multiplier: false,
        };
        let mut rng = GameRng::seed_from_u64(2);
        let on = roll_effects(&features, &segment(0, false, true), &mut rng);
        assert!(on.bonus_spin);
        let off = roll_effects(&features, &segment(0, false, false), &mut rng);
        assert!(!off.bonus_spin);
    }

    #[test]
    fn test_lucky_multiplier_skips_plain_segments() {
        // The multiplier is reserved for special segments; a wheel made
        // of plain ones never rolls it even with the feature on.
        let template = WheelTemplate {
            id: "plain".to_string(),
            name: "Plain Wheel".to_string(),
            cost: Credits::new(5),
            theme: "test".to_string(),
            segments: vec![segment(30, false, false)],
            animation: Duration::from_secs(1),
            min_spins: 1,
            max_spins: 2,
            features: WheelFeatures {
                double_chance: false,
                bonus_spin: false,
                bankruptcy_protection: false,
                lucky_multiplier: true,
            },
        };
        let catalog = Arc::new(CatalogBuilder::new().wheel(template).build().unwrap());
        let engine = WheelEngine::new(catalog);
        let mut rng = GameRng::seed_from_u64(1);
        for _ in 0..2000 {
            let result = engine.spin("plain", &mut rng).unwrap();
            let outcome = match &result.outcome {
                Outcome::Wheel(outcome) => outcome,
                other => panic!("unexpected outcome {:?}", other),
            };
            assert!(outcome.effects.lucky_multiplier.is_none());
            assert_eq!(outcome.final_credits, Credits::new(30));
        }
    }

    #[test]
    fn test_lucky_multiplier_fires_on_special_segments() {
        let features = WheelFeatures {
            double_chance: false,
            bonus_spin: false,
            bankruptcy_protection: false,
            lucky_multiplier: true,
        };
        let mut rng = GameRng::seed_from_u64(23);
        let mut fired = 0;
        for _ in 0..2000 {
            let effects = roll_effects(&features, &segment(30, true, false), &mut rng);
            if let Some(multiplier) = effects.lucky_multiplier {
                fired += 1;
                assert!(LUCKY_MULTIPLIERS.contains(&multiplier));
            }
        }
        // 5% of 2000 spins, with generous slack either side.
        assert!(
            fired > 40 && fired < 200,
            "lucky multiplier fired {} times in 2000 special spins",
            fired
        );
    }

    #[test]
    fn test_stop_angle_maps_back_into_segment() {
        let seg = WheelSegment {
            angle_start: 54.0,
            angle_end: 108.0,
            ..segment(10, false, false)
        };
        let mut rng = GameRng::seed_from_u64(3);
        for _ in 0..1000 {
            let pointer = stop_angle(&seg, &mut rng);
            assert!((0.0..360.0).contains(&pointer));
            let on_face = (360.0 - pointer) % 360.0;
            assert!(seg.contains(on_face), "pointer {} maps to {}", pointer, on_face);
        }
    }

    #[test]
    fn test_spin_fields_are_consistent() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = WheelEngine::new(catalog.clone());
        let template = catalog.wheel("classic_wheel").unwrap();
        let mut rng = GameRng::seed_from_u64(17);
        for _ in 0..500 {
            let result = engine.spin("classic_wheel", &mut rng).unwrap();
            let outcome = match &result.outcome {
                Outcome::Wheel(outcome) => outcome,
                other => panic!("unexpected outcome {:?}", other),
            };
            assert!((template.min_spins..=template.max_spins).contains(&outcome.spin_rounds));
            let expected_total = outcome.spin_rounds as f64 * 360.0 + outcome.pointer_angle;
            assert!((outcome.total_angle - expected_total).abs() < 1e-9);
            let on_face = (360.0 - outcome.pointer_angle) % 360.0;
            let landed = template.segment_at(on_face).unwrap();
            assert_eq!(landed.id, outcome.segment_id);
            assert_eq!(result.cost, Credits::new(5));
        }
    }

    #[test]
    fn test_expected_value_classic() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = WheelEngine::new(catalog);
        let ev = engine.expected_value("classic_wheel").unwrap();
        assert!((ev - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_win_statistics_classic() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = WheelEngine::new(catalog);
        let stats = engine.win_statistics("classic_wheel").unwrap();
        assert_eq!(stats.total_segments, 7);
        assert_eq!(stats.winning_segments, 4);
        assert_eq!(stats.losing_segments, 3);
        assert!((stats.win_probability - 0.45).abs() < 1e-9);
        assert!((stats.lose_probability - 0.55).abs() < 1e-9);
        assert_eq!(stats.max_win, Credits::new(100));
        assert_eq!(stats.min_win, Credits::new(10));
    }
}
