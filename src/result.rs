//! Uniform play results.
//!
//! Every game hands its family-specific outcome to [`GameResult::assemble`],
//! which wraps it with the fields shared by all plays: identity, cost,
//! the awarded prize and the net credit change. Consumers can settle
//! any game from the shared fields alone and only inspect [`Outcome`]
//! for presentation.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credits::Credits;
use crate::games::scratch::ScratchCard;
use crate::games::slots::SpinOutcome;
use crate::games::wheel::WheelOutcome;

/// Prize name used for losing plays.
pub const NO_WIN: &str = "No Win";

/// The prize a play awarded. Losing plays carry [`PrizeAward::none`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeAward {
    pub name: String,
    pub credits: Credits,
}

impl PrizeAward {
    pub fn new(name: impl Into<String>, credits: Credits) -> Self {
        Self {
            name: name.into(),
            credits,
        }
    }

    /// The zero-credit award of a losing play.
    pub fn none() -> Self {
        Self {
            name: NO_WIN.to_string(),
            credits: Credits::ZERO,
        }
    }
}

/// Family-specific payload of a play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Outcome {
    Scratch(ScratchCard),
    Slots(SpinOutcome),
    Wheel(WheelOutcome),
}

/// One completed play of any game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    /// Unique id of this play.
    pub play_id: Uuid,
    pub template_id: String,
    pub template_name: String,
    pub theme: String,
    /// Credits charged for the play.
    pub cost: Credits,
    pub prize: PrizeAward,
    /// True when the prize pays out more than zero credits.
    pub is_win: bool,
    /// Prize credits minus cost. Negative for losing plays.
    pub net_win: Credits,
    pub outcome: Outcome,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

impl GameResult {
    pub(crate) fn assemble(
        template_id: &str,
        template_name: &str,
        theme: &str,
        cost: Credits,
        prize: PrizeAward,
        outcome: Outcome,
    ) -> Self {
        let is_win = prize.credits.is_positive();
        let net_win = prize.credits.saturating_sub(cost);
        Self {
            play_id: Uuid::new_v4(),
            template_id: template_id.to_string(),
            template_name: template_name.to_string(),
            theme: theme.to_string(),
            cost,
            prize,
            is_win,
            net_win,
            outcome,
            created_at: current_timestamp(),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
