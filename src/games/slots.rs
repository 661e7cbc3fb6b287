//! Slot-machine engine.
//!
//! A spin fills the reel grid cell by cell from the template's symbol
//! weights, then settles each active payline on its own: wilds resolve
//! to the most frequent other symbol on the line, the leftmost run is
//! measured from the first reel, and the paytable pays exact run
//! lengths only. Line wins stack into one total.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::slots::{Payline, SlotTemplate};
use crate::catalog::Catalog;
use crate::credits::Credits;
use crate::error::{Error, Result};
use crate::result::{GameResult, Outcome, PrizeAward};
use crate::sampler::draw_weighted;

/// One payline that paid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineWin {
    pub payline_id: u32,
    pub payline_name: String,
    /// Symbols the line shows, before wild resolution.
    pub symbols: Vec<String>,
    /// Symbol the run was scored as.
    pub winning_symbol: String,
    pub run_length: u8,
    pub multiplier: u32,
    pub amount: Credits,
}

/// The full outcome of one spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Grid contents, reel-major: `reels[reel][row]` is a symbol id.
    pub reels: Vec<Vec<String>>,
    /// Paylines that were active for this spin.
    pub bet_lines: u32,
    pub line_wins: Vec<LineWin>,
    pub total_win: Credits,
}

/// Spins reels and settles paylines.
#[derive(Debug, Clone)]
pub struct SlotMachineEngine {
    catalog: Arc<Catalog>,
}

impl SlotMachineEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Spin the machine. `bet_lines` selects how many paylines are
    /// active, in template order; `None` plays them all. The play
    /// costs the template cost per active line.
    pub fn spin<R: Rng + ?Sized>(
        &self,
        template_id: &str,
        bet_lines: Option<u32>,
        rng: &mut R,
    ) -> Result<GameResult> {
        let template = self.catalog.slots(template_id)?;
        let max_lines = template.paylines.len() as u32;
        let bet_lines = bet_lines.unwrap_or(max_lines).min(max_lines);

        let reels = generate_reels(template, rng)?;
        let line_wins = evaluate_lines(template, &reels, bet_lines);
        let total_win = line_wins
            .iter()
            .fold(Credits::ZERO, |acc, w| acc.saturating_add(w.amount));

        let cost = template.cost.saturating_mul(bet_lines as i64);
        let prize = if total_win.is_positive() {
            PrizeAward::new("Line Win", total_win)
        } else {
            PrizeAward::none()
        };
        debug!(
            "Slot spin: template={} lines={} wins={} total={}",
            template.id,
            bet_lines,
            line_wins.len(),
            total_win
        );
        let outcome = SpinOutcome {
            reels,
            bet_lines,
            line_wins,
            total_win,
        };
        Ok(GameResult::assemble(
            &template.id,
            &template.name,
            &template.theme,
            cost,
            prize,
            Outcome::Slots(outcome),
        ))
    }
}

/// Fill the grid. Each cell is an independent draw where a symbol's
/// weight is `1 / rarity`, normalized over the symbol set.
fn generate_reels<R: Rng + ?Sized>(
    template: &SlotTemplate,
    rng: &mut R,
) -> Result<Vec<Vec<String>>> {
    let total_weight: f64 = template.symbols.iter().map(|s| 1.0 / s.rarity).sum();
    let mut reels = Vec::with_capacity(template.reels as usize);
    for _ in 0..template.reels {
        let mut column = Vec::with_capacity(template.rows as usize);
        for _ in 0..template.rows {
            let symbol = draw_weighted(rng, &template.symbols, |s| {
                (1.0 / s.rarity) / total_weight
            })
            .ok_or_else(|| {
                Error::CatalogIntegrity(format!("template '{}' has no symbols", template.id))
            })?;
            column.push(symbol.id.clone());
        }
        reels.push(column);
    }
    Ok(reels)
}

fn evaluate_lines(template: &SlotTemplate, reels: &[Vec<String>], bet_lines: u32) -> Vec<LineWin> {
    template
        .paylines
        .iter()
        .take(bet_lines as usize)
        .filter_map(|line| evaluate_line(template, reels, line))
        .collect()
}

/// Settle a single payline, or `None` when it does not pay.
fn evaluate_line(template: &SlotTemplate, reels: &[Vec<String>], line: &Payline) -> Option<LineWin> {
    let symbols: Vec<&str> = line
        .cells
        .iter()
        .filter_map(|&(reel, row)| {
            reels
                .get(reel as usize)
                .and_then(|column| column.get(row as usize))
                .map(|s| s.as_str())
        })
        .collect();
    if symbols.len() != line.cells.len() {
        return None;
    }

    let resolved = resolve_wilds(template.wild.as_deref(), &symbols);
    let leading = *resolved.first()?;
    let run = 1 + resolved[1..]
        .iter()
        .take_while(|s| **s == leading)
        .count();
    if run < 2 {
        return None;
    }

    let rules = template.paytable.get(leading)?;
    let rule = rules.iter().find(|r| r.count as usize == run)?;
    let amount = template.cost.saturating_mul(rule.multiplier as i64);
    Some(LineWin {
        payline_id: line.id,
        payline_name: line.name.clone(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        winning_symbol: leading.to_string(),
        run_length: run as u8,
        multiplier: rule.multiplier,
        amount,
    })
}

/// Substitute wilds with the most frequent non-wild symbol on the
/// line. Frequency ties go to the symbol seen first, left to right. A
/// line of nothing but wilds is scored as the wild itself.
fn resolve_wilds<'a>(wild: Option<&str>, symbols: &[&'a str]) -> Vec<&'a str> {
    let wild = match wild {
        Some(w) => w,
        None => return symbols.to_vec(),
    };
    let mut best: Option<(&str, usize)> = None;
    for (i, &symbol) in symbols.iter().enumerate() {
        if symbol == wild || symbols[..i].contains(&symbol) {
            continue;
        }
        let count = symbols.iter().filter(|s| **s == symbol).count();
        let better = match best {
            Some((_, best_count)) => count > best_count,
            None => true,
        };
        if better {
            best = Some((symbol, count));
        }
    }
    match best {
        Some((stand_in, _)) => symbols
            .iter()
            .map(|&s| if s == wild { stand_in } else { s })
            .collect(),
        // All wilds: score the line as the wild symbol.
        None => symbols.to_vec(),
    }
}
