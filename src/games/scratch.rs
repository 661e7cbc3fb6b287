//! Scratch-card engine.
//!
//! Card generation draws one prize tier from the template's weighted
//! table, then lays cells out so the card physically shows that
//! outcome. Evaluation never re-rolls anything: it reads the finished
//! layout (winning flags plus cell content) back into a prize, so a
//! card re-evaluated later always settles the same way.

use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::scratch::{ScratchKind, ScratchPrize, ScratchTemplate};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::result::{GameResult, Outcome, PrizeAward};
use crate::sampler::draw_weighted;

/// One scratchable cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchCell {
    pub id: u32,
    pub content: String,
    pub revealed: bool,
    /// Part of the winning layout, not just matching content.
    pub winning: bool,
}

/// A generated card. Cells are laid out row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchCard {
    pub template_id: String,
    pub kind: ScratchKind,
    pub rows: u8,
    pub cols: u8,
    pub cells: Vec<ScratchCell>,
}

impl ScratchCard {
    /// Reveal one cell. Rejects out-of-range ids and cells that are
    /// already revealed; a rejected call leaves the card untouched.
    pub fn scratch(&mut self, cell_id: usize) -> Result<&ScratchCell> {
        let cell_count = self.cells.len();
        let cell = self.cells.get_mut(cell_id).ok_or_else(|| {
            Error::InvalidCellState(format!(
                "cell {} out of range (card has {} cells)",
                cell_id, cell_count
            ))
        })?;
        if cell.revealed {
            return Err(Error::InvalidCellState(format!(
                "cell {} already revealed",
                cell_id
            )));
        }
        cell.revealed = true;
        Ok(&*cell)
    }

    pub fn cell(&self, cell_id: usize) -> Option<&ScratchCell> {
        self.cells.get(cell_id)
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.revealed).count()
    }

    pub fn fully_revealed(&self) -> bool {
        self.cells.iter().all(|c| c.revealed)
    }

    pub fn winning_cells(&self) -> impl Iterator<Item = &ScratchCell> {
        self.cells.iter().filter(|c| c.winning)
    }
}

/// Generates and settles scratch cards.
#[derive(Debug, Clone)]
pub struct ScratchCardEngine {
    catalog: Arc<Catalog>,
}

impl ScratchCardEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Generate a card for the template and settle it in one step.
    pub fn create_card<R: Rng + ?Sized>(
        &self,
        template_id: &str,
        rng: &mut R,
    ) -> Result<GameResult> {
        let template = self.catalog.scratch(template_id)?;
        let cells = match template.kind {
            ScratchKind::DirectPrize => generate_direct(template, rng)?,
            ScratchKind::SymbolMatch => generate_symbol_match(template, rng)?,
            ScratchKind::LuckySymbol => generate_lucky(template, rng)?,
        };
        let card = ScratchCard {
            template_id: template.id.clone(),
            kind: template.kind,
            rows: template.rows,
            cols: template.cols,
            cells,
        };
        let prize = evaluate_card(template, &card);
        debug!(
            "Scratch card created: template={} prize={} ({})",
            template.id, prize.name, prize.credits
        );
        Ok(GameResult::assemble(
            &template.id,
            &template.name,
            &template.theme,
            template.cost,
            prize,
            Outcome::Scratch(card),
        ))
    }

    /// Settle a card from its layout alone.
    pub fn evaluate(&self, card: &ScratchCard) -> Result<PrizeAward> {
        let template = self.catalog.scratch(&card.template_id)?;
        Ok(evaluate_card(template, card))
    }
}

fn cell(id: usize, content: &str, winning: bool) -> ScratchCell {
    ScratchCell {
        id: id as u32,
        content: content.to_string(),
        revealed: false,
        winning,
    }
}

fn draw_prize<'a, R: Rng + ?Sized>(
    template: &'a ScratchTemplate,
    rng: &mut R,
) -> Result<&'a ScratchPrize> {
    draw_weighted(rng, &template.prizes, |p| p.probability).ok_or_else(|| {
        Error::CatalogIntegrity(format!("template '{}' has an empty prize table", template.id))
    })
}

/// Direct-prize layout: one cell carries the prize text, the rest the
/// filler. A zero-credit draw leaves every cell on the filler.
fn generate_direct<R: Rng + ?Sized>(
    template: &ScratchTemplate,
    rng: &mut R,
) -> Result<Vec<ScratchCell>> {
    let prize = draw_prize(template, rng)?;
    let count = template.area_count();
    let mut cells: Vec<ScratchCell> = (0..count).map(|i| cell(i, &template.filler, false)).collect();
    if prize.is_winning() {
        let target = rng.gen_range(0..count);
        let display = prize.display.clone().unwrap_or_else(|| prize.name.clone());
        cells[target] = cell(target, &display, true);
    }
    Ok(cells)
}

/// Symbol-match layout: a winning card carries exactly three copies of
/// the winning symbol at sampled positions; a losing card is filled
/// uniformly and then repaired so no symbol appears three times.
fn generate_symbol_match<R: Rng + ?Sized>(
    template: &ScratchTemplate,
    rng: &mut R,
) -> Result<Vec<ScratchCell>> {
    let prize = draw_prize(template, rng)?;
    let count = template.area_count();

    let winning_symbol = match prize.symbol.as_deref() {
        Some(symbol) if prize.is_winning() => symbol,
        _ => {
            let mut contents = Vec::with_capacity(count);
            for _ in 0..count {
                let symbol = template.symbols.choose(rng).ok_or_else(|| {
                    Error::CatalogIntegrity(format!(
                        "template '{}' has an empty symbol pool",
                        template.id
                    ))
                })?;
                contents.push(symbol.clone());
            }
            repair_trios(template, &mut contents, rng)?;
            return Ok(contents
                .iter()
                .enumerate()
                .map(|(i, c)| cell(i, c, false))
                .collect());
        }
    };

    let winning_positions = rand::seq::index::sample(rng, count, 3).into_vec();
    let others: Vec<&str> = template
        .symbols
        .iter()
        .map(|s| s.as_str())
        .filter(|s| *s != winning_symbol)
        .collect();
    let mut cells = Vec::with_capacity(count);
    for i in 0..count {
        if winning_positions.contains(&i) {
            cells.push(cell(i, winning_symbol, true));
        } else {
            let content = others.choose(rng).copied().ok_or_else(|| {
                Error::CatalogIntegrity(format!(
                    "template '{}' has no filler symbols besides '{}'",
                    template.id, winning_symbol
                ))
            })?;
            cells.push(cell(i, content, false));
        }
    }
    Ok(cells)
}

/// Lucky-symbol layout: a winning card hides the lucky symbol in one
/// cell; everything else comes from the normal pool.
fn generate_lucky<R: Rng + ?Sized>(
    template: &ScratchTemplate,
    rng: &mut R,
) -> Result<Vec<ScratchCell>> {
    let prize = draw_prize(template, rng)?;
    let lucky = template.lucky_symbol.as_deref().ok_or_else(|| {
        Error::CatalogIntegrity(format!("template '{}' has no lucky symbol", template.id))
    })?;
    let count = template.area_count();
    let target = if prize.is_winning() {
        Some(rng.gen_range(0..count))
    } else {
        None
    };
    let mut cells = Vec::with_capacity(count);
    for i in 0..count {
        if target == Some(i) {
            cells.push(cell(i, lucky, true));
        } else {
            let normal = template.symbols.choose(rng).ok_or_else(|| {
                Error::CatalogIntegrity(format!(
                    "template '{}' has an empty symbol pool",
                    template.id
                ))
            })?;
            cells.push(cell(i, normal, false));
        }
    }
    Ok(cells)
}

/// Break up every three-of-a-kind on a losing card.
///
/// For each symbol appearing three or more times, two occurrences
/// survive (chosen uniformly) and the rest are replaced. Replacements
/// are drawn only among symbols currently at one occurrence or fewer,
/// so a replacement can never mint a new trio. Template validation
/// keeps the pool large enough that such a symbol always exists.
fn repair_trios<R: Rng + ?Sized>(
    template: &ScratchTemplate,
    contents: &mut [String],
    rng: &mut R,
) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for content in contents.iter() {
        *counts.entry(content.as_str()).or_insert(0) += 1;
    }
    let overfull: Vec<String> = template
        .symbols
        .iter()
        .filter(|s| counts.get(s.as_str()).copied().unwrap_or(0) >= 3)
        .cloned()
        .collect();
    drop(counts);

    for symbol in overfull {
        let positions: Vec<usize> = contents
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == symbol)
            .map(|(i, _)| i)
            .collect();
        if positions.len() <= 2 {
            continue;
        }
        let excess = positions.len() - 2;
        let replaced = rand::seq::index::sample(rng, positions.len(), excess);
        for idx in replaced.iter() {
            let candidates: Vec<&str> = template
                .symbols
                .iter()
                .map(|s| s.as_str())
                .filter(|s| occurrences(contents, s) <= 1)
                .collect();
            let replacement = candidates.choose(rng).copied().ok_or_else(|| {
                Error::CatalogIntegrity(format!(
                    "template '{}' symbol pool too small to repair the card",
                    template.id
                ))
            })?;
            contents[positions[idx]] = replacement.to_string();
        }
    }
    Ok(())
}

fn occurrences(contents: &[String], symbol: &str) -> usize {
    contents.iter().filter(|c| c.as_str() == symbol).count()
}

/// Read the prize back out of a finished layout.
fn evaluate_card(template: &ScratchTemplate, card: &ScratchCard) -> PrizeAward {
    let first_winner = match card.winning_cells().next() {
        Some(cell) => cell,
        None => return PrizeAward::none(),
    };
    let prize = match template.kind {
        ScratchKind::DirectPrize => template
            .prizes
            .iter()
            .find(|p| p.display.as_deref() == Some(first_winner.content.as_str())),
        ScratchKind::SymbolMatch => template
            .prizes
            .iter()
            .find(|p| p.symbol.as_deref() == Some(first_winner.content.as_str())),
        ScratchKind::LuckySymbol => template.prizes.iter().find(|p| p.is_winning()),
    };
    match prize {
        Some(p) => PrizeAward::new(p.name.clone(), p.credits),
        None => PrizeAward::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::build_builtin;
    use crate::catalog::scratch::ScratchPrize;
    use crate::credits::Credits;
    use crate::rng::GameRng;

    fn symbol_template() -> ScratchTemplate {
        ScratchTemplate {
            id: "match".to_string(),
            name: "Match".to_string(),
            kind: ScratchKind::SymbolMatch,
            cost: Credits::new(10),
            theme: "test".to_string(),
            rows: 3,
            cols: 3,
            filler: String::new(),
            symbols: ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect(),
            lucky_symbol: None,
            prizes: vec![
                ScratchPrize {
                    name: "Triple A".to_string(),
                    credits: Credits::new(100),
                    probability: 0.05,
                    display: None,
                    symbol: Some("a".to_string()),
                },
                ScratchPrize {
                    name: "No Win".to_string(),
                    credits: Credits::ZERO,
                    probability: 0.95,
                    display: None,
                    symbol: None,
                },
            ],
        }
    }

    #[test]
    fn test_repair_breaks_a_forced_trio() {
        let template = symbol_template();
        let mut rng = GameRng::seed_from_u64(11);
        let mut contents: Vec<String> = ["a", "a", "a", "a", "b", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        repair_trios(&template, &mut contents, &mut rng).unwrap();
        for symbol in &template.symbols {
            assert!(occurrences(&contents, symbol) <= 2, "trio of '{}' survived", symbol);
        }
        assert_eq!(occurrences(&contents, "a"), 2);
    }

    #[test]
    fn test_scratch_out_of_range() {
        let mut card = ScratchCard {
            template_id: "t".to_string(),
            kind: ScratchKind::DirectPrize,
            rows: 1,
            cols: 2,
            cells: vec![cell(0, "x", false), cell(1, "y", false)],
        };
        let err = card.scratch(5).unwrap_err();
        assert!(matches!(err, Error::InvalidCellState(_)));
        assert_eq!(card.revealed_count(), 0);
    }

    #[test]
    fn test_scratch_twice_rejected() {
        let mut card = ScratchCard {
            template_id: "t".to_string(),
            kind: ScratchKind::DirectPrize,
            rows: 1,
            cols: 2,
            cells: vec![cell(0, "x", false), cell(1, "y", false)],
        };
        assert_eq!(card.scratch(0).unwrap().content, "x");
        let err = card.scratch(0).unwrap_err();
        assert!(matches!(err, Error::InvalidCellState(_)));
        // The rejected call must not flip anything else.
        assert_eq!(card.revealed_count(), 1);
        assert!(!card.fully_revealed());
    }

    #[test]
    fn test_direct_card_layout() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = ScratchCardEngine::new(catalog);
        let mut rng = GameRng::seed_from_u64(42);
        for _ in 0..200 {
            let result = engine.create_card("golden_ticket", &mut rng).unwrap();
            let card = match &result.outcome {
                Outcome::Scratch(card) => card,
                other => panic!("unexpected outcome {:?}", other),
            };
            assert_eq!(card.cells.len(), 30);
            let winners: Vec<_> = card.winning_cells().collect();
            if result.is_win {
                assert_eq!(winners.len(), 1);
                assert!(winners[0].content.starts_with("WIN "));
            } else {
                assert!(winners.is_empty());
                assert!(card.cells.iter().all(|c| c.content == "TRY AGAIN"));
            }
        }
    }

    #[test]
    fn test_symbol_match_winning_card_has_three_marks() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = ScratchCardEngine::new(catalog);
        let mut rng = GameRng::seed_from_u64(7);
        let mut saw_win = false;
        for _ in 0..2000 {
            let result = engine.create_card("new_year", &mut rng).unwrap();
            let card = match &result.outcome {
                Outcome::Scratch(card) => card,
                other => panic!("unexpected outcome {:?}", other),
            };
            if result.is_win {
                saw_win = true;
                let winners: Vec<_> = card.winning_cells().collect();
                assert_eq!(winners.len(), 3);
                let symbol = &winners[0].content;
                assert!(winners.iter().all(|c| &c.content == symbol));
            } else {
                let contents: Vec<String> = card.cells.iter().map(|c| c.content.clone()).collect();
                for symbol in ["🧧", "🎆", "🎊", "🍊", "🎁", "💰", "🐉", "🏮"] {
                    assert!(occurrences(&contents, symbol) <= 2);
                }
            }
        }
        assert!(saw_win, "no winning card in 2000 draws");
    }

    #[test]
    fn test_evaluation_reads_layout_only() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = ScratchCardEngine::new(catalog.clone());
        let template = catalog.scratch("new_year").unwrap();
        let mut cells: Vec<ScratchCell> = (0..9).map(|i| cell(i, "🏮", false)).collect();
        for i in [1, 4, 7] {
            cells[i] = cell(i, "🐉", true);
        }
        let card = ScratchCard {
            template_id: template.id.clone(),
            kind: template.kind,
            rows: 3,
            cols: 3,
            cells,
        };
        let prize = engine.evaluate(&card).unwrap();
        assert_eq!(prize.name, "Dragon Jackpot");
        assert_eq!(prize.credits, Credits::new(2000));
    }

    #[test]
    fn test_lucky_card() {
        let catalog = Arc::new(build_builtin().unwrap());
        let engine = ScratchCardEngine::new(catalog);
        let mut rng = GameRng::seed_from_u64(3);
        for _ in 0..500 {
            let result = engine.create_card("lucky_star", &mut rng).unwrap();
            let card = match &result.outcome {
                Outcome::Scratch(card) => card,
                other => panic!("unexpected outcome {:?}", other),
            };
            let stars = card.cells.iter().filter(|c| c.content == "⭐").count();
            if result.is_win {
                assert_eq!(stars, 1);
                assert_eq!(result.prize.credits, Credits::new(5000));
            } else {
                assert_eq!(stars, 0);
            }
        }
    }
}
