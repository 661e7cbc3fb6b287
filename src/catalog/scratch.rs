//! Scratch-card template definitions.

use serde::{Deserialize, Serialize};

use crate::catalog::validate_probability_sum;
use crate::credits::Credits;
use crate::error::{Error, Result};

/// How a scratch card decides wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScratchKind {
    /// One drawn prize tier; a winning card carries the prize text in a
    /// single cell, every other cell shows the filler.
    DirectPrize,
    /// Cells carry symbols; three matching symbols win the tier keyed
    /// by that symbol.
    SymbolMatch,
    /// One designated lucky symbol anywhere on the card wins the single
    /// prize tier.
    LuckySymbol,
}

/// One prize tier of a scratch template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchPrize {
    pub name: String,
    pub credits: Credits,
    pub probability: f64,
    /// Cell text for a winning direct-prize card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Winning symbol for a symbol-match tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ScratchPrize {
    pub fn is_winning(&self) -> bool {
        self.credits.is_positive()
    }
}

/// A scratch-card game template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchTemplate {
    pub id: String,
    pub name: String,
    pub kind: ScratchKind,
    pub cost: Credits,
    pub theme: String,
    pub rows: u8,
    pub cols: u8,
    /// Text for non-winning cells on direct-prize cards.
    #[serde(default)]
    pub filler: String,
    /// Symbol pool for symbol-match and lucky-symbol cards.
    #[serde(default)]
    pub symbols: Vec<String>,
    /// The winning symbol of a lucky-symbol card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_symbol: Option<String>,
    pub prizes: Vec<ScratchPrize>,
}

impl ScratchTemplate {
    /// Number of scratchable cells on the card.
    pub fn area_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has an empty grid ({}x{})",
                self.id, self.rows, self.cols
            )));
        }
        if self.prizes.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has no prize tiers",
                self.id
            )));
        }
        let probabilities: Vec<f64> = self.prizes.iter().map(|p| p.probability).collect();
        validate_probability_sum(&self.id, &probabilities)?;

        match self.kind {
            ScratchKind::DirectPrize => self.validate_direct_prize(),
            ScratchKind::SymbolMatch => self.validate_symbol_match(),
            ScratchKind::LuckySymbol => self.validate_lucky_symbol(),
        }
    }

    fn validate_direct_prize(&self) -> Result<()> {
        if self.filler.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "direct-prize template '{}' needs filler text",
                self.id
            )));
        }
        let mut displays = Vec::new();
        for prize in self.prizes.iter().filter(|p| p.is_winning()) {
            let display = prize.display.as_deref().ok_or_else(|| {
                Error::CatalogIntegrity(format!(
                    "direct-prize template '{}' tier '{}' has no display text",
                    self.id, prize.name
                ))
            })?;
            if display == self.filler {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' tier '{}' display collides with the filler",
                    self.id, prize.name
                )));
            }
            if displays.contains(&display) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' has duplicate display text '{}'",
                    self.id, display
                )));
            }
            displays.push(display);
        }
        Ok(())
    }

    fn validate_symbol_match(&self) -> Result<()> {
        if self.area_count() < 3 {
            return Err(Error::CatalogIntegrity(format!(
                "symbol-match template '{}' needs at least 3 cells",
                self.id
            )));
        }
        if self.symbols.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "symbol-match template '{}' has no symbol pool",
                self.id
            )));
        }
        // The repair pass replaces surplus copies with symbols that
        // appear at most once. With fewer than area_count cells spread
        // over 2 copies per symbol such a target could run out.
        if 2 * self.symbols.len() < self.area_count() {
            return Err(Error::CatalogIntegrity(format!(
                "symbol-match template '{}' needs at least {} symbols for a {}-cell grid",
                self.id,
                self.area_count().div_ceil(2),
                self.area_count()
            )));
        }
        let mut winning_symbols = Vec::new();
        for prize in self.prizes.iter().filter(|p| p.is_winning()) {
            let symbol = prize.symbol.as_deref().ok_or_else(|| {
                Error::CatalogIntegrity(format!(
                    "symbol-match template '{}' tier '{}' has no symbol",
                    self.id, prize.name
                ))
            })?;
            if !self.symbols.iter().any(|s| s == symbol) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' tier '{}' uses unknown symbol '{}'",
                    self.id, prize.name, symbol
                )));
            }
            if winning_symbols.contains(&symbol) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' maps symbol '{}' to more than one tier",
                    self.id, symbol
                )));
            }
            winning_symbols.push(symbol);
        }
        Ok(())
    }

    fn validate_lucky_symbol(&self) -> Result<()> {
        let lucky = self.lucky_symbol.as_deref().ok_or_else(|| {
            Error::CatalogIntegrity(format!(
                "lucky-symbol template '{}' has no lucky symbol",
                self.id
            ))
        })?;
        if self.symbols.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "lucky-symbol template '{}' has no normal symbol pool",
                self.id
            )));
        }
        if self.symbols.iter().any(|s| s == lucky) {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' lucky symbol '{}' overlaps the normal pool",
                self.id, lucky
            )));
        }
        let winning = self.prizes.iter().filter(|p| p.is_winning()).count();
        if winning != 1 {
            return Err(Error::CatalogIntegrity(format!(
                "lucky-symbol template '{}' needs exactly one winning tier, found {}",
                self.id, winning
            )));
        }
        Ok(())
    }
}
