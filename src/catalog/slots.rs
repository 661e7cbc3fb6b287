//! Slot-machine template definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::credits::Credits;
use crate::error::{Error, Result};

/// One reel symbol. Rarity drives the draw weight: each cell is filled
/// with probability proportional to `1 / rarity`, so low-rarity symbols
/// land most often.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSymbol {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub value: u32,
    pub rarity: f64,
}

/// A payline: the ordered cells it reads, one per reel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payline {
    pub id: u32,
    pub name: String,
    /// `(reel, row)` positions, leftmost reel first.
    pub cells: Vec<(u8, u8)>,
}

/// One paytable rule: an exact run length and its cost multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayRule {
    pub count: u8,
    pub multiplier: u32,
}

/// A slot-machine game template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub id: String,
    pub name: String,
    pub cost: Credits,
    pub theme: String,
    pub reels: u8,
    pub rows: u8,
    pub symbols: Vec<SlotSymbol>,
    pub paylines: Vec<Payline>,
    /// Symbol id to its run-length rules.
    pub paytable: HashMap<String, Vec<PayRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<String>,
}

impl SlotTemplate {
    pub fn symbol(&self, id: &str) -> Option<&SlotSymbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reels == 0 || self.rows == 0 {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has an empty grid ({} reels x {} rows)",
                self.id, self.reels, self.rows
            )));
        }
        self.validate_symbols()?;
        self.validate_paylines()?;
        self.validate_paytable()?;
        self.validate_special(&self.wild, "wild")?;
        self.validate_special(&self.scatter, "scatter")?;
        Ok(())
    }

    fn validate_symbols(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has no symbols",
                self.id
            )));
        }
        let mut seen = Vec::new();
        for symbol in &self.symbols {
            if seen.contains(&&symbol.id) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' has duplicate symbol id '{}'",
                    self.id, symbol.id
                )));
            }
            seen.push(&symbol.id);
            if !symbol.rarity.is_finite() || symbol.rarity <= 0.0 {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' symbol '{}' has invalid rarity {}",
                    self.id, symbol.id, symbol.rarity
                )));
            }
        }
        Ok(())
    }

    fn validate_paylines(&self) -> Result<()> {
        if self.paylines.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has no paylines",
                self.id
            )));
        }
        let mut seen = Vec::new();
        for line in &self.paylines {
            if seen.contains(&line.id) {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' has duplicate payline id {}",
                    self.id, line.id
                )));
            }
            seen.push(line.id);
            if line.cells.is_empty() {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' payline {} has no cells",
                    self.id, line.id
                )));
            }
            for &(reel, row) in &line.cells {
                if reel >= self.reels || row >= self.rows {
                    return Err(Error::CatalogIntegrity(format!(
                        "template '{}' payline {} cell ({}, {}) is outside the {}x{} grid",
                        self.id, line.id, reel, row, self.reels, self.rows
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_paytable(&self) -> Result<()> {
        if self.paytable.is_empty() {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has an empty paytable",
                self.id
            )));
        }
        let max_line = self
            .paylines
            .iter()
            .map(|l| l.cells.len())
            .max()
            .unwrap_or(0);
        for (symbol_id, rules) in &self.paytable {
            if self.symbol(symbol_id).is_none() {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' paytable references unknown symbol '{}'",
                    self.id, symbol_id
                )));
            }
            if rules.is_empty() {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' paytable for '{}' has no rules",
                    self.id, symbol_id
                )));
            }
            let mut counts = Vec::new();
            for rule in rules {
                if rule.count < 2 || rule.count as usize > max_line {
                    return Err(Error::CatalogIntegrity(format!(
                        "template '{}' paytable for '{}' has count {} outside 2..={}",
                        self.id, symbol_id, rule.count, max_line
                    )));
                }
                if counts.contains(&rule.count) {
                    return Err(Error::CatalogIntegrity(format!(
                        "template '{}' paytable for '{}' repeats count {}",
                        self.id, symbol_id, rule.count
                    )));
                }
                counts.push(rule.count);
                if rule.multiplier == 0 {
                    return Err(Error::CatalogIntegrity(format!(
                        "template '{}' paytable for '{}' has a zero multiplier",
                        self.id, symbol_id
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_special(&self, id: &Option<String>, role: &str) -> Result<()> {
        if let Some(id) = id {
            if self.symbol(id).is_none() {
                return Err(Error::CatalogIntegrity(format!(
                    "template '{}' {} symbol '{}' is not in the symbol set",
                    self.id, role, id
                )));
            }
        }
        Ok(())
    }
}
