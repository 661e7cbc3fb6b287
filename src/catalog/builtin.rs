//! Built-in game templates.
//!
//! Ten ready-to-play templates covering all three game families. The
//! tables are fixed at compile time and validated by the tests below,
//! so [`builtin`] can hand out a shared catalog without a fallible
//! path at every call site.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::catalog::scratch::{ScratchKind, ScratchPrize, ScratchTemplate};
use crate::catalog::slots::{PayRule, Payline, SlotSymbol, SlotTemplate};
use crate::catalog::wheel::{WheelFeatures, WheelSegment, WheelTemplate};
use crate::catalog::{Catalog, CatalogBuilder};
use crate::credits::Credits;
use crate::error::Result;
use crate::result::NO_WIN;

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| match build_builtin() {
    Ok(catalog) => Arc::new(catalog),
    Err(e) => panic!("built-in catalog failed validation: {}", e),
});

/// Shared handle to the built-in catalog.
pub fn builtin() -> Arc<Catalog> {
    Arc::clone(&BUILTIN)
}

/// Construct the built-in catalog from scratch.
pub fn build_builtin() -> Result<Catalog> {
    CatalogBuilder::new()
        .scratch(golden_ticket())
        .scratch(new_year())
        .scratch(lucky_star())
        .slots(classic_3x3())
        .slots(modern_5x3())
        .slots(fruit_3x3())
        .wheel(classic_wheel())
        .wheel(fortune_wheel())
        .wheel(lucky_wheel())
        .wheel(mega_wheel())
        .build()
}

fn direct_prize(name: &str, credits: i64, probability: f64, display: &str) -> ScratchPrize {
    ScratchPrize {
        name: name.to_string(),
        credits: Credits::new(credits),
        probability,
        display: Some(display.to_string()),
        symbol: None,
    }
}

fn symbol_prize(name: &str, credits: i64, probability: f64, symbol: &str) -> ScratchPrize {
    ScratchPrize {
        name: name.to_string(),
        credits: Credits::new(credits),
        probability,
        display: None,
        symbol: Some(symbol.to_string()),
    }
}

fn losing_prize(probability: f64) -> ScratchPrize {
    ScratchPrize {
        name: NO_WIN.to_string(),
        credits: Credits::ZERO,
        probability,
        display: None,
        symbol: None,
    }
}

fn golden_ticket() -> ScratchTemplate {
    ScratchTemplate {
        id: "golden_ticket".to_string(),
        name: "Golden Ticket".to_string(),
        kind: ScratchKind::DirectPrize,
        cost: Credits::new(10),
        theme: "lottery".to_string(),
        rows: 5,
        cols: 6,
        filler: "TRY AGAIN".to_string(),
        symbols: Vec::new(),
        lucky_symbol: None,
        prizes: vec![
            direct_prize("Grand Prize", 1000, 0.001, "WIN 1000"),
            direct_prize("First Prize", 500, 0.005, "WIN 500"),
            direct_prize("Second Prize", 200, 0.01, "WIN 200"),
            direct_prize("Third Prize", 100, 0.02, "WIN 100"),
            direct_prize("Fourth Prize", 50, 0.05, "WIN 50"),
            direct_prize("Fifth Prize", 20, 0.1, "WIN 20"),
            direct_prize("Sixth Prize", 10, 0.15, "WIN 10"),
            losing_prize(0.664),
        ],
    }
}

fn new_year() -> ScratchTemplate {
    ScratchTemplate {
        id: "new_year".to_string(),
        name: "New Year Festival".to_string(),
        kind: ScratchKind::SymbolMatch,
        cost: Credits::new(15),
        theme: "festival".to_string(),
        rows: 3,
        cols: 3,
        filler: String::new(),
        symbols: ["🧧", "🎆", "🎊", "🍊", "🎁", "💰", "🐉", "🏮"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        lucky_symbol: None,
        prizes: vec![
            symbol_prize("Dragon Jackpot", 2000, 0.002, "🐉"),
            symbol_prize("Red Envelope", 888, 0.005, "🧧"),
            symbol_prize("Fireworks", 500, 0.01, "🎆"),
            symbol_prize("Gift Box", 200, 0.02, "🎁"),
            symbol_prize("Golden Orange", 100, 0.05, "🍊"),
            losing_prize(0.913),
        ],
    }
}

fn lucky_star() -> ScratchTemplate {
    ScratchTemplate {
        id: "lucky_star".to_string(),
        name: "Lucky Star".to_string(),
        kind: ScratchKind::LuckySymbol,
        cost: Credits::new(20),
        theme: "mystic".to_string(),
        rows: 4,
        cols: 4,
        filler: String::new(),
        symbols: ["💎", "🔮", "🎯", "🎲", "🃏", "🎪"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        lucky_symbol: Some("⭐".to_string()),
        prizes: vec![
            ScratchPrize {
                name: "Lucky Star".to_string(),
                credits: Credits::new(5000),
                probability: 0.01,
                display: None,
                symbol: None,
            },
            losing_prize(0.99),
        ],
    }
}

fn slot_symbol(id: &str, name: &str, icon: &str, value: u32, rarity: f64) -> SlotSymbol {
    SlotSymbol {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        value,
        rarity,
    }
}

fn payline(id: u32, name: &str, cells: &[(u8, u8)]) -> Payline {
    Payline {
        id,
        name: name.to_string(),
        cells: cells.to_vec(),
    }
}

fn paytable(entries: &[(&str, &[(u8, u32)])]) -> HashMap<String, Vec<PayRule>> {
    entries
        .iter()
        .map(|(symbol, rules)| {
            let rules = rules
                .iter()
                .map(|&(count, multiplier)| PayRule { count, multiplier })
                .collect();
            (symbol.to_string(), rules)
        })
        .collect()
}

fn classic_3x3() -> SlotTemplate {
    SlotTemplate {
        id: "classic_3x3".to_string(),
        name: "Classic Slots".to_string(),
        cost: Credits::new(5),
        theme: "retro".to_string(),
        reels: 3,
        rows: 3,
        symbols: vec![
            slot_symbol("cherry", "Cherry", "🍒", 1, 0.3),
            slot_symbol("lemon", "Lemon", "🍋", 2, 0.25),
            slot_symbol("orange", "Orange", "🍊", 3, 0.2),
            slot_symbol("plum", "Plum", "🍇", 4, 0.15),
            slot_symbol("bell", "Bell", "🔔", 5, 0.08),
            slot_symbol("seven", "Seven", "7️⃣", 10, 0.02),
        ],
        paylines: vec![
            payline(0, "Center", &[(0, 1), (1, 1), (2, 1)]),
            payline(1, "Top", &[(0, 0), (1, 0), (2, 0)]),
            payline(2, "Bottom", &[(0, 2), (1, 2), (2, 2)]),
            payline(3, "Diagonal", &[(0, 0), (1, 1), (2, 2)]),
            payline(4, "Anti-diagonal", &[(0, 2), (1, 1), (2, 0)]),
        ],
        paytable: paytable(&[
            ("cherry", &[(2, 2), (3, 5)]),
            ("lemon", &[(2, 3), (3, 8)]),
            ("orange", &[(2, 4), (3, 12)]),
            ("plum", &[(2, 5), (3, 15)]),
            ("bell", &[(2, 8), (3, 25)]),
            ("seven", &[(2, 20), (3, 100)]),
        ]),
        wild: None,
        scatter: None,
    }
}

/// Row patterns for the 25 paylines of the five-reel machine, one row
/// index per reel.
const MODERN_LINE_PATTERNS: [[u8; 5]; 25] = [
    [1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0],
    [2, 2, 2, 2, 2],
    [0, 1, 2, 1, 0],
    [2, 1, 0, 1, 2],
    [0, 0, 1, 2, 2],
    [2, 2, 1, 0, 0],
    [1, 0, 1, 2, 1],
    [1, 2, 1, 0, 1],
    [0, 1, 1, 1, 0],
    [2, 1, 1, 1, 2],
    [1, 0, 0, 0, 1],
    [1, 2, 2, 2, 1],
    [0, 1, 0, 1, 0],
    [2, 1, 2, 1, 2],
    [1, 1, 0, 1, 1],
    [1, 1, 2, 1, 1],
    [0, 2, 0, 2, 0],
    [2, 0, 2, 0, 2],
    [0, 2, 2, 2, 0],
    [2, 0, 0, 0, 2],
    [1, 0, 2, 0, 1],
    [1, 2, 0, 2, 1],
    [0, 0, 2, 0, 0],
    [2, 2, 0, 2, 2],
];

fn modern_5x3() -> SlotTemplate {
    let paylines = MODERN_LINE_PATTERNS
        .iter()
        .enumerate()
        .map(|(i, pattern)| Payline {
            id: i as u32,
            name: format!("Line {}", i + 1),
            cells: pattern
                .iter()
                .enumerate()
                .map(|(reel, &row)| (reel as u8, row))
                .collect(),
        })
        .collect();
    SlotTemplate {
        id: "modern_5x3".to_string(),
        name: "Royal Reels".to_string(),
        cost: Credits::new(10),
        theme: "royal".to_string(),
        reels: 5,
        rows: 3,
        symbols: vec![
            slot_symbol("ace", "Ace", "🅰️", 1, 0.25),
            slot_symbol("king", "King", "🇰", 2, 0.2),
            slot_symbol("queen", "Queen", "🇶", 3, 0.18),
            slot_symbol("jack", "Jack", "🇯", 4, 0.15),
            slot_symbol("diamond", "Diamond", "💎", 8, 0.1),
            slot_symbol("crown", "Crown", "👑", 12, 0.08),
            slot_symbol("star", "Star", "⭐", 20, 0.04),
        ],
        paylines,
        paytable: paytable(&[
            ("ace", &[(3, 5), (4, 15), (5, 50)]),
            ("king", &[(3, 8), (4, 25), (5, 80)]),
            ("queen", &[(3, 12), (4, 35), (5, 120)]),
            ("jack", &[(3, 15), (4, 45), (5, 150)]),
            ("diamond", &[(3, 25), (4, 80), (5, 300)]),
            ("crown", &[(3, 40), (4, 150), (5, 500)]),
            ("star", &[(3, 100), (4, 400), (5, 1000)]),
        ]),
        wild: Some("star".to_string()),
        scatter: Some("crown".to_string()),
    }
}

fn fruit_3x3() -> SlotTemplate {
    SlotTemplate {
        id: "fruit_3x3".to_string(),
        name: "Fruit Party".to_string(),
        cost: Credits::new(8),
        theme: "fruit".to_string(),
        reels: 3,
        rows: 3,
        symbols: vec![
            slot_symbol("watermelon", "Watermelon", "🍉", 1, 0.3),
            slot_symbol("grape", "Grape", "🍇", 2, 0.25),
            slot_symbol("apple", "Apple", "🍎", 3, 0.2),
            slot_symbol("banana", "Banana", "🍌", 4, 0.15),
            slot_symbol("pineapple", "Pineapple", "🍍", 6, 0.08),
            slot_symbol("jackpot", "Jackpot", "💰", 15, 0.02),
        ],
        paylines: vec![
            payline(0, "Center", &[(0, 1), (1, 1), (2, 1)]),
            payline(1, "Top", &[(0, 0), (1, 0), (2, 0)]),
            payline(2, "Bottom", &[(0, 2), (1, 2), (2, 2)]),
        ],
        paytable: paytable(&[
            ("watermelon", &[(2, 2), (3, 6)]),
            ("grape", &[(2, 3), (3, 10)]),
            ("apple", &[(2, 4), (3, 15)]),
            ("banana", &[(2, 6), (3, 20)]),
            ("pineapple", &[(2, 10), (3, 35)]),
            ("jackpot", &[(2, 50), (3, 200)]),
        ]),
        wild: Some("jackpot".to_string()),
        scatter: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn seg(
    id: u32,
    name: &str,
    icon: &str,
    credits: i64,
    probability: f64,
    color: &str,
    angle_start: f64,
    angle_end: f64,
) -> WheelSegment {
    WheelSegment {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        credits: Credits::new(credits),
        probability,
        color: color.to_string(),
        angle_start,
        angle_end,
        is_special: false,
        is_respin: false,
    }
}

fn special(segment: WheelSegment) -> WheelSegment {
    WheelSegment {
        is_special: true,
        ..segment
    }
}

fn respin(segment: WheelSegment) -> WheelSegment {
    WheelSegment {
        is_respin: true,
        ..segment
    }
}

fn classic_wheel() -> WheelTemplate {
    WheelTemplate {
        id: "classic_wheel".to_string(),
        name: "Classic Wheel".to_string(),
        cost: Credits::new(5),
        theme: "carnival".to_string(),
        segments: vec![
            seg(0, NO_WIN, "😊", 0, 0.3, "#FF6B6B", 0.0, 54.0),
            seg(1, "10 Credits", "🪙", 10, 0.25, "#4ECDC4", 54.0, 108.0),
            seg(2, NO_WIN, "😊", 0, 0.2, "#FF6B6B", 108.0, 162.0),
            seg(3, "20 Credits", "🎁", 20, 0.15, "#45B7D1", 162.0, 216.0),
            seg(4, NO_WIN, "😊", 0, 0.05, "#FF6B6B", 216.0, 270.0),
            seg(5, "50 Credits", "💰", 50, 0.04, "#F39C12", 270.0, 324.0),
            seg(6, "100 Credits", "💎", 100, 0.01, "#9B59B6", 324.0, 360.0),
        ],
        animation: Duration::from_secs(3),
        min_spins: 3,
        max_spins: 5,
        features: WheelFeatures::default(),
    }
}

fn fortune_wheel() -> WheelTemplate {
    WheelTemplate {
        id: "fortune_wheel".to_string(),
        name: "Wheel of Fortune".to_string(),
        cost: Credits::new(20),
        theme: "fortune".to_string(),
        segments: vec![
            seg(0, "Bankrupt", "💸", -50, 0.1, "#E74C3C", 0.0, 36.0),
            seg(1, "5 Credits", "🪙", 5, 0.2, "#3498DB", 36.0, 72.0),
            seg(2, "10 Credits", "🪙", 10, 0.18, "#2ECC71", 72.0, 108.0),
            seg(3, "20 Credits", "🎁", 20, 0.15, "#F1C40F", 108.0, 144.0),
            seg(4, "50 Credits", "💰", 50, 0.12, "#9B59B6", 144.0, 180.0),
            seg(5, "100 Credits", "💎", 100, 0.1, "#E67E22", 180.0, 216.0),
            seg(6, "200 Credits", "🏅", 200, 0.079, "#1ABC9C", 216.0, 252.0),
            seg(7, "500 Credits", "👑", 500, 0.05, "#F39C12", 252.0, 288.0),
            special(seg(8, "1000 Credits", "🏆", 1000, 0.02, "#D35400", 288.0, 324.0)),
            special(seg(9, "Mega Prize", "🎊", 2000, 0.001, "#8E44AD", 324.0, 360.0)),
        ],
        animation: Duration::from_secs(4),
        min_spins: 4,
        max_spins: 6,
        features: WheelFeatures {
            double_chance: true,
            bonus_spin: false,
            bankruptcy_protection: true,
            lucky_multiplier: false,
        },
    }
}

fn lucky_wheel() -> WheelTemplate {
    WheelTemplate {
        id: "lucky_wheel".to_string(),
        name: "Lucky Wheel".to_string(),
        cost: Credits::new(15),
        theme: "clover".to_string(),
        segments: vec![
            respin(seg(0, "Spin Again", "🔄", 0, 0.15, "#16A085", 0.0, 30.0)),
            seg(1, "15 Credits", "🪙", 15, 0.2, "#3498DB", 30.0, 60.0),
            seg(2, "30 Credits", "🪙", 30, 0.176, "#2ECC71", 60.0, 90.0),
            seg(3, NO_WIN, "😢", 0, 0.15, "#95A5A6", 90.0, 120.0),
            seg(4, "60 Credits", "🎁", 60, 0.12, "#F1C40F", 120.0, 150.0),
            seg(5, "120 Credits", "💰", 120, 0.1, "#E67E22", 150.0, 180.0),
            seg(6, NO_WIN, "😢", 0, 0.05, "#95A5A6", 180.0, 210.0),
            seg(7, "250 Credits", "💎", 250, 0.03, "#9B59B6", 210.0, 240.0),
            seg(8, "500 Credits", "👑", 500, 0.015, "#F39C12", 240.0, 270.0),
            special(seg(9, "Lucky Prize", "🍀", 1000, 0.005, "#27AE60", 270.0, 300.0)),
            special(seg(10, "Super Prize", "⭐", 1500, 0.003, "#D35400", 300.0, 330.0)),
            special(seg(11, "Ultimate Prize", "🎆", 3000, 0.001, "#8E44AD", 330.0, 360.0)),
        ],
        animation: Duration::from_secs(5),
        min_spins: 5,
        max_spins: 8,
        features: WheelFeatures {
            double_chance: false,
            bonus_spin: true,
            bankruptcy_protection: false,
            lucky_multiplier: true,
        },
    }
}

fn mega_wheel() -> WheelTemplate {
    WheelTemplate {
        id: "mega_wheel".to_string(),
        name: "Mega Wheel".to_string(),
        cost: Credits::new(50),
        theme: "jackpot".to_string(),
        segments: vec![
            seg(0, "Small Prize", "🎁", 25, 0.35, "#3498DB", 0.0, 45.0),
            seg(1, "Medium Prize", "🎊", 100, 0.25, "#2ECC71", 45.0, 90.0),
            seg(2, "Big Prize", "💰", 300, 0.18, "#F1C40F", 90.0, 135.0),
            seg(3, "Super Prize", "💎", 800, 0.12, "#9B59B6", 135.0, 180.0),
            seg(4, "Giant Prize", "👑", 2000, 0.06, "#E67E22", 180.0, 225.0),
            seg(5, "Legendary Prize", "🏆", 5000, 0.028, "#E74C3C", 225.0, 270.0),
            seg(6, "Epic Prize", "⭐", 10000, 0.01, "#D35400", 270.0, 315.0),
            special(seg(7, "Ultimate Prize", "🎆", 50000, 0.002, "#8E44AD", 315.0, 360.0)),
        ],
        animation: Duration::from_secs(6),
        min_spins: 6,
        max_spins: 10,
        features: WheelFeatures {
            double_chance: true,
            bonus_spin: false,
            bankruptcy_protection: false,
            lucky_multiplier: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GameKind;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = build_builtin().unwrap();
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn test_builtin_handle_is_shared() {
        let a = builtin();
        let b = builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_family_counts() {
        let catalog = build_builtin().unwrap();
        let rows = catalog.summaries();
        let count = |kind: GameKind| rows.iter().filter(|r| r.game == kind).count();
        assert_eq!(count(GameKind::Scratch), 3);
        assert_eq!(count(GameKind::Slots), 3);
        assert_eq!(count(GameKind::Wheel), 4);
    }

    #[test]
    fn test_wheel_faces_are_fully_covered() {
        let catalog = build_builtin().unwrap();
        for id in ["classic_wheel", "fortune_wheel", "lucky_wheel", "mega_wheel"] {
            let wheel = catalog.wheel(id).unwrap();
            let covered: f64 = wheel
                .segments
                .iter()
                .map(|s| s.angle_end - s.angle_start)
                .sum();
            assert!((covered - 360.0).abs() < 1e-9, "{} covers {}", id, covered);
        }
    }

    #[test]
    fn test_modern_paylines_are_distinct() {
        let catalog = build_builtin().unwrap();
        let slots = catalog.slots("modern_5x3").unwrap();
        assert_eq!(slots.paylines.len(), 25);
        for (i, a) in slots.paylines.iter().enumerate() {
            for b in &slots.paylines[i + 1..] {
                assert_ne!(a.cells, b.cells);
            }
        }
    }

    #[test]
    fn test_respin_segment_present_on_lucky_wheel() {
        let catalog = build_builtin().unwrap();
        let wheel = catalog.wheel("lucky_wheel").unwrap();
        assert!(wheel.segments.iter().any(|s| s.is_respin));
        assert!(wheel.features.bonus_spin);
    }
}
