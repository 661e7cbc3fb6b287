//! LuckBox - a template-driven mini-game engine.
//!
//! Three randomized reward games built on one weighted sampler:
//! scratch cards, reel slot machines and spinning wheels. A validated
//! [`Catalog`] of templates describes the games; stateless engines
//! draw outcomes from a caller-supplied random source and settle every
//! play into a uniform [`GameResult`].
//!
//! ```
//! use luckbox::{builtin, GameRng, WheelEngine};
//!
//! let engine = WheelEngine::new(builtin());
//! let mut rng = GameRng::from_entropy();
//! let result = engine.spin("classic_wheel", &mut rng)?;
//! println!("{}: {} credits net", result.prize.name, result.net_win);
//! # Ok::<(), luckbox::Error>(())
//! ```

pub mod error;
pub mod credits; // Credit arithmetic with overflow discipline
pub mod rng; // Seedable random source for every draw
pub mod sampler; // Weighted selection shared by all games
pub mod catalog; // Template definitions and validation
pub mod games; // Scratch, slots and wheel engines
pub mod result; // Uniform play results

// Re-export commonly used types for easy access
pub use error::{Error, Result};

pub use credits::Credits;
pub use rng::GameRng;

pub use catalog::{
    builtin, Catalog, CatalogBuilder, GameKind, Template, TemplateSummary,
};
pub use games::{
    LineWin, ScratchCard, ScratchCardEngine, ScratchCell, SlotMachineEngine, SpecialEffects,
    SpinOutcome, WheelEngine, WheelOutcome, WinStatistics,
};
pub use result::{GameResult, Outcome, PrizeAward, NO_WIN};
