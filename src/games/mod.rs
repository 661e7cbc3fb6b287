//! Game engines.
//!
//! One engine per family. Each engine holds a shared [`Catalog`](crate::catalog::Catalog)
//! handle, draws outcomes from a caller-supplied random source and
//! returns a [`GameResult`](crate::result::GameResult). Engines keep no
//! per-play state: every play is a pure function of template and
//! random draws.

pub mod scratch;
pub mod slots;
pub mod wheel;

pub use scratch::{ScratchCard, ScratchCardEngine, ScratchCell};
pub use slots::{LineWin, SlotMachineEngine, SpinOutcome};
pub use wheel::{SpecialEffects, WheelEngine, WheelOutcome, WinStatistics};
