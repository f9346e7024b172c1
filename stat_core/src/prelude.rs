//! Prelude module for convenient imports
//!
//! ```rust
//! use stat_core::prelude::*;
//! ```

pub use crate::stat_block::{EquipmentStats, StatAccumulator};
pub use crate::types::{StatKind, UnknownStat};
