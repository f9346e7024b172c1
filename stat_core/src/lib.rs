//! stat_core - Equipment stat records for item systems
//!
//! This library provides:
//! - StatKind: The named numeric stats an item can carry
//! - EquipmentStats: A record holding one value per stat
//! - StatAccumulator: Sums records and `name -> value` bonus maps
//!
//! # Quick Start
//!
//! ```rust
//! use stat_core::prelude::*;
//!
//! let base = EquipmentStats::new().with(StatKind::Attack, 12.0);
//! let mut acc = StatAccumulator::new();
//! acc.add_stats(&base);
//! acc.add_named("crit_rate", 5.0);
//!
//! let total = acc.finish();
//! assert_eq!(total.attack, 12.0);
//! assert_eq!(total.crit_rate, 5.0);
//! ```

pub mod prelude;
pub mod stat_block;
pub mod types;

pub use stat_block::{EquipmentStats, StatAccumulator};
pub use types::{StatKind, UnknownStat};
