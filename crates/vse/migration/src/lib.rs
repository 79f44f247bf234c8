//! # vse-migration
//!
//! Moves packets between capability layers. Upgrades infer KBM bounds, a
//! μ-Loop and foundation anchors from the core fields; the gregarious upgrade
//! also joins an automatically named network. Downgrades strip extensions.
//!
//! ```rust
//! use vse_migration::migrate;
//! use vse_packet::{Layer, Packet};
//!
//! let p = Packet::builder("summarize_report")
//!     .version("1.3")
//!     .constraint("formal_tone")
//!     .divergence(0.15)
//!     .build()
//!     .unwrap();
//! let k = migrate(&p, Layer::Kinetic);
//! assert_eq!(k.layer(), Layer::Kinetic);
//! assert_eq!(migrate(&k, Layer::V13).layer(), Layer::V13);
//! ```

#![deny(unsafe_code)]

pub mod analysis;
pub mod error;
pub mod foundation;
pub mod migrate;

pub use analysis::{analyze_migration, MigrationAnalysis, SuggestedUpgrade};
pub use error::{MigrationError, MigrationResult};
pub use foundation::infer_foundation;
pub use migrate::{auto_gsn, kbm_for_divergence, migrate, migrate_to, upgrade_in_place};
