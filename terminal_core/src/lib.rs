//! # Terminal Core
//!
//! The game state transition engine for a narrative terminal adventure.
//! It owns the canonical state through a [`grid_rules::StateStore`],
//! applies player commands and dialogue choices under a fixed rule set
//! (influence convergence, phase objectives, adversarial counter-play,
//! save reconciliation), and emits log lines and sound cues for the
//! presentation layer to render.
//!
//! ## Core Components
//!
//! - **engine**: command dispatch, dialogue walking, trust/influence
//!   resolution, adversary ("ICE") play, phase progression, item use
//! - **scheduler**: deferred pacing actions with stale-context guards
//! - **save**: JSON save documents and load-time roster reconciliation
//!
//! ## Design Philosophy
//!
//! - **Single writer**: one `&mut Engine` turn at a time; the host
//!   serializes commands and fired timers, so no locking exists anywhere
//! - **Data-driven**: phases, characters, dialogue, items, and even the
//!   command vocabulary come from the read-only content catalog
//! - **Events out, never prose**: the core emits classified log lines and
//!   discrete cues; rendering, audio, and persistence live outside

pub mod engine;
pub mod save;
pub mod scheduler;

pub use engine::*;
pub use save::*;
pub use scheduler::*;
