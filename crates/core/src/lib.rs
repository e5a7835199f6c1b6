//! Deck state and ordering engine. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod pricing;
pub mod registry;
pub mod rng;
pub mod simulation;
pub mod sorting;
pub mod state;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use pricing::*;
pub use registry::*;
pub use rng::*;
pub use simulation::*;
pub use sorting::*;
pub use state::*;
