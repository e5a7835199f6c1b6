//! Deck file formats, tabletop links, catalog queries and config loading.

pub mod catalog;
pub mod codec;
pub mod load;
pub mod schema;
pub mod tabletop;

pub use catalog::*;
pub use codec::*;
pub use load::*;
pub use schema::*;
pub use tabletop::*;
