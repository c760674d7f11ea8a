//! Frame-driven game state: breaking, placing, and saving on top of the
//! world and physics crates.

mod break_progress;
mod mutation;
mod save;
mod state;

pub use break_progress::*;
pub use mutation::*;
pub use save::*;
pub use state::*;
