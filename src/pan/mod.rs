// Purpose: musical naming and the physical pad layout

pub mod layout;
pub mod notes;

pub use layout::{inside_drum, Pad, PanLayout, Ring, PAD_RADIUS};
pub use notes::{Accidental, Note};
