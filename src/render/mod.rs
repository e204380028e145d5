//! Output for the operator: the HTML map artifact and the terminal status board
//!
//! This module never modifies dispatch state.

pub mod colors;
pub mod map;
pub mod panel;

pub use map::{escape_html, Layer, MapArtifact};
