//! Keyboard distance model.
//!
//! Scores a character substitution by how far apart the two keys are on a
//! physical layout. The scorer only sees the [`KeyboardDistance`] trait, so a
//! layout can be swapped without touching scoring code.

pub mod layout;
pub mod layouts;

use std::fmt::Debug;

pub use layout::{KeyRow, KeyboardLayout};
pub use layouts::LayoutKind;

/// Physical distance between the keys producing two characters.
///
/// Implementations must return 0 for identical characters and be symmetric.
pub trait KeyboardDistance: Send + Sync + Debug {
    /// Distance between the keys for `a` and `b`, never negative.
    fn distance(&self, a: char, b: char) -> f32;

    /// Human-readable layout name.
    fn name(&self) -> &str;
}
