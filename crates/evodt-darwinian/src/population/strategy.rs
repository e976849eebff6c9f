//! Agent-type tags

use std::fmt::Debug;
use std::hash::Hash;

/// A closed set of strategy variants competing in one game.
///
/// Agents carry no memory across generations, so a strategy is just a tag.
/// `ALL` lists every variant in canonical order and `index` is the position
/// of a variant within it.
pub trait Strategy: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every variant, in canonical order
    const ALL: &'static [Self];

    /// Position of this variant in [`Strategy::ALL`]
    fn index(self) -> usize;

    /// Human-readable name used in reports and metrics
    fn label(self) -> &'static str;

    /// Number of variants
    fn count() -> usize {
        Self::ALL.len()
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.label()).collect()
    }
}
