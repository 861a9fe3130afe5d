//! Core type definitions for regstore.

use std::fmt;

/// Stable reference to a record slot in the ordered log.
///
/// Locators are what the primary and secondary indexes store instead of
/// record copies. A locator carries the generation of the log that issued
/// it; once the log is cleared (for example on reload) older locators no
/// longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locator {
    slot: u32,
    generation: u32,
}

impl Locator {
    /// Creates a locator for a slot in the given log generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the log generation this locator was issued in.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot:{}@{}", self.slot, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_accessors() {
        let loc = Locator::new(7, 2);
        assert_eq!(loc.slot(), 7);
        assert_eq!(loc.generation(), 2);
        assert_eq!(loc.to_string(), "slot:7@2");
    }

    #[test]
    fn generation_distinguishes_locators() {
        assert_ne!(Locator::new(0, 0), Locator::new(0, 1));
    }
}
