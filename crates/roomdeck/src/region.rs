//! The region the user has picked.

/// Holds the selected server region.
///
/// The selector only remembers the choice and reports whether it changed.
/// Acting on a change (reconnecting, pruning the directory) is the
/// dispatcher's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSelector {
    current: String,
}

impl RegionSelector {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Selects `region`. Returns `true` if it differs from the current one.
    pub fn select(&mut self, region: &str) -> bool {
        if self.current == region {
            return false;
        }
        tracing::debug!(from = %self.current, to = %region, "region selected");
        self.current = region.to_string();
        true
    }
}
