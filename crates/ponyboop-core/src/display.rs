use std::fmt;

/// The single externally visible mode of a pony.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayState {
    #[default]
    Resting,
    Booped1,
    Booped2,
    Booped3,
    Booped4,
    Broken,
    Scared,
    Inactive,
}

impl DisplayState {
    pub const ALL: [DisplayState; 8] = [
        DisplayState::Resting,
        DisplayState::Booped1,
        DisplayState::Booped2,
        DisplayState::Booped3,
        DisplayState::Booped4,
        DisplayState::Broken,
        DisplayState::Scared,
        DisplayState::Inactive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DisplayState::Resting => "resting",
            DisplayState::Booped1 => "booped-1",
            DisplayState::Booped2 => "booped-2",
            DisplayState::Booped3 => "booped-3",
            DisplayState::Booped4 => "booped-4",
            DisplayState::Broken => "broken",
            DisplayState::Scared => "scared",
            DisplayState::Inactive => "inactive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sparse mapping from exact boop counts to the state they switch to.
///
/// Only counts that are keys of the table cause a transition; counts in
/// between leave the current state alone.
///
/// Precondition: thresholds are non-zero and strictly increasing in the order
/// they were added. [`BoopTransitionTable::validate`] checks this for tables
/// built from untrusted input; lookups on a malformed table are unspecified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoopTransitionTable {
    transitions: Vec<(u32, DisplayState)>,
}

impl BoopTransitionTable {
    pub fn empty() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Builds a table in the given order without checking it.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, DisplayState)>) -> Self {
        Self {
            transitions: pairs.into_iter().collect(),
        }
    }

    /// Appends a transition. `count` must exceed every existing threshold.
    pub fn with(mut self, count: u32, state: DisplayState) -> Self {
        debug_assert!(
            self.transitions.last().map_or(count > 0, |&(last, _)| count > last),
            "boop threshold {count} is not above the previous threshold"
        );
        self.transitions.push((count, state));
        self
    }

    pub fn lookup(&self, count: u32) -> Option<DisplayState> {
        self.transitions
            .binary_search_by_key(&count, |&(threshold, _)| threshold)
            .ok()
            .map(|index| self.transitions[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, DisplayState)> + '_ {
        self.transitions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        let mut previous: Option<u32> = None;
        for &(count, _) in &self.transitions {
            if count == 0 {
                return Err(crate::ConfigError::ZeroThreshold);
            }
            if let Some(previous) = previous {
                if count <= previous {
                    return Err(crate::ConfigError::NonIncreasingThreshold {
                        previous,
                        next: count,
                    });
                }
            }
            previous = Some(count);
        }
        Ok(())
    }
}

impl Default for BoopTransitionTable {
    fn default() -> Self {
        Self::empty()
            .with(1, DisplayState::Booped1)
            .with(4, DisplayState::Booped2)
            .with(7, DisplayState::Booped3)
            .with(12, DisplayState::Booped4)
            .with(24, DisplayState::Broken)
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
