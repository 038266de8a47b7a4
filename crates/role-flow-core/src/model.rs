use serde::{Deserialize, Serialize};

/// A player with roles listed from most to least preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub preferences: Vec<String>,
}

impl Agent {
    pub fn new<I, S>(id: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            preferences: preferences.into_iter().map(Into::into).collect(),
        }
    }

    /// Zero-based rank of `category` in this player's list.
    pub fn rank_of(&self, category: &str) -> Option<usize> {
        self.preferences.iter().position(|p| p == category)
    }
}

/// A role with a fixed number of seats.
///
/// Capacity is signed so that a negative value read from input can be
/// rejected with a proper error rather than failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub capacity: i64,
}

impl Category {
    pub fn new(id: impl Into<String>, capacity: i64) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}
