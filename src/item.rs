// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// A unit of work flowing through the pipeline conduits.
///
/// Sources typically emit [`WorkItem::Number`]; hashing stages turn every item
/// into [`WorkItem::Text`]. Every item has a canonical text form (its
/// `Display` output) which is what the hash stages digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkItem {
    Number(i64),
    Text(String),
}

impl WorkItem {
    /// Canonical text form of the item; numbers render in decimal.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Consume the item and return its canonical text form without copying text items.
    pub fn into_text(self) -> String {
        match self {
            WorkItem::Number(n) => n.to_string(),
            WorkItem::Text(s) => s,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WorkItem::Text(s) => Some(s),
            WorkItem::Number(_) => None,
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::Number(n) => write!(f, "{}", n),
            WorkItem::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for WorkItem {
    fn from(n: i64) -> Self {
        WorkItem::Number(n)
    }
}

impl From<i32> for WorkItem {
    fn from(n: i32) -> Self {
        WorkItem::Number(i64::from(n))
    }
}

impl From<String> for WorkItem {
    fn from(s: String) -> Self {
        WorkItem::Text(s)
    }
}

impl From<&str> for WorkItem {
    fn from(s: &str) -> Self {
        WorkItem::Text(s.to_string())
    }
}
