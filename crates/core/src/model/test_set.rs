use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when neither the document nor the caller names the test.
pub const UNTITLED_TEST: &str = "Untitled Test";

/// File name of a test-set document, as discovered from a directory listing.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestSetName(String);

impl TestSetName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TestSetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestSetName({})", self.0)
    }
}

impl fmt::Display for TestSetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestSetName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Display/reference id of an entry. Defaults to the entry's position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    Position(usize),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Position(idx) => write!(f, "{idx}"),
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

/// Reference from a test set to one question resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestSetEntry {
    pub file: String,
    pub id: EntryId,
}

/// A named, ordered collection of question references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    pub title: String,
    pub entries: Vec<TestSetEntry>,
}

impl TestSet {
    #[must_use]
    pub fn files(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.file.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
