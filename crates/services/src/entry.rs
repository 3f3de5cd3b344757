//! Interpretation of the page entry parameters.

use quiz_core::model::TestSetName;

use crate::error::EntryError;

/// What a quiz page was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRequest {
    /// A whole test set, timed.
    Test(TestSetName),
    /// One question by reference, untimed.
    Question(String),
}

impl EntryRequest {
    /// Parse a query string such as `test=set_1.json` or `?q=7`.
    ///
    /// `test` wins over `question`, which wins over `q`. Blank values count
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::NothingToLoad` when no parameter names a target.
    pub fn from_query(query: &str) -> Result<Self, EntryError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let param = |key: &str| {
            pairs
                .iter()
                .find(|(k, v)| k == key && !v.trim().is_empty())
                .map(|(_, v)| v.trim().to_string())
        };

        if let Some(test) = param("test") {
            return Ok(Self::Test(TestSetName::new(test)));
        }
        param("question")
            .or_else(|| param("q"))
            .map(Self::Question)
            .ok_or(EntryError::NothingToLoad)
    }

    /// Build a request from explicit command-line values, test first.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::NothingToLoad` when both are absent or blank.
    pub fn from_args(test: Option<&str>, question: Option<&str>) -> Result<Self, EntryError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        if let Some(test) = present(test) {
            return Ok(Self::Test(TestSetName::new(test)));
        }
        present(question)
            .map(|q| Self::Question(q.to_string()))
            .ok_or(EntryError::NothingToLoad)
    }
}
