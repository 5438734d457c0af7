//! Evaluation criteria for a pizza comparison.
//!
//! A [`Criteria`] value is an ordered checklist: each named aspect (crust,
//! sauce, cheese, ...) carries the traits the model should look for. Order is
//! insertion order and determines the numbering in the rendered prompt.
//!
//! # Example
//!
//! ```rust,ignore
//! use pizza_compare::criteria::Criteria;
//!
//! let mut criteria = Criteria::new();
//! criteria.insert("Crust", ["visible", "golden"]);
//! assert_eq!(criteria.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;

/// Maximum number of criteria accepted from form-style input.
pub const MAX_FORM_CRITERIA: usize = 5;

/// A single named criterion and its expected traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Name of the aspect being checked.
    pub name: String,
    /// Descriptions of what the aspect should look like, in order.
    pub descriptions: Vec<String>,
}

/// Ordered mapping from criterion name to its descriptions.
///
/// Serialized as an array of `{ name, descriptions }` tables so that
/// configuration files keep their order. Deserialized entries go through
/// [`Criteria::insert`], so blank descriptions and empty criteria are
/// dropped the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Criterion>", into = "Vec<Criterion>")]
pub struct Criteria {
    entries: Vec<Criterion>,
}

impl Criteria {
    /// Create an empty checklist.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The checklist used by the bundled console example.
    #[must_use]
    pub fn default_checklist() -> Self {
        let mut criteria = Self::new();
        criteria.insert(
            "Base/Crust",
            [
                "Presence of bread-based foundation",
                "Visual texture (crispy/soft/burnt)",
                "Thickness type",
            ],
        );
        criteria.insert("Sauce Layer", ["Presence and coverage", "Type identification"]);
        criteria.insert("Cheese", ["Presence and distribution", "Melting characteristics"]);
        criteria
    }

    /// Insert a criterion.
    ///
    /// Descriptions are trimmed and blank ones dropped. A criterion with a
    /// blank name or no remaining descriptions is not included and `false`
    /// is returned. Inserting an existing name replaces its descriptions and
    /// keeps its position.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, descriptions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_owned();
        let descriptions: Vec<String> = descriptions
            .into_iter()
            .map(|d| d.as_ref().trim().to_owned())
            .filter(|d| !d.is_empty())
            .collect();

        if name.is_empty() || descriptions.is_empty() {
            return false;
        }

        if let Some(existing) = self.entries.iter_mut().find(|c| c.name == name) {
            existing.descriptions = descriptions;
        } else {
            self.entries.push(Criterion { name, descriptions });
        }
        true
    }

    /// Build criteria from form-style entries.
    ///
    /// Each entry is a criterion name and a block of text holding one
    /// description per line. Entries with an empty name or no non-blank
    /// lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::TooMany`] when more than
    /// [`MAX_FORM_CRITERIA`] entries are supplied.
    pub fn from_form_entries<I, N, D>(entries: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: AsRef<str>,
    {
        let entries: Vec<(N, D)> = entries.into_iter().collect();
        if entries.len() > MAX_FORM_CRITERIA {
            return Err(CriteriaError::TooMany {
                given: entries.len(),
                max: MAX_FORM_CRITERIA,
            });
        }

        let mut criteria = Self::new();
        for (name, text) in &entries {
            criteria.insert(name.as_ref(), text.as_ref().lines());
        }
        Ok(criteria)
    }

    /// Parse a `Name=desc one;desc two` specification and insert it.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::Malformed`] when the `=` separator is
    /// missing or nothing usable remains after trimming.
    pub fn insert_spec(&mut self, spec: &str) -> Result<(), CriteriaError> {
        let (name, descriptions) = spec
            .split_once('=')
            .ok_or_else(|| CriteriaError::Malformed(spec.to_owned()))?;

        if self.insert(name, descriptions.split(';')) {
            Ok(())
        } else {
            Err(CriteriaError::Malformed(spec.to_owned()))
        }
    }

    /// Check that the checklist can drive a comparison.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::Empty`] when no criterion is present.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.entries.is_empty() {
            Err(CriteriaError::Empty)
        } else {
            Ok(())
        }
    }

    /// Number of criteria.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the checklist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the descriptions for a criterion by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.descriptions.as_slice())
    }

    /// Iterate over criteria in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.entries.iter()
    }
}

impl From<Vec<Criterion>> for Criteria {
    fn from(entries: Vec<Criterion>) -> Self {
        let mut criteria = Self::new();
        for Criterion { name, descriptions } in entries {
            criteria.insert(name, descriptions);
        }
        criteria
    }
}

impl From<Criteria> for Vec<Criterion> {
    fn from(criteria: Criteria) -> Self {
        criteria.entries
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
