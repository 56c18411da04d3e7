//! Structured validation failures of bulk upload configs.
//!
//! A [`ValidationError`] carries every problem found in a config, grouped
//! into one [`Violation`] per category. Its message is the `"; "`-joined
//! list of clauses, each naming the missing items in sorted order, e.g.
//! `missing service_types: kiosk; missing some default_capacity: a.geojson`.

use std::collections::BTreeSet;
use std::fmt;

/// One category of unresolvable references, with the sorted offending
/// names (or filenames).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Service type names absent from the reference list.
    MissingServiceTypes(Vec<String>),
    /// Physical object type names absent from the reference list.
    MissingPhysicalObjectTypes(Vec<String>),
    /// Filenames whose `default_capacity` was left unset.
    MissingDefaultCapacity(Vec<String>),
}

impl Violation {
    /// The offending names, sorted lexicographically.
    #[must_use]
    pub fn items(&self) -> &[String] {
        match self {
            Self::MissingServiceTypes(items)
            | Self::MissingPhysicalObjectTypes(items)
            | Self::MissingDefaultCapacity(items) => items,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::MissingServiceTypes(_) => "missing service_types",
            Self::MissingPhysicalObjectTypes(_) => "missing physical_object_types",
            Self::MissingDefaultCapacity(_) => "missing some default_capacity",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.items().join(", "))
    }
}

/// Unresolvable references or missing required values in an upload config.
///
/// Never empty: at least one [`Violation`] is always present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Every violation found, in reporting order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Service type names that could not be resolved.
    #[must_use]
    pub fn missing_service_types(&self) -> &[String] {
        self.find(|v| matches!(v, Violation::MissingServiceTypes(_)))
    }

    /// Physical object type names that could not be resolved.
    #[must_use]
    pub fn missing_physical_object_types(&self) -> &[String] {
        self.find(|v| matches!(v, Violation::MissingPhysicalObjectTypes(_)))
    }

    /// Filenames without a `default_capacity`.
    #[must_use]
    pub fn missing_default_capacity(&self) -> &[String] {
        self.find(|v| matches!(v, Violation::MissingDefaultCapacity(_)))
    }

    fn find(&self, predicate: impl Fn(&Violation) -> bool) -> &[String] {
        self.violations
            .iter()
            .find(|v| predicate(v))
            .map(Violation::items)
            .unwrap_or_default()
    }
}

/// Accumulates missing items per category and turns them into a
/// [`ValidationError`] once every entry has been checked.
#[derive(Debug, Default)]
pub(crate) struct ValidationReport {
    service_types: BTreeSet<String>,
    physical_object_types: BTreeSet<String>,
    default_capacity: BTreeSet<String>,
}

impl ValidationReport {
    pub(crate) fn missing_service_type(&mut self, name: &str) {
        self.service_types.insert(name.to_string());
    }

    pub(crate) fn missing_physical_object_type(&mut self, name: &str) {
        self.physical_object_types.insert(name.to_string());
    }

    pub(crate) fn missing_default_capacity(&mut self, filename: &str) {
        self.default_capacity.insert(filename.to_string());
    }

    /// `Ok` when nothing was reported, otherwise a [`ValidationError`] with
    /// one violation per nonempty category.
    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = [
            Violation::MissingServiceTypes(self.service_types.into_iter().collect()),
            Violation::MissingPhysicalObjectTypes(
                self.physical_object_types.into_iter().collect(),
            ),
            Violation::MissingDefaultCapacity(self.default_capacity.into_iter().collect()),
        ]
        .into_iter()
        .filter(|v| !v.items().is_empty())
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}
