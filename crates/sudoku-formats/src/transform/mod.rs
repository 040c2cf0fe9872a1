//! Conversion between native shapes and the canonical constraints.
//!
//! Every conversion goes through [`Constraints`]: a native puzzle is first
//! lifted to the canonical model, then lowered into the target format.
//! Features a side can't represent are dropped and named in a warning.

pub mod fpuzzles;
pub mod gridstring;
pub mod lisudoku;
pub mod penpa;

use crate::error::TransformError;
use crate::model::{Constraints, NativeConstraints, PuzzleFormat};

/// A converted puzzle plus the features that were left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<T> {
    pub constraints: T,
    pub warning: Option<String>,
}

impl<T> Converted<T> {
    pub fn new(constraints: T, warning: Option<String>) -> Self {
        Self {
            constraints,
            warning,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            constraints: f(self.constraints),
            warning: self.warning,
        }
    }
}

/// Lifts a native puzzle into canonical constraints.
pub fn to_canonical(native: &NativeConstraints) -> Result<Converted<Constraints>, TransformError> {
    match native {
        NativeConstraints::GridString(c) => gridstring::to_canonical(c),
        NativeConstraints::Lisudoku(c) => Ok(lisudoku::to_canonical(c)),
        NativeConstraints::Fpuzzles(p) => fpuzzles::to_canonical(p),
        NativeConstraints::Penpa(p) => penpa::to_canonical(p),
    }
}

/// Lowers canonical constraints into `format`'s native shape.
pub fn from_canonical(
    constraints: &Constraints,
    format: PuzzleFormat,
) -> Result<Converted<NativeConstraints>, TransformError> {
    match format {
        PuzzleFormat::GridString => {
            Ok(gridstring::from_canonical(constraints)?.map(NativeConstraints::GridString))
        }
        PuzzleFormat::Lisudoku => {
            Ok(lisudoku::from_canonical(constraints).map(NativeConstraints::Lisudoku))
        }
        PuzzleFormat::Fpuzzles => {
            Ok(fpuzzles::from_canonical(constraints)?.map(NativeConstraints::Fpuzzles))
        }
        PuzzleFormat::Penpa => Ok(penpa::from_canonical(constraints)?.map(NativeConstraints::Penpa)),
    }
}

/// Names of features dropped during a conversion, without repeats.
#[derive(Debug, Default)]
pub(crate) struct Ignored {
    names: Vec<String>,
}

impl Ignored {
    pub(crate) fn add(&mut self, name: &str) {
        if !self.names.iter().any(|seen| seen == name) {
            self.names.push(name.to_string());
        }
    }

    pub(crate) fn add_if(&mut self, present: bool, name: &str) {
        if present {
            self.add(name);
        }
    }

    /// Builds the warning, logging the dropped names on the way.
    pub(crate) fn into_warning(self, format: PuzzleFormat) -> Option<String> {
        if self.names.is_empty() {
            return None;
        }
        let names = self.names.join(", ");
        tracing::warn!(%format, ignored = %names, "dropped constraints during conversion");
        Some(format!("Ignored some constraints: {names}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_dedupes_in_order() {
        let mut ignored = Ignored::default();
        ignored.add("xv");
        ignored.add("arrow");
        ignored.add("xv");
        ignored.add_if(false, "clone");
        assert_eq!(
            ignored.into_warning(PuzzleFormat::Fpuzzles).as_deref(),
            Some("Ignored some constraints: xv, arrow")
        );
        assert_eq!(Ignored::default().into_warning(PuzzleFormat::Penpa), None);
    }

    #[test]
    fn test_canonical_hub_roundtrip() {
        let constraints = Constraints {
            anti_king: Some(true),
            ..Constraints::new(6)
        };
        let lifted = to_canonical(&NativeConstraints::Lisudoku(constraints.clone())).unwrap();
        assert_eq!(lifted.constraints, constraints);
        assert_eq!(lifted.warning, None);

        let lowered = from_canonical(&constraints, PuzzleFormat::Lisudoku).unwrap();
        assert_eq!(lowered.constraints, NativeConstraints::Lisudoku(constraints));
    }
}
