//! The canonical format is the hub, so both directions only normalize.

use crate::model::Constraints;
use crate::transform::Converted;

pub fn to_canonical(constraints: &Constraints) -> Converted<Constraints> {
    Converted::new(constraints.normalized(), None)
}

pub fn from_canonical(constraints: &Constraints) -> Converted<Constraints> {
    Converted::new(constraints.normalized(), None)
}
