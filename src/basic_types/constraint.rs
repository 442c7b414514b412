use super::ObjectVariable;
use super::TimePoint;
use super::Value;
#[cfg(doc)]
use crate::engine::ConstraintNetwork;

/// A constraint submitted to [`ConstraintNetwork::propagate_constraints`].
///
/// Each kind carries exactly the fields its propagation rule needs. Unification and
/// separation are symmetric and are submitted in one direction only; the network
/// generates the mirrored event itself and warns about duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// The two variables must take the same value.
    Unification(ObjectVariable, ObjectVariable),
    /// The variable must take the same value as one of the alternatives.
    DisjunctiveUnification(ObjectVariable, Vec<ObjectVariable>),
    /// The two variables must never take the same value.
    Separation(ObjectVariable, ObjectVariable),
    /// The parameter tuple must match one of the rows of the named table.
    GeneralRelation(GeneralRelation),
    /// `variable <= value`.
    DomainValueLeq(ObjectVariable, Value),
    /// `variable < value`.
    DomainValueLt(ObjectVariable, Value),
    /// `variable >= value`.
    DomainValueGeq(ObjectVariable, Value),
    /// `variable > value`.
    DomainValueGt(ObjectVariable, Value),
    /// A directed temporal edge.
    Temporal(TemporalConstraint),
}

impl Constraint {
    /// Shorthand for a [`Constraint::Temporal`] edge.
    pub fn temporal(
        from: impl Into<TimePoint>,
        to: impl Into<TimePoint>,
        bound: impl Into<TemporalBound>,
        strict: bool,
    ) -> Constraint {
        Constraint::Temporal(TemporalConstraint {
            from: from.into(),
            to: to.into(),
            bound: bound.into(),
            strict,
        })
    }
}

/// A finite n-ary relation: a named table whose rows enumerate the allowed value
/// combinations of the parameter variables. Rows accumulate per name across
/// submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneralRelation {
    pub name: String,
    pub parameters: Vec<ObjectVariable>,
    pub rows: Vec<Vec<Value>>,
}

/// One directed temporal edge: `to - from <= bound` (`<` when strict).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporalConstraint {
    pub from: TimePoint,
    pub to: TimePoint,
    pub bound: TemporalBound,
    pub strict: bool,
}

/// The bound of a temporal edge.
///
/// A constant is materialized as a fresh singleton-domain helper variable when the
/// edge is recorded; a variable bound is read through its domain's current upper
/// bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemporalBound {
    Constant(i64),
    Variable(ObjectVariable),
}

impl From<i64> for TemporalBound {
    fn from(constant: i64) -> TemporalBound {
        TemporalBound::Constant(constant)
    }
}

impl From<ObjectVariable> for TemporalBound {
    fn from(variable: ObjectVariable) -> TemporalBound {
        TemporalBound::Variable(variable)
    }
}
