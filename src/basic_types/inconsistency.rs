use super::ObjectVariable;
use super::TimePoint;

/// The outcome of propagating one batch of constraints.
///
/// Failure is a value, never an unwind; entry points roll the networks back to their
/// pre-call snapshot before surfacing an [`Inconsistency`].
pub type PropagationStatus = Result<(), Inconsistency>;

/// A hard propagation failure. Any of these fails the whole batch that triggered it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    /// A domain lost its last value.
    #[error("domain of object variable `{0}` became empty")]
    EmptyDomain(ObjectVariable),
    /// A unification was requested between variables recorded as separated.
    #[error("object variables `{0}` and `{1}` are separated and cannot be unified")]
    UnifyingSeparated(ObjectVariable, ObjectVariable),
    /// A separation was requested between unified (or identically bound) variables.
    #[error("object variables `{0}` and `{1}` are unified and cannot be separated")]
    SeparatingUnified(ObjectVariable, ObjectVariable),
    /// The minimal network assigns a time point a negative distance to itself.
    #[error("time point `{0}` has a negative self-distance")]
    NegativeSelfDistance(TimePoint),
}
