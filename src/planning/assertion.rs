use crate::basic_types::TimePoint;
use crate::engine::ConstraintNetwork;

/// A temporally qualified statement of a chronicle.
///
/// The planning layer is generic over the assertion language; it only needs to know
/// when an assertion starts and how to establish causal support between two
/// assertions by propagating constraints.
pub trait Assertion: Clone + PartialEq {
    /// The time point at which the assertion starts to hold.
    fn start_timepoint(&self) -> &TimePoint;

    /// Attempts to make `supporter` causally support this assertion by propagating
    /// the constraints that support requires into `network`.
    ///
    /// Returns whether support is achievable. Implementations follow the network's
    /// rollback conventions: a failed attempt must leave the network untouched when
    /// `revert_on_failure` is set, and a successful probe must be rewound when
    /// `revert_on_success` is set.
    fn propagate_causal_support_by(
        &self,
        supporter: &Self,
        network: &mut ConstraintNetwork,
        revert_on_failure: bool,
        revert_on_success: bool,
    ) -> bool;
}
