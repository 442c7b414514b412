use log::debug;
use log::warn;

use super::binding_network::BindingEvent;
use super::binding_network::BindingNetwork;
use super::temporal_network::TemporalNetwork;
use crate::basic_types::Constraint;
use crate::basic_types::Domain;
use crate::basic_types::IdGenerator;
use crate::basic_types::ObjectVariable;
use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;

/// The binding and temporal networks coupled behind one propagation entry point.
///
/// A batch of [`Constraint`]s is split into binding events and temporal edges, the
/// binding events are propagated first, then the temporal edges. A batch is atomic:
/// on inconsistency both networks rewind to their state from before the batch, and a
/// consistency probe (`just_checking`) rewinds them even on success.
///
/// The façade owns the single snapshot slot of both networks. Callers that need a
/// checkpoint surviving several batches clone the whole network instead.
#[derive(Clone, Debug, Default)]
pub struct ConstraintNetwork {
    binding: BindingNetwork,
    temporal: TemporalNetwork,
    ids: IdGenerator,
}

impl ConstraintNetwork {
    /// Declares object variables with their initial domains. Re-declaring a variable
    /// overwrites its domain.
    pub fn declare_variables(
        &mut self,
        variables: impl IntoIterator<Item = (ObjectVariable, Domain)>,
    ) {
        self.binding.declare_variables(variables);
    }

    /// The current domain of a declared variable.
    ///
    /// # Panics
    ///
    /// When the variable was never declared.
    pub fn domain(&self, variable: &str) -> &Domain {
        self.binding.domain(variable)
    }

    /// The binding side of the network.
    pub fn binding(&self) -> &BindingNetwork {
        &self.binding
    }

    /// The temporal side of the network.
    pub fn temporal(&self) -> &TemporalNetwork {
        &self.temporal
    }

    /// A fresh identifier for naming instantiated templates and their implicit time
    /// points. The same counter names the helper variables which materialize constant
    /// temporal bounds.
    pub fn next_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    /// Propagates a batch of constraints atomically.
    ///
    /// On inconsistency the batch leaves no trace and the cause is returned. With
    /// `just_checking` the batch also leaves no trace on success; the return value
    /// then only reports whether the batch would have been consistent.
    pub fn propagate_constraints(
        &mut self,
        constraints: Vec<Constraint>,
        just_checking: bool,
    ) -> PropagationStatus {
        let mut binding_events = Vec::new();
        let mut temporal_edges = Vec::new();
        let mut seen_unifications: HashSet<(ObjectVariable, ObjectVariable)> = HashSet::default();
        let mut seen_separations: HashSet<(ObjectVariable, ObjectVariable)> = HashSet::default();

        for constraint in constraints {
            match constraint {
                Constraint::Unification(first, second) => {
                    if !seen_unifications.insert(ordered_pair(&first, &second)) {
                        warn!("dropping duplicate unification of `{first}` and `{second}`");
                        continue;
                    }
                    binding_events.push(BindingEvent::Unify(first.clone(), second.clone()));
                    binding_events.push(BindingEvent::Unify(second, first));
                }
                Constraint::DisjunctiveUnification(variable, alternatives) => {
                    binding_events.push(BindingEvent::DisjunctiveUnify(variable, alternatives));
                }
                Constraint::Separation(first, second) => {
                    if !seen_separations.insert(ordered_pair(&first, &second)) {
                        warn!("dropping duplicate separation of `{first}` and `{second}`");
                        continue;
                    }
                    binding_events.push(BindingEvent::Separate(first.clone(), second.clone()));
                    binding_events.push(BindingEvent::Separate(second, first));
                }
                Constraint::GeneralRelation(relation) => {
                    binding_events.push(BindingEvent::Relation {
                        name: relation.name,
                        parameters: relation.parameters,
                        rows: relation.rows,
                    });
                }
                Constraint::DomainValueLeq(variable, bound) => {
                    binding_events.push(BindingEvent::RestrictUpper {
                        variable,
                        bound,
                        strict: false,
                    });
                }
                Constraint::DomainValueLt(variable, bound) => {
                    binding_events.push(BindingEvent::RestrictUpper {
                        variable,
                        bound,
                        strict: true,
                    });
                }
                Constraint::DomainValueGeq(variable, bound) => {
                    binding_events.push(BindingEvent::RestrictLower {
                        variable,
                        bound,
                        strict: false,
                    });
                }
                Constraint::DomainValueGt(variable, bound) => {
                    binding_events.push(BindingEvent::RestrictLower {
                        variable,
                        bound,
                        strict: true,
                    });
                }
                Constraint::Temporal(edge) => temporal_edges.push(edge),
            }
        }

        self.binding.backup();
        self.temporal.backup();

        let mut result = self.binding.propagate(binding_events);
        if result.is_ok() {
            result = self
                .temporal
                .propagate(temporal_edges, &mut self.binding, &mut self.ids);
        }

        match result {
            Ok(()) => {
                if just_checking {
                    self.binding.restore();
                    self.temporal.restore();
                    debug!("constraint batch is consistent, state restored");
                }
                Ok(())
            }
            Err(inconsistency) => {
                self.binding.restore();
                self.temporal.restore();
                debug!("constraint batch rejected: {inconsistency}");
                Err(inconsistency)
            }
        }
    }

    /// Whether two object variables are certainly equal: the same variable, members
    /// of one unification class, or bound to the same known value.
    pub fn unified(&self, first: &str, second: &str) -> bool {
        self.binding.unified(first, second)
    }

    /// Whether two object variables can still become equal.
    pub fn unifiable(&self, first: &str, second: &str) -> bool {
        self.binding.unifiable(first, second)
    }

    /// Whether two object variables can still become distinct.
    pub fn separable(&self, first: &str, second: &str) -> bool {
        !self.binding.unified(first, second)
    }

    /// Whether two object variables are certainly distinct.
    pub fn separated(&self, first: &str, second: &str) -> bool {
        !self.binding.unifiable(first, second)
    }

    /// Whether two time points are certainly equal: the same point, or at a minimal
    /// distance of zero in both directions.
    pub fn timepoints_unified(&self, first: &str, second: &str) -> bool {
        first == second
            || (self.temporal.minimal_distance(first, second) == Some(0)
                && self.temporal.minimal_distance(second, first) == Some(0))
    }

    /// The tightest known upper bound on `to - from`, or `None` when the pair is
    /// unknown or unbounded.
    pub fn timepoints_minimal_distance(&self, from: &str, to: &str) -> Option<i64> {
        self.temporal.minimal_distance(from, to)
    }

    /// Resets both networks and the identifier counter.
    pub fn clear(&mut self) {
        *self = ConstraintNetwork::default();
    }
}

fn ordered_pair(
    first: &ObjectVariable,
    second: &ObjectVariable,
) -> (ObjectVariable, ObjectVariable) {
    if first <= second {
        (first.clone(), second.clone())
    } else {
        (second.clone(), first.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::ConstraintNetwork;
    use crate::basic_types::Constraint;
    use crate::basic_types::Domain;
    use crate::basic_types::Inconsistency;
    use crate::basic_types::ObjectVariable;
    use crate::basic_types::Value;

    fn network_with(variables: &[(&str, Domain)]) -> ConstraintNetwork {
        let mut network = ConstraintNetwork::default();
        network.declare_variables(
            variables
                .iter()
                .map(|(name, domain)| ((*name).into(), domain.clone())),
        );
        network
    }

    #[test]
    fn mixed_batches_touch_both_networks() {
        let mut network = network_with(&[("x", Domain::interval(1, 9))]);

        network
            .propagate_constraints(
                vec![
                    Constraint::DomainValueLeq("x".into(), Value::Int(5)),
                    Constraint::temporal("a", "b", ObjectVariable::from("x"), false),
                ],
                false,
            )
            .unwrap();

        assert_eq!(network.domain("x"), &Domain::interval(1, 5));
        assert_eq!(network.timepoints_minimal_distance("a", "b"), Some(5));
    }

    #[test]
    fn failed_batches_leave_no_trace_in_either_network() {
        let mut network = network_with(&[
            ("x", Domain::discrete([1, 2, 3])),
            ("y", Domain::discrete([5, 6])),
        ]);

        let result = network.propagate_constraints(
            vec![
                Constraint::temporal("a", "b", 3, false),
                Constraint::Unification("x".into(), "y".into()),
            ],
            false,
        );

        assert!(matches!(result, Err(Inconsistency::EmptyDomain(_))));
        assert_eq!(network.domain("x"), &Domain::discrete([1, 2, 3]));
        assert_eq!(network.domain("y"), &Domain::discrete([5, 6]));
        assert_eq!(network.timepoints_minimal_distance("a", "b"), None);
        assert_eq!(network.temporal().size(), 0);
    }

    #[test]
    fn probing_restores_the_state_on_success() {
        let mut network = network_with(&[("x", Domain::interval(1, 9))]);

        network
            .propagate_constraints(
                vec![Constraint::DomainValueLeq("x".into(), Value::Int(5))],
                true,
            )
            .unwrap();

        assert_eq!(network.domain("x"), &Domain::interval(1, 9));
    }

    #[test]
    fn symmetric_duplicates_are_dropped() {
        let mut network = network_with(&[
            ("x", Domain::interval(1, 5)),
            ("y", Domain::interval(3, 9)),
        ]);

        network
            .propagate_constraints(
                vec![
                    Constraint::Unification("x".into(), "y".into()),
                    Constraint::Unification("y".into(), "x".into()),
                ],
                false,
            )
            .unwrap();

        assert_eq!(network.domain("x"), &Domain::interval(3, 5));
        assert_eq!(network.domain("y"), &Domain::interval(3, 5));
    }

    #[test]
    fn predicates_complement_each_other() {
        let mut network = network_with(&[
            ("x", Domain::interval(1, 5)),
            ("y", Domain::interval(3, 9)),
            ("u", Domain::interval(1, 5)),
            ("v", Domain::interval(1, 5)),
        ]);
        network
            .propagate_constraints(
                vec![
                    Constraint::Unification("x".into(), "y".into()),
                    Constraint::Separation("u".into(), "v".into()),
                ],
                false,
            )
            .unwrap();

        assert!(network.unified("x", "y"));
        assert!(!network.separable("x", "y"));
        assert!(network.unifiable("x", "y"));
        assert!(!network.separated("x", "y"));

        assert!(!network.unified("u", "v"));
        assert!(network.separable("u", "v"));
        assert!(!network.unifiable("u", "v"));
        assert!(network.separated("u", "v"));
    }

    #[test]
    fn zero_distance_in_both_directions_unifies_timepoints() {
        let mut network = ConstraintNetwork::default();
        network
            .propagate_constraints(
                vec![
                    Constraint::temporal("a", "b", 0, false),
                    Constraint::temporal("b", "a", 0, false),
                ],
                false,
            )
            .unwrap();

        assert!(network.timepoints_unified("a", "b"));
        assert!(network.timepoints_unified("a", "a"));
        assert!(!network.timepoints_unified("a", "c"));
    }

    #[test]
    fn clear_resets_networks_and_identifiers() {
        let mut network = network_with(&[("x", Domain::interval(1, 9))]);
        network
            .propagate_constraints(vec![Constraint::temporal("a", "b", 5, false)], false)
            .unwrap();

        network.clear();

        assert!(!network.binding().is_declared("x"));
        assert_eq!(network.temporal().size(), 0);
        assert_eq!(network.next_id(), 0);
    }
}
