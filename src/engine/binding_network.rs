use std::collections::VecDeque;

use itertools::Itertools;
use log::trace;

use crate::basic_types::Domain;
use crate::basic_types::Inconsistency;
use crate::basic_types::ObjectVariable;
use crate::basic_types::PropagationStatus;
use crate::basic_types::Value;
use crate::chronet_assert_moderate;
use crate::chronet_assert_simple;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::UnionFind;

/// A primitive worklist event of the binding network.
///
/// The constraint network façade lowers [`crate::basic_types::Constraint`] values into
/// these; propagation re-enqueues them when a narrowing touches a recorded constraint.
#[derive(Clone, Debug)]
pub(crate) enum BindingEvent {
    /// Merge the classes of the two variables and narrow the first domain by the
    /// second. Symmetric constraints arrive as two mirrored events.
    Unify(ObjectVariable, ObjectVariable),
    /// Narrow the variable's domain by the union of the alternatives' domains.
    DisjunctiveUnify(ObjectVariable, Vec<ObjectVariable>),
    /// Record the separation and, when the partner is a singleton, remove its value
    /// from the first variable's domain.
    Separate(ObjectVariable, ObjectVariable),
    /// Append rows to the named table, drop unsupported rows, re-project all columns.
    Relation {
        name: String,
        parameters: Vec<ObjectVariable>,
        rows: Vec<Vec<Value>>,
    },
    RestrictUpper {
        variable: ObjectVariable,
        bound: Value,
        strict: bool,
    },
    RestrictLower {
        variable: ObjectVariable,
        bound: Value,
        strict: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RelationTable {
    parameters: Vec<ObjectVariable>,
    rows: Vec<Vec<Value>>,
}

#[derive(Clone, Debug, Default)]
struct BindingState {
    domains: HashMap<ObjectVariable, Domain>,
    unifications: UnionFind<ObjectVariable>,
    disjunctive_unifications: HashMap<ObjectVariable, HashSet<ObjectVariable>>,
    separations: HashMap<ObjectVariable, HashSet<ObjectVariable>>,
    relations: HashMap<String, RelationTable>,
}

/// A domain narrowing plus what must not be re-enqueued in response to it.
#[derive(Debug)]
struct Narrowing {
    variable: ObjectVariable,
    skip_partner: Option<ObjectVariable>,
    skip_relation: Option<String>,
}

impl Narrowing {
    fn plain(variable: ObjectVariable) -> Narrowing {
        Narrowing {
            variable,
            skip_partner: None,
            skip_relation: None,
        }
    }

    fn from_partner(variable: ObjectVariable, partner: ObjectVariable) -> Narrowing {
        Narrowing {
            variable,
            skip_partner: Some(partner),
            skip_relation: None,
        }
    }

    fn from_relation(variable: ObjectVariable, relation: String) -> Narrowing {
        Narrowing {
            variable,
            skip_partner: None,
            skip_relation: Some(relation),
        }
    }
}

/// The binding constraint network.
///
/// Owns every object-variable domain together with the unification classes,
/// disjunctive-unification records, separation adjacency and general relation tables
/// constraining them. Propagation is worklist arc consistency: an event narrows a
/// domain, the narrowing re-enqueues every recorded constraint mentioning the changed
/// variable, until the worklist drains or a domain empties.
#[derive(Clone, Debug, Default)]
pub struct BindingNetwork {
    current: BindingState,
    saved: BindingState,
}

impl BindingNetwork {
    /// Declares variables with their initial domains. Re-declaring a variable
    /// overwrites its domain.
    pub fn declare_variables(
        &mut self,
        variables: impl IntoIterator<Item = (ObjectVariable, Domain)>,
    ) {
        for (variable, domain) in variables {
            let _ = self.current.domains.insert(variable, domain);
        }
    }

    /// The current domain of a declared variable.
    ///
    /// # Panics
    ///
    /// When the variable was never declared.
    pub fn domain(&self, variable: &str) -> &Domain {
        self.current
            .domains
            .get(variable)
            .unwrap_or_else(|| panic!("object variable `{variable}` was never declared"))
    }

    pub fn is_declared(&self, variable: &str) -> bool {
        self.current.domains.contains_key(variable)
    }

    /// The number of declared variables, helper variables included.
    pub fn size(&self) -> usize {
        self.current.domains.len()
    }

    /// All declared variables, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = &ObjectVariable> {
        self.current.domains.keys()
    }

    /// Overwrites the single snapshot slot with the current state.
    pub fn backup(&mut self) {
        self.saved = self.current.clone();
    }

    /// Rewinds the current state to the snapshot. The snapshot itself stays in place,
    /// so restoring twice is the same as restoring once.
    pub fn restore(&mut self) {
        self.current = self.saved.clone();
    }

    /// Resets the network, snapshot slot included, to empty.
    pub fn clear(&mut self) {
        *self = BindingNetwork::default();
    }

    /// Runs the worklist to its fixpoint. On failure the state is left as it was at
    /// the failing event; the caller owns snapshotting and rollback.
    pub(crate) fn propagate(&mut self, events: Vec<BindingEvent>) -> PropagationStatus {
        let mut worklist: VecDeque<BindingEvent> = events.into();
        while let Some(event) = worklist.pop_front() {
            trace!("binding event {event:?}");
            for narrowing in self.apply(event)? {
                self.enqueue_consequences(&narrowing, &mut worklist);
            }
        }
        Ok(())
    }

    fn apply(&mut self, event: BindingEvent) -> Result<Vec<Narrowing>, Inconsistency> {
        match event {
            BindingEvent::Unify(variable, partner) => self.apply_unification(variable, partner),
            BindingEvent::DisjunctiveUnify(variable, alternatives) => {
                self.apply_disjunctive_unification(variable, alternatives)
            }
            BindingEvent::Separate(variable, partner) => self.apply_separation(variable, partner),
            BindingEvent::Relation {
                name,
                parameters,
                rows,
            } => self.apply_relation(name, parameters, rows),
            BindingEvent::RestrictUpper {
                variable,
                bound,
                strict,
            } => {
                let changed = self.domain_mut(&variable).restrict_upper(&bound, strict);
                self.ensure_nonempty(&variable)?;
                Ok(changed.then(|| Narrowing::plain(variable)).into_iter().collect())
            }
            BindingEvent::RestrictLower {
                variable,
                bound,
                strict,
            } => {
                let changed = self.domain_mut(&variable).restrict_lower(&bound, strict);
                self.ensure_nonempty(&variable)?;
                Ok(changed.then(|| Narrowing::plain(variable)).into_iter().collect())
            }
        }
    }

    fn apply_unification(
        &mut self,
        variable: ObjectVariable,
        partner: ObjectVariable,
    ) -> Result<Vec<Narrowing>, Inconsistency> {
        if self.directly_separated(&variable, &partner) {
            return Err(Inconsistency::UnifyingSeparated(variable, partner));
        }
        self.current.unifications.union(&variable, &partner);
        let partner_domain = self.domain(partner.as_str()).clone();
        let changed = self.domain_mut(&variable).intersect_with(&partner_domain);
        self.ensure_nonempty(&variable)?;
        Ok(changed
            .then(|| Narrowing::from_partner(variable, partner))
            .into_iter()
            .collect())
    }

    fn apply_disjunctive_unification(
        &mut self,
        variable: ObjectVariable,
        alternatives: Vec<ObjectVariable>,
    ) -> Result<Vec<Narrowing>, Inconsistency> {
        let record = self
            .current
            .disjunctive_unifications
            .entry(variable.clone())
            .or_default();
        record.extend(alternatives.iter().cloned());

        let mut union = Domain::empty();
        for alternative in &alternatives {
            let _ = union.union_with(self.domain(alternative.as_str()));
        }
        let changed = self.domain_mut(&variable).intersect_with(&union);
        self.ensure_nonempty(&variable)?;
        Ok(changed.then(|| Narrowing::plain(variable)).into_iter().collect())
    }

    fn apply_separation(
        &mut self,
        variable: ObjectVariable,
        partner: ObjectVariable,
    ) -> Result<Vec<Narrowing>, Inconsistency> {
        if variable == partner
            || self.current.unifications.same_set(&variable, &partner)
            || self.identically_bound(&variable, &partner)
        {
            return Err(Inconsistency::SeparatingUnified(variable, partner));
        }
        let _ = self
            .current
            .separations
            .entry(variable.clone())
            .or_default()
            .insert(partner.clone());

        let mut narrowings = Vec::new();
        if let Some(singleton) = self.domain(partner.as_str()).singleton_value() {
            let changed = self.domain_mut(&variable).remove(&singleton);
            self.ensure_nonempty(&variable)?;
            if changed {
                narrowings.push(Narrowing::from_partner(variable, partner));
            }
        }
        Ok(narrowings)
    }

    fn apply_relation(
        &mut self,
        name: String,
        parameters: Vec<ObjectVariable>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Vec<Narrowing>, Inconsistency> {
        let BindingState {
            domains, relations, ..
        } = &mut self.current;
        let table = relations.entry(name.clone()).or_insert_with(|| RelationTable {
            parameters: parameters.clone(),
            rows: Vec::new(),
        });
        chronet_assert_moderate!(
            table.parameters == parameters,
            "relation `{name}` was submitted with a different parameter list"
        );
        chronet_assert_simple!(
            rows.iter().all(|row| row.len() == table.parameters.len()),
            "relation `{name}` rows must match its arity"
        );

        let RelationTable {
            parameters: table_parameters,
            rows: table_rows,
        } = table;
        table_rows.extend(rows);
        table_rows.retain(|row| {
            row.iter()
                .zip(table_parameters.iter())
                .all(|(value, parameter)| declared_domain(domains, parameter).contains(value))
        });

        let projections: Vec<(ObjectVariable, Domain)> = table_parameters
            .iter()
            .enumerate()
            .map(|(column, parameter)| {
                let projection =
                    Domain::discrete(table_rows.iter().map(|row| row[column].clone()));
                (parameter.clone(), projection)
            })
            .collect();

        let mut narrowings = Vec::new();
        for (parameter, projection) in projections {
            let changed = self.domain_mut(&parameter).intersect_with(&projection);
            self.ensure_nonempty(&parameter)?;
            if changed {
                narrowings.push(Narrowing::from_relation(parameter, name.clone()));
            }
        }
        Ok(narrowings)
    }

    /// Re-enqueues every recorded constraint that mentions the narrowed variable: its
    /// unification class, disjunctive-unification records naming it, its separation
    /// partners and relations over it. The event that caused the narrowing is skipped.
    fn enqueue_consequences(&self, narrowing: &Narrowing, worklist: &mut VecDeque<BindingEvent>) {
        let variable = &narrowing.variable;
        for member in self.current.unifications.set_of(variable) {
            if member == variable || Some(member) == narrowing.skip_partner.as_ref() {
                continue;
            }
            worklist.push_back(BindingEvent::Unify(member.clone(), variable.clone()));
            worklist.push_back(BindingEvent::Unify(variable.clone(), member.clone()));
        }
        for (owner, alternatives) in &self.current.disjunctive_unifications {
            if owner == variable || alternatives.contains(variable) {
                worklist.push_back(BindingEvent::DisjunctiveUnify(
                    owner.clone(),
                    alternatives.iter().cloned().collect(),
                ));
            }
        }
        if let Some(partners) = self.current.separations.get(variable) {
            for partner in partners {
                if Some(partner) == narrowing.skip_partner.as_ref() {
                    continue;
                }
                worklist.push_back(BindingEvent::Separate(partner.clone(), variable.clone()));
                worklist.push_back(BindingEvent::Separate(variable.clone(), partner.clone()));
            }
        }
        for (name, table) in &self.current.relations {
            if Some(name) == narrowing.skip_relation.as_ref()
                || !table.parameters.contains(variable)
            {
                continue;
            }
            worklist.push_back(BindingEvent::Relation {
                name: name.clone(),
                parameters: table.parameters.clone(),
                rows: Vec::new(),
            });
        }
    }

    pub(crate) fn unified(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        let left = ObjectVariable::from(a);
        let right = ObjectVariable::from(b);
        self.current.unifications.same_set(&left, &right) || self.identically_bound(&left, &right)
    }

    pub(crate) fn unifiable(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        let left = ObjectVariable::from(a);
        let right = ObjectVariable::from(b);
        if self.directly_separated(&left, &right) {
            return false;
        }
        if !self.domain(a).intersects(self.domain(b)) {
            return false;
        }
        if self.domain(a).contains_unknown() || self.domain(b).contains_unknown() {
            return false;
        }
        // A separation anywhere across the two unification classes rules the pair out.
        let separated_members = self
            .current
            .unifications
            .set_of(&left)
            .cartesian_product(self.current.unifications.set_of(&right))
            .any(|(member_a, member_b)| self.directly_separated(member_a, member_b));
        !separated_members
    }

    fn directly_separated(&self, a: &ObjectVariable, b: &ObjectVariable) -> bool {
        self.current
            .separations
            .get(a)
            .is_some_and(|partners| partners.contains(b))
            || self
                .current
                .separations
                .get(b)
                .is_some_and(|partners| partners.contains(a))
    }

    fn identically_bound(&self, a: &ObjectVariable, b: &ObjectVariable) -> bool {
        match (
            self.domain(a.as_str()).singleton_value(),
            self.domain(b.as_str()).singleton_value(),
        ) {
            (Some(left), Some(right)) => left == right && !left.is_unknown(),
            _ => false,
        }
    }

    fn domain_mut(&mut self, variable: &ObjectVariable) -> &mut Domain {
        self.current
            .domains
            .get_mut(variable)
            .unwrap_or_else(|| panic!("object variable `{variable}` was never declared"))
    }

    fn ensure_nonempty(&self, variable: &ObjectVariable) -> PropagationStatus {
        if self.domain(variable.as_str()).is_empty() {
            Err(Inconsistency::EmptyDomain(variable.clone()))
        } else {
            Ok(())
        }
    }
}

fn declared_domain<'a>(
    domains: &'a HashMap<ObjectVariable, Domain>,
    variable: &ObjectVariable,
) -> &'a Domain {
    domains
        .get(variable)
        .unwrap_or_else(|| panic!("object variable `{variable}` was never declared"))
}

#[cfg(test)]
mod tests {
    use super::BindingEvent;
    use super::BindingNetwork;
    use crate::basic_types::Domain;
    use crate::basic_types::Inconsistency;
    use crate::basic_types::ObjectVariable;
    use crate::basic_types::Value;

    fn network(variables: &[(&str, Domain)]) -> BindingNetwork {
        let mut network = BindingNetwork::default();
        network.declare_variables(
            variables
                .iter()
                .map(|(name, domain)| (ObjectVariable::from(*name), domain.clone())),
        );
        network
    }

    fn unify(a: &str, b: &str) -> Vec<BindingEvent> {
        vec![
            BindingEvent::Unify(ObjectVariable::from(a), ObjectVariable::from(b)),
            BindingEvent::Unify(ObjectVariable::from(b), ObjectVariable::from(a)),
        ]
    }

    fn separate(a: &str, b: &str) -> Vec<BindingEvent> {
        vec![
            BindingEvent::Separate(ObjectVariable::from(a), ObjectVariable::from(b)),
            BindingEvent::Separate(ObjectVariable::from(b), ObjectVariable::from(a)),
        ]
    }

    #[test]
    fn unification_intersects_both_domains() {
        let mut network = network(&[
            ("x", Domain::discrete([1_i64, 2, 3])),
            ("y", Domain::discrete([2_i64, 3, 4])),
        ]);

        let result = network.propagate(unify("x", "y"));

        assert!(result.is_ok());
        assert_eq!(network.domain("x"), &Domain::discrete([2_i64, 3]));
        assert_eq!(network.domain("y"), &Domain::discrete([2_i64, 3]));
        assert!(network.unified("x", "y"));
    }

    #[test]
    fn bound_restriction_flows_through_the_unification_class() {
        let mut network = network(&[
            ("x", Domain::discrete([1_i64, 2, 3])),
            ("y", Domain::discrete([1_i64, 2, 3])),
            ("z", Domain::discrete([1_i64, 2, 3])),
        ]);
        network.propagate(unify("x", "y")).unwrap();
        network.propagate(unify("y", "z")).unwrap();

        let result = network.propagate(vec![BindingEvent::RestrictUpper {
            variable: ObjectVariable::from("x"),
            bound: Value::Int(1),
            strict: false,
        }]);

        assert!(result.is_ok());
        assert_eq!(network.domain("y"), &Domain::discrete([1_i64]));
        assert_eq!(network.domain("z"), &Domain::discrete([1_i64]));
    }

    #[test]
    fn unifying_separated_variables_fails() {
        let mut network = network(&[
            ("p", Domain::discrete([1_i64, 2])),
            ("q", Domain::discrete([1_i64, 2])),
        ]);
        network.propagate(separate("p", "q")).unwrap();

        let result = network.propagate(unify("p", "q"));

        assert_eq!(
            result,
            Err(Inconsistency::UnifyingSeparated(
                ObjectVariable::from("p"),
                ObjectVariable::from("q"),
            ))
        );
    }

    #[test]
    fn separating_unified_variables_fails() {
        let mut network = network(&[
            ("p", Domain::discrete([1_i64, 2])),
            ("q", Domain::discrete([1_i64, 2])),
        ]);
        network.propagate(unify("p", "q")).unwrap();

        let result = network.propagate(separate("p", "q"));

        assert!(matches!(result, Err(Inconsistency::SeparatingUnified(..))));
    }

    #[test]
    fn separating_identical_singletons_fails() {
        let mut network = network(&[
            ("p", Domain::singleton(7_i64)),
            ("q", Domain::interval(7, 7)),
        ]);

        let result = network.propagate(separate("p", "q"));

        assert!(matches!(result, Err(Inconsistency::SeparatingUnified(..))));
    }

    #[test]
    fn separation_removes_the_partner_singleton_value() {
        let mut network = network(&[
            ("x", Domain::discrete([1_i64, 2])),
            ("y", Domain::singleton(2_i64)),
        ]);

        let result = network.propagate(separate("x", "y"));

        assert!(result.is_ok());
        assert_eq!(network.domain("x"), &Domain::discrete([1_i64]));
        assert_eq!(network.domain("y"), &Domain::singleton(2_i64));
    }

    #[test]
    fn disjunctive_unification_narrows_to_the_alternative_union() {
        let mut network = network(&[
            ("v", Domain::interval(1, 9)),
            ("a", Domain::discrete([1_i64, 2])),
            ("b", Domain::discrete([5_i64])),
        ]);

        let result = network.propagate(vec![BindingEvent::DisjunctiveUnify(
            ObjectVariable::from("v"),
            vec![ObjectVariable::from("a"), ObjectVariable::from("b")],
        )]);

        assert!(result.is_ok());
        assert_eq!(network.domain("v"), &Domain::discrete([1_i64, 2, 5]));
    }

    #[test]
    fn relation_drops_unsupported_rows_and_projects_columns() {
        let mut network = network(&[
            ("p", Domain::discrete([1_i64, 2, 3])),
            ("q", Domain::discrete(["a", "b", "c"])),
        ]);

        let result = network.propagate(vec![BindingEvent::Relation {
            name: String::from("r"),
            parameters: vec![ObjectVariable::from("p"), ObjectVariable::from("q")],
            rows: vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::from("b")],
                vec![Value::Int(7), Value::from("c")],
            ],
        }]);

        assert!(result.is_ok());
        assert_eq!(network.domain("p"), &Domain::discrete([1_i64, 2]));
        assert_eq!(network.domain("q"), &Domain::discrete(["a", "b"]));
    }

    #[test]
    fn relation_reacts_to_later_domain_restrictions() {
        let mut network = network(&[
            ("p", Domain::discrete([1_i64, 2])),
            ("q", Domain::discrete(["a", "b"])),
        ]);
        network
            .propagate(vec![BindingEvent::Relation {
                name: String::from("r"),
                parameters: vec![ObjectVariable::from("p"), ObjectVariable::from("q")],
                rows: vec![
                    vec![Value::Int(1), Value::from("a")],
                    vec![Value::Int(2), Value::from("b")],
                ],
            }])
            .unwrap();

        let result = network.propagate(vec![BindingEvent::RestrictUpper {
            variable: ObjectVariable::from("p"),
            bound: Value::Int(1),
            strict: false,
        }]);

        assert!(result.is_ok());
        assert_eq!(network.domain("q"), &Domain::discrete(["a"]));
    }

    #[test]
    fn emptied_domain_fails_the_batch() {
        let mut network = network(&[("x", Domain::discrete([1_i64]))]);

        let result = network.propagate(vec![BindingEvent::RestrictUpper {
            variable: ObjectVariable::from("x"),
            bound: Value::Int(1),
            strict: true,
        }]);

        assert_eq!(
            result,
            Err(Inconsistency::EmptyDomain(ObjectVariable::from("x")))
        );
    }

    #[test]
    fn restore_rewinds_to_the_snapshot_and_is_idempotent() {
        let mut network = network(&[("x", Domain::discrete([1_i64, 2, 3]))]);
        network.backup();

        network
            .propagate(vec![BindingEvent::RestrictUpper {
                variable: ObjectVariable::from("x"),
                bound: Value::Int(2),
                strict: false,
            }])
            .unwrap();
        assert_eq!(network.domain("x"), &Domain::discrete([1_i64, 2]));

        network.restore();
        assert_eq!(network.domain("x"), &Domain::discrete([1_i64, 2, 3]));

        network.restore();
        assert_eq!(network.domain("x"), &Domain::discrete([1_i64, 2, 3]));
    }

    #[test]
    fn unifiable_is_blocked_by_cross_class_separations() {
        let mut network = network(&[
            ("a", Domain::discrete([1_i64, 2])),
            ("b", Domain::discrete([1_i64, 2])),
            ("c", Domain::discrete([1_i64, 2])),
            ("d", Domain::discrete([1_i64, 2])),
        ]);
        network.propagate(unify("a", "b")).unwrap();
        network.propagate(unify("c", "d")).unwrap();
        network.propagate(separate("b", "d")).unwrap();

        assert!(!network.unifiable("a", "c"));
        assert!(network.unifiable("a", "b"));
    }

    #[test]
    fn unknown_blocks_unifiability() {
        let network = network(&[
            ("u", Domain::discrete([Value::Int(1), Value::Unknown])),
            ("w", Domain::discrete([Value::Int(1)])),
        ]);

        assert!(!network.unifiable("u", "w"));
    }
}
