use std::fmt;
use std::rc::Rc;

use log::debug;

use super::assertion::Assertion;
use crate::basic_types::Constraint;
use crate::basic_types::IdGenerator;
use crate::basic_types::ObjectVariable;
use crate::basic_types::TimePoint;
use crate::chronet_assert_simple;
use crate::containers::HashMap;
use crate::engine::ConstraintNetwork;

/// Whether a template describes a primitive action or a decomposition method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionMethodKind {
    Action,
    Method,
}

/// Generates the assertions of one instance from its start, end, and arguments.
pub type AssertionGenerator<A> =
    Box<dyn Fn(&TimePoint, &TimePoint, &HashMap<String, ObjectVariable>) -> Vec<A>>;

/// Generates the constraints of one instance from its start, end, and arguments.
pub type ConstraintGenerator =
    Box<dyn Fn(&TimePoint, &TimePoint, &HashMap<String, ObjectVariable>) -> Vec<Constraint>>;

/// A parameterized action or method description.
///
/// A template carries no network state. Its assertions and constraints are produced
/// on instantiation, once the start, end, and argument variables of the instance are
/// known.
pub struct ActionMethodTemplate<A> {
    kind: ActionMethodKind,
    name: String,
    parameters: Vec<(String, ObjectVariable)>,
    assertion_generator: AssertionGenerator<A>,
    constraint_generator: ConstraintGenerator,
}

impl<A> ActionMethodTemplate<A> {
    pub fn new(
        kind: ActionMethodKind,
        name: impl Into<String>,
        parameters: Vec<(String, ObjectVariable)>,
        assertion_generator: AssertionGenerator<A>,
        constraint_generator: ConstraintGenerator,
    ) -> ActionMethodTemplate<A> {
        ActionMethodTemplate {
            kind,
            name: name.into(),
            parameters,
            assertion_generator,
            constraint_generator,
        }
    }

    pub fn kind(&self) -> ActionMethodKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The formal parameter names, each paired with the object variable holding that
    /// parameter's full domain. An instantiation must bind every name to an argument
    /// variable.
    pub fn parameters(&self) -> &[(String, ObjectVariable)] {
        &self.parameters
    }
}

impl<A> fmt::Debug for ActionMethodTemplate<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActionMethodTemplate")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// One instantiation of an [`ActionMethodTemplate`].
///
/// Instantiation draws a fresh identifier `k` and, unless the caller overrides them,
/// names the instance `<template>_<k>` and its start and end time points
/// `__ts_act_<k>` and `__te_act_<k>`. The assertions and constraints are generated
/// once at construction; nothing is propagated until
/// [`ActionMethod::propagate_applicability`] is called.
#[derive(Clone, Debug)]
pub struct ActionMethod<A> {
    template: Rc<ActionMethodTemplate<A>>,
    name: String,
    arguments: Vec<(String, ObjectVariable)>,
    start: TimePoint,
    end: TimePoint,
    assertions: Vec<A>,
    constraints: Vec<Constraint>,
}

impl<A> ActionMethod<A> {
    pub fn new(
        template: Rc<ActionMethodTemplate<A>>,
        arguments: impl IntoIterator<Item = (String, ObjectVariable)>,
        name: Option<String>,
        start: Option<TimePoint>,
        end: Option<TimePoint>,
        ids: &mut IdGenerator,
    ) -> ActionMethod<A> {
        let arguments: Vec<(String, ObjectVariable)> = arguments.into_iter().collect();
        let bindings: HashMap<String, ObjectVariable> = arguments.iter().cloned().collect();
        chronet_assert_simple!(
            template
                .parameters()
                .iter()
                .all(|(parameter, _)| bindings.contains_key(parameter.as_str())),
            "instantiation of `{}` does not bind every template parameter",
            template.name()
        );

        let identifier = ids.next_id();
        let name = name.unwrap_or_else(|| format!("{}_{identifier}", template.name()));
        let start = start.unwrap_or_else(|| TimePoint::from(format!("__ts_act_{identifier}")));
        let end = end.unwrap_or_else(|| TimePoint::from(format!("__te_act_{identifier}")));
        let assertions = (template.assertion_generator)(&start, &end, &bindings);
        let constraints = (template.constraint_generator)(&start, &end, &bindings);

        ActionMethod {
            template,
            name,
            arguments,
            start,
            end,
            assertions,
            constraints,
        }
    }

    pub fn kind(&self) -> ActionMethodKind {
        self.template.kind()
    }

    pub fn template(&self) -> &ActionMethodTemplate<A> {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument variable bound to each template parameter, in binding order.
    pub fn arguments(&self) -> &[(String, ObjectVariable)] {
        &self.arguments
    }

    pub fn start(&self) -> &TimePoint {
        &self.start
    }

    pub fn end(&self) -> &TimePoint {
        &self.end
    }

    pub fn assertions(&self) -> &[A] {
        &self.assertions
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl<A: Assertion> ActionMethod<A> {
    /// Checks whether the instance is applicable at `at_time` against a chronicle,
    /// propagating everything applicability requires.
    ///
    /// Three stages run against `network`: the instance's own constraints, the pinning
    /// of the instance's start to `at_time`, and causal-support resolution between the
    /// instance's assertions and the chronicle's. Support is resolved greedily: for
    /// each instance assertion, each chronicle assertion is first offered support by
    /// the instance assertion; failing that, and as long as the instance assertion
    /// starts with the instance and is not yet supported itself, the chronicle
    /// assertion is tried as its supporter. Assertions starting with the instance must
    /// end up in at least one support pair in either direction; later-starting
    /// assertions, such as effects, are exempt.
    ///
    /// When `assertion_to_support` is given, the instance must additionally end up
    /// supporting that chronicle assertion.
    ///
    /// Returns the committed `(supporter, supported)` pairs, or `None` when the
    /// instance is not applicable. The network state honors `revert_on_failure` and
    /// `revert_on_success`; the checkpoint spans all three stages, so a revert rewinds
    /// the whole attempt.
    pub fn propagate_applicability(
        &self,
        at_time: &TimePoint,
        network: &mut ConstraintNetwork,
        chronicle: &[A],
        revert_on_failure: bool,
        revert_on_success: bool,
        assertion_to_support: Option<&A>,
    ) -> Option<Vec<(A, A)>> {
        let checkpoint = network.clone();

        if network
            .propagate_constraints(self.constraints.clone(), false)
            .is_err()
        {
            debug!("instance `{}` has inconsistent constraints", self.name);
            if revert_on_failure {
                *network = checkpoint;
            }
            return None;
        }

        let pin_start = vec![
            Constraint::temporal(at_time.clone(), self.start.clone(), 0, false),
            Constraint::temporal(self.start.clone(), at_time.clone(), 0, false),
        ];
        if network.propagate_constraints(pin_start, false).is_err() {
            debug!("instance `{}` cannot start at `{at_time}`", self.name);
            if revert_on_failure {
                *network = checkpoint;
            }
            return None;
        }

        let mut support_pairs: Vec<(A, A)> = Vec::new();
        let mut target_supported = assertion_to_support.is_none();

        for instance_assertion in &self.assertions {
            let mut supported = false;
            let mut supports_someone = false;

            for chronicle_assertion in chronicle {
                if chronicle_assertion == instance_assertion {
                    continue;
                }
                if chronicle_assertion.propagate_causal_support_by(
                    instance_assertion,
                    network,
                    true,
                    false,
                ) {
                    support_pairs.push((instance_assertion.clone(), chronicle_assertion.clone()));
                    supports_someone = true;
                    if assertion_to_support == Some(chronicle_assertion) {
                        target_supported = true;
                    }
                } else if !supported
                    && network.timepoints_unified(
                        instance_assertion.start_timepoint().as_str(),
                        self.start.as_str(),
                    )
                    && instance_assertion.propagate_causal_support_by(
                        chronicle_assertion,
                        network,
                        true,
                        false,
                    )
                {
                    support_pairs.push((chronicle_assertion.clone(), instance_assertion.clone()));
                    supported = true;
                }
            }

            let starts_with_instance = network.timepoints_unified(
                instance_assertion.start_timepoint().as_str(),
                self.start.as_str(),
            );
            if starts_with_instance && !supported && !supports_someone {
                debug!(
                    "instance `{}` has an assertion at its start with no support",
                    self.name
                );
                if revert_on_failure {
                    *network = checkpoint;
                }
                return None;
            }
        }

        if !target_supported {
            debug!(
                "instance `{}` does not support the requested assertion",
                self.name
            );
            if revert_on_failure {
                *network = checkpoint;
            }
            return None;
        }

        if revert_on_success {
            *network = checkpoint;
        }
        Some(support_pairs)
    }
}
