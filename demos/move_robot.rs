//! A robot sits in the kitchen and a chronicle demands `loc(robot1) = office`.
//! A single `move` template carries the condition `loc(robot) = origin` at its
//! start and the effect `loc(robot) = destination` at its end. Checking one
//! `move` instance for applicability at `now` resolves which statement supports
//! which, unifies the instance arguments with the chronicle objects, and
//! schedules the instance between the initial state and the goal.
//!
//! Run with `RUST_LOG=trace` to follow the propagation.

use std::fmt;
use std::rc::Rc;

use chronet::basic_types::Constraint;
use chronet::basic_types::Domain;
use chronet::basic_types::IdGenerator;
use chronet::basic_types::ObjectVariable;
use chronet::basic_types::TimePoint;
use chronet::engine::ConstraintNetwork;
use chronet::planning::ActionMethod;
use chronet::planning::ActionMethodKind;
use chronet::planning::ActionMethodTemplate;
use chronet::planning::Assertion;

/// A persistence statement `state_variable(subject) = value` over `[start, end]`.
#[derive(Clone, Debug, PartialEq)]
struct Statement {
    state_variable: String,
    subject: ObjectVariable,
    value: ObjectVariable,
    start: TimePoint,
    end: TimePoint,
}

impl Assertion for Statement {
    fn start_timepoint(&self) -> &TimePoint {
        &self.start
    }

    fn propagate_causal_support_by(
        &self,
        supporter: &Self,
        network: &mut ConstraintNetwork,
        _revert_on_failure: bool,
        revert_on_success: bool,
    ) -> bool {
        if self.state_variable != supporter.state_variable {
            return false;
        }
        let constraints = vec![
            Constraint::Unification(self.subject.clone(), supporter.subject.clone()),
            Constraint::Unification(self.value.clone(), supporter.value.clone()),
            Constraint::temporal(supporter.end.clone(), self.start.clone(), 0, false),
            Constraint::temporal(self.start.clone(), supporter.end.clone(), 0, false),
        ];
        network
            .propagate_constraints(constraints, revert_on_success)
            .is_ok()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}({}) = {} over [{}, {}]",
            self.state_variable, self.subject, self.value, self.start, self.end
        )
    }
}

fn main() {
    env_logger::init();

    let mut network = ConstraintNetwork::default();
    network.declare_variables([
        // The instance arguments, each ranging over its full type.
        (
            ObjectVariable::from("rob"),
            Domain::discrete(["robot1", "robot2"]),
        ),
        (
            ObjectVariable::from("org"),
            Domain::discrete(["kitchen", "office", "lab"]),
        ),
        (
            ObjectVariable::from("dst"),
            Domain::discrete(["kitchen", "office", "lab"]),
        ),
        // The chronicle objects.
        (ObjectVariable::from("r1"), Domain::discrete(["robot1"])),
        (
            ObjectVariable::from("v_init"),
            Domain::discrete(["kitchen"]),
        ),
        (ObjectVariable::from("r1g"), Domain::discrete(["robot1"])),
        (
            ObjectVariable::from("v_goal"),
            Domain::discrete(["office"]),
        ),
    ]);

    // The initial state holds over `[t0, t1]`, starting strictly before `now`.
    let pins = vec![
        Constraint::temporal("now", "t0", -1, false),
        Constraint::temporal("t0", "now", 5, false),
        Constraint::temporal("t0", "t1", 5, false),
        Constraint::temporal("t1", "t0", 0, false),
    ];
    if network.propagate_constraints(pins, false).is_err() {
        println!("the chronicle timeline is inconsistent");
        return;
    }

    let chronicle = vec![
        Statement {
            state_variable: "loc".to_owned(),
            subject: "r1".into(),
            value: "v_init".into(),
            start: "t0".into(),
            end: "t1".into(),
        },
        Statement {
            state_variable: "loc".to_owned(),
            subject: "r1g".into(),
            value: "v_goal".into(),
            start: "tg".into(),
            end: "tg".into(),
        },
    ];
    let goal = chronicle[1].clone();

    println!("chronicle:");
    for statement in &chronicle {
        println!("  {statement}");
    }

    let template = Rc::new(ActionMethodTemplate::new(
        ActionMethodKind::Action,
        "move",
        vec![
            ("robot".to_owned(), "all_robots".into()),
            ("origin".to_owned(), "all_locations".into()),
            ("destination".to_owned(), "all_locations".into()),
        ],
        Box::new(|start, end, arguments| {
            vec![
                Statement {
                    state_variable: "loc".to_owned(),
                    subject: arguments["robot"].clone(),
                    value: arguments["origin"].clone(),
                    start: start.clone(),
                    end: start.clone(),
                },
                Statement {
                    state_variable: "loc".to_owned(),
                    subject: arguments["robot"].clone(),
                    value: arguments["destination"].clone(),
                    start: end.clone(),
                    end: end.clone(),
                },
            ]
        }),
        Box::new(|start, end, _arguments| {
            // A move takes at least one time unit.
            vec![Constraint::temporal(end.clone(), start.clone(), -1, false)]
        }),
    ));

    let mut ids = IdGenerator::default();
    let instance = ActionMethod::new(
        template,
        vec![
            ("robot".to_owned(), "rob".into()),
            ("origin".to_owned(), "org".into()),
            ("destination".to_owned(), "dst".into()),
        ],
        None,
        None,
        None,
        &mut ids,
    );
    println!(
        "instance:  {} over [{}, {}]",
        instance.name(),
        instance.start(),
        instance.end()
    );

    let Some(support_pairs) = instance.propagate_applicability(
        &TimePoint::from("now"),
        &mut network,
        &chronicle,
        true,
        false,
        Some(&goal),
    ) else {
        println!("`{}` is not applicable at `now`", instance.name());
        return;
    };

    println!("support resolved at `now`:");
    for (supporter, supported) in &support_pairs {
        println!("  [{supporter}]  supports  [{supported}]");
    }

    println!("narrowed arguments:");
    for (parameter, variable) in instance.arguments() {
        match network.domain(variable.as_str()).singleton_value() {
            Some(value) => println!("  {parameter} = {value}"),
            None => println!("  {parameter} = {:?}", network.domain(variable.as_str())),
        }
    }

    match network.timepoints_minimal_distance(instance.end().as_str(), "now") {
        Some(distance) => println!(
            "`{}` completes at least {} time unit(s) after `now`",
            instance.name(),
            -distance
        ),
        None => println!("the completion time of `{}` is unconstrained", instance.name()),
    }
}
