//! # Chronet
//! Chronet is a constraint propagation engine for chronicle-based temporal planning
//! and acting. It couples two networks behind one atomic propagation entry point:
//!
//! * a *binding constraint network* over object variables with discrete or interval
//!   domains, supporting unification, disjunctive unification, separation, general
//!   n-ary relations, and one-sided domain bounds;
//! * a *simple temporal network* over time points whose edge widths are themselves
//!   object variables, so that tightening a duration domain tightens the schedule and
//!   a new temporal edge can narrow a duration domain.
//!
//! Batches of constraints are propagated atomically: an inconsistent batch leaves
//! both networks exactly as they were, and a batch can be submitted as a pure
//! consistency probe. On top of the networks, the [`planning`] module instantiates
//! parameterized action and method templates and decides their applicability against
//! a chronicle through causal-support propagation.
//!
//! # Using Chronet
//! The first step is declaring object variables with their initial domains:
//! ```rust
//! # use chronet::basic_types::Domain;
//! # use chronet::engine::ConstraintNetwork;
//! let mut network = ConstraintNetwork::default();
//!
//! network.declare_variables([
//!     ("x".into(), Domain::discrete([1, 2, 3])),
//!     ("y".into(), Domain::interval(2, 9)),
//! ]);
//! ```
//!
//! Then constraints are propagated in atomic batches:
//! ```rust
//! # use chronet::basic_types::Constraint;
//! # use chronet::basic_types::Domain;
//! # use chronet::engine::ConstraintNetwork;
//! # let mut network = ConstraintNetwork::default();
//! # network.declare_variables([
//! #     ("x".into(), Domain::discrete([1, 2, 3])),
//! #     ("y".into(), Domain::interval(2, 9)),
//! # ]);
//! network
//!     .propagate_constraints(
//!         vec![
//!             Constraint::Unification("x".into(), "y".into()),
//!             Constraint::temporal("start", "end", 5, false),
//!             Constraint::temporal("end", "start", -2, false),
//!         ],
//!         false,
//!     )
//!     .expect("the batch is consistent");
//!
//! assert!(network.unified("x", "y"));
//! assert_eq!(network.domain("x"), &Domain::discrete([2, 3]));
//! assert_eq!(network.timepoints_minimal_distance("start", "end"), Some(5));
//! assert_eq!(network.timepoints_minimal_distance("end", "start"), Some(-2));
//! ```
//!
//! An inconsistent batch reports its cause and leaves no trace:
//! ```rust
//! # use chronet::basic_types::Constraint;
//! # use chronet::basic_types::Domain;
//! # use chronet::basic_types::Inconsistency;
//! # use chronet::engine::ConstraintNetwork;
//! # let mut network = ConstraintNetwork::default();
//! network.declare_variables([
//!     ("p".into(), Domain::discrete(["red"])),
//!     ("q".into(), Domain::discrete(["blue"])),
//! ]);
//!
//! let result = network.propagate_constraints(
//!     vec![Constraint::Unification("p".into(), "q".into())],
//!     false,
//! );
//!
//! assert!(matches!(result, Err(Inconsistency::EmptyDomain(_))));
//! assert_eq!(network.domain("p"), &Domain::discrete(["red"]));
//! ```
//!
//! ## Feature Flags
//! - `debug-checks`: Enable expensive internal assertions. Turning this on slows down
//!   propagation considerably, so it is turned off by default.
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod engine;
pub mod planning;
