//! Action and method templates layered on top of the constraint networks.

mod action_method;
mod assertion;

pub use action_method::ActionMethod;
pub use action_method::ActionMethodKind;
pub use action_method::ActionMethodTemplate;
pub use action_method::AssertionGenerator;
pub use action_method::ConstraintGenerator;
pub use assertion::Assertion;
