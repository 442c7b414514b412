//! Value, domain, constraint and status types shared by the networks.
mod constraint;
mod domain;
mod id_generator;
mod inconsistency;
mod value;
mod variables;

pub use constraint::Constraint;
pub use constraint::GeneralRelation;
pub use constraint::TemporalBound;
pub use constraint::TemporalConstraint;
pub use domain::Domain;
pub use id_generator::IdGenerator;
pub use inconsistency::Inconsistency;
pub use inconsistency::PropagationStatus;
pub use value::Value;
pub use variables::ObjectVariable;
pub use variables::TimePoint;
