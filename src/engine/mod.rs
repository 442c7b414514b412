//! The constraint networks and the façade that couples them.

mod binding_network;
mod constraint_network;
mod temporal_network;

pub use binding_network::BindingNetwork;
pub use constraint_network::ConstraintNetwork;
pub use temporal_network::TemporalNetwork;
