use std::borrow::Borrow;
use std::fmt;

/// Name of an object variable.
///
/// Object variables are identified by name throughout the networks; the name is the
/// key into domains, unification classes, separation records and relation columns.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectVariable(String);

impl ObjectVariable {
    pub fn new(name: impl Into<String>) -> ObjectVariable {
        ObjectVariable(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ObjectVariable {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectVariable {
    fn from(name: &str) -> ObjectVariable {
        ObjectVariable(name.to_owned())
    }
}

impl From<String> for ObjectVariable {
    fn from(name: String) -> ObjectVariable {
        ObjectVariable(name)
    }
}

impl fmt::Display for ObjectVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a time point.
///
/// A time point has no domain of its own; its metric position exists only relative to
/// other time points through temporal edges.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint(String);

impl TimePoint {
    pub fn new(name: impl Into<String>) -> TimePoint {
        TimePoint(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TimePoint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TimePoint {
    fn from(name: &str) -> TimePoint {
        TimePoint(name.to_owned())
    }
}

impl From<String> for TimePoint {
    fn from(name: String) -> TimePoint {
        TimePoint(name)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
