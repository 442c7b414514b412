use std::fmt;

/// A single value an object variable can take.
///
/// Values are totally ordered: integers first (by magnitude), then symbols
/// (lexicographically), then [`Value::Unknown`]. Bound restrictions on domains compare
/// under this order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Int(i64),
    Symbol(String),
    /// Sentinel for a value that exists but is not yet determined. A domain containing
    /// it can never be reported unifiable with another domain.
    Unknown,
}

impl Value {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// The numeric content of the value, if it is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(int) => Some(*int),
            Value::Symbol(_) | Value::Unknown => None,
        }
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Value {
        Value::Int(int)
    }
}

impl From<&str> for Value {
    fn from(symbol: &str) -> Value {
        Value::Symbol(symbol.to_owned())
    }
}

impl From<String> for Value {
    fn from(symbol: String) -> Value {
        Value::Symbol(symbol)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(int) => write!(f, "{int}"),
            Value::Symbol(symbol) => write!(f, "{symbol}"),
            Value::Unknown => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn integers_order_before_symbols_before_unknown() {
        assert!(Value::Int(i64::MAX) < Value::Symbol(String::from("a")));
        assert!(Value::Symbol(String::from("zzz")) < Value::Unknown);
        assert!(Value::Int(-3) < Value::Int(2));
    }

    #[test]
    fn display_uses_bare_value_text() {
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::from("table").to_string(), "table");
        assert_eq!(Value::Unknown.to_string(), "?");
    }
}
