use std::collections::BTreeSet;

use super::Value;

/// The set of values an object variable may still take.
///
/// A domain is either an explicit finite value set or an inclusive integer interval. A
/// domain holding exactly one known value denotes a bound variable. Mutating
/// operations report whether they changed the domain; a reported change is what
/// triggers re-enqueueing in the binding network worklist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    Discrete(BTreeSet<Value>),
    Interval { lower: i64, upper: i64 },
}

impl Domain {
    pub fn empty() -> Domain {
        Domain::Discrete(BTreeSet::new())
    }

    pub fn discrete<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Domain {
        Domain::Discrete(values.into_iter().map(Into::into).collect())
    }

    /// An inclusive integer interval; empty when `lower > upper`.
    pub fn interval(lower: i64, upper: i64) -> Domain {
        Domain::Interval { lower, upper }
    }

    pub fn singleton(value: impl Into<Value>) -> Domain {
        Domain::discrete([value.into()])
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Domain::Discrete(values) => values.is_empty(),
            Domain::Interval { lower, upper } => lower > upper,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Domain::Discrete(values) => values.len(),
            Domain::Interval { lower, upper } => {
                if lower > upper {
                    0
                } else {
                    let width = i128::from(*upper) - i128::from(*lower) + 1;
                    usize::try_from(width).unwrap_or(usize::MAX)
                }
            }
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Domain::Discrete(values) => values.contains(value),
            Domain::Interval { lower, upper } => value
                .as_int()
                .is_some_and(|int| *lower <= int && int <= *upper),
        }
    }

    pub fn contains_unknown(&self) -> bool {
        match self {
            Domain::Discrete(values) => values.contains(&Value::Unknown),
            Domain::Interval { .. } => false,
        }
    }

    /// The domain's only value, when it holds exactly one.
    pub fn singleton_value(&self) -> Option<Value> {
        match self {
            Domain::Discrete(values) => {
                if values.len() == 1 {
                    values.iter().next().cloned()
                } else {
                    None
                }
            }
            Domain::Interval { lower, upper } => {
                if lower == upper {
                    Some(Value::Int(*lower))
                } else {
                    None
                }
            }
        }
    }

    /// The greatest integer in the domain, if any.
    pub fn upper_bound(&self) -> Option<i64> {
        match self {
            Domain::Discrete(values) => values.iter().filter_map(Value::as_int).max(),
            Domain::Interval { lower, upper } => {
                if lower > upper {
                    None
                } else {
                    Some(*upper)
                }
            }
        }
    }

    pub fn intersects(&self, other: &Domain) -> bool {
        match (self, other) {
            (Domain::Discrete(values), _) => values.iter().any(|value| other.contains(value)),
            (Domain::Interval { .. }, Domain::Discrete(values)) => {
                values.iter().any(|value| self.contains(value))
            }
            (
                Domain::Interval { lower, upper },
                Domain::Interval {
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => {
                lower <= upper
                    && other_lower <= other_upper
                    && lower <= other_upper
                    && other_lower <= upper
            }
        }
    }

    /// Narrows this domain to its intersection with `other`. An interval intersected
    /// with a discrete set becomes discrete.
    pub fn intersect_with(&mut self, other: &Domain) -> bool {
        match (&mut *self, other) {
            (Domain::Discrete(values), _) => {
                let before = values.len();
                values.retain(|value| other.contains(value));
                values.len() != before
            }
            (Domain::Interval { .. }, Domain::Discrete(other_values)) => {
                let kept: BTreeSet<Value> = other_values
                    .iter()
                    .filter(|value| self.contains(value))
                    .cloned()
                    .collect();
                if kept.len() == self.size() {
                    false
                } else {
                    *self = Domain::Discrete(kept);
                    true
                }
            }
            (
                Domain::Interval { lower, upper },
                Domain::Interval {
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => {
                let mut changed = false;
                if other_lower > lower {
                    *lower = *other_lower;
                    changed = true;
                }
                if other_upper < upper {
                    *upper = *other_upper;
                    changed = true;
                }
                changed
            }
        }
    }

    /// Widens this domain to cover `other` as well. Discrete sides take exact unions;
    /// two intervals take their hull; a mixed pair materializes the interval into the
    /// discrete set, which is linear in the interval width.
    pub fn union_with(&mut self, other: &Domain) -> bool {
        if other.is_empty() {
            return false;
        }
        match (&mut *self, other) {
            (Domain::Discrete(values), Domain::Discrete(other_values)) => {
                let before = values.len();
                values.extend(other_values.iter().cloned());
                values.len() != before
            }
            (
                Domain::Discrete(values),
                Domain::Interval {
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => {
                let before = values.len();
                values.extend((*other_lower..=*other_upper).map(Value::Int));
                values.len() != before
            }
            (Domain::Interval { .. }, Domain::Discrete(other_values)) => {
                if other_values.iter().all(|value| self.contains(value)) {
                    return false;
                }
                let mut values = self.enumerate();
                values.extend(other_values.iter().cloned());
                *self = Domain::Discrete(values);
                true
            }
            (
                Domain::Interval { lower, upper },
                Domain::Interval {
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => {
                if *lower > *upper {
                    *lower = *other_lower;
                    *upper = *other_upper;
                    return true;
                }
                let mut changed = false;
                if other_lower < lower {
                    *lower = *other_lower;
                    changed = true;
                }
                if other_upper > upper {
                    *upper = *other_upper;
                    changed = true;
                }
                changed
            }
        }
    }

    /// Removes every value above `bound` (at or above it when `strict`).
    pub fn restrict_upper(&mut self, bound: &Value, strict: bool) -> bool {
        match self {
            Domain::Discrete(values) => {
                let before = values.len();
                values.retain(|value| if strict { value < bound } else { value <= bound });
                values.len() != before
            }
            Domain::Interval { lower: _, upper } => match bound.as_int() {
                Some(int) => {
                    let new_upper = if strict { int.saturating_sub(1) } else { int };
                    if new_upper < *upper {
                        *upper = new_upper;
                        true
                    } else {
                        false
                    }
                }
                // Integers order below symbols and unknown, so such a bound keeps
                // every interval value.
                None => false,
            },
        }
    }

    /// Removes every value below `bound` (at or below it when `strict`).
    pub fn restrict_lower(&mut self, bound: &Value, strict: bool) -> bool {
        match self {
            Domain::Discrete(values) => {
                let before = values.len();
                values.retain(|value| if strict { value > bound } else { value >= bound });
                values.len() != before
            }
            Domain::Interval { lower, upper } => match bound.as_int() {
                Some(int) => {
                    let new_lower = if strict { int.saturating_add(1) } else { int };
                    if new_lower > *lower {
                        *lower = new_lower;
                        true
                    } else {
                        false
                    }
                }
                // No interval value reaches a symbol or unknown bound.
                None => {
                    if *lower > *upper {
                        false
                    } else {
                        *self = Domain::empty();
                        true
                    }
                }
            },
        }
    }

    /// Removes a single value. On an interval only the end points can be trimmed; a
    /// strictly interior value is left in place.
    pub fn remove(&mut self, value: &Value) -> bool {
        match self {
            Domain::Discrete(values) => values.remove(value),
            Domain::Interval { lower, upper } => {
                if lower > upper {
                    return false;
                }
                match value.as_int() {
                    Some(int) if int == *lower => {
                        *lower = lower.saturating_add(1);
                        true
                    }
                    Some(int) if int == *upper => {
                        *upper = upper.saturating_sub(1);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Adds a single value. An interval grows in place for an adjacent integer and
    /// otherwise materializes into a discrete set.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        match self {
            Domain::Discrete(values) => values.insert(value),
            Domain::Interval { lower, upper } => {
                if lower > upper {
                    *self = Domain::Discrete([value].into_iter().collect());
                    return true;
                }
                match value.as_int() {
                    Some(int) if int.checked_add(1) == Some(*lower) => {
                        *lower = int;
                        true
                    }
                    Some(int) if int.checked_sub(1) == Some(*upper) => {
                        *upper = int;
                        true
                    }
                    _ => {
                        let mut values = self.enumerate();
                        let _ = values.insert(value);
                        *self = Domain::Discrete(values);
                        true
                    }
                }
            }
        }
    }

    fn enumerate(&self) -> BTreeSet<Value> {
        match self {
            Domain::Discrete(values) => values.clone(),
            Domain::Interval { lower, upper } => (*lower..=*upper).map(Value::Int).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Domain;
    use super::Value;

    #[test]
    fn discrete_intersection_drops_values_outside_the_other_domain() {
        let mut domain = Domain::discrete([1_i64, 2, 3]);
        let changed = domain.intersect_with(&Domain::discrete([2_i64, 3, 4]));

        assert!(changed);
        assert_eq!(domain, Domain::discrete([2_i64, 3]));
    }

    #[test]
    fn interval_intersected_with_discrete_becomes_discrete() {
        let mut domain = Domain::interval(1, 10);
        let changed = domain.intersect_with(&Domain::discrete([0_i64, 3, 7, 12]));

        assert!(changed);
        assert_eq!(domain, Domain::discrete([3_i64, 7]));
    }

    #[test]
    fn interval_intersection_tightens_both_bounds() {
        let mut domain = Domain::interval(0, 10);
        let changed = domain.intersect_with(&Domain::interval(3, 8));

        assert!(changed);
        assert_eq!(domain, Domain::interval(3, 8));
        assert!(!domain.intersect_with(&Domain::interval(0, 100)));
    }

    #[test]
    fn union_of_intervals_takes_the_hull() {
        let mut domain = Domain::interval(0, 2);
        let changed = domain.union_with(&Domain::interval(5, 7));

        assert!(changed);
        assert_eq!(domain, Domain::interval(0, 7));
    }

    #[test]
    fn union_with_interval_materializes_its_values() {
        let mut domain = Domain::discrete(["a"]);
        let changed = domain.union_with(&Domain::interval(1, 3));

        assert!(changed);
        assert!(domain.contains(&Value::Int(2)));
        assert!(domain.contains(&Value::from("a")));
        assert_eq!(domain.size(), 4);
    }

    #[test]
    fn restriction_honors_strictness() {
        let mut non_strict = Domain::discrete([1_i64, 2, 3]);
        let mut strict = Domain::discrete([1_i64, 2, 3]);

        assert!(non_strict.restrict_upper(&Value::Int(2), false));
        assert_eq!(non_strict, Domain::discrete([1_i64, 2]));

        assert!(strict.restrict_upper(&Value::Int(2), true));
        assert_eq!(strict, Domain::discrete([1_i64]));
    }

    #[test]
    fn interval_lower_restriction_by_symbol_empties_it() {
        let mut domain = Domain::interval(1, 5);
        let changed = domain.restrict_lower(&Value::from("a"), false);

        assert!(changed);
        assert!(domain.is_empty());
    }

    #[test]
    fn symbols_survive_lower_restriction_by_integer() {
        let mut domain = Domain::discrete([Value::Int(1), Value::from("a")]);
        let changed = domain.restrict_lower(&Value::Int(5), false);

        assert!(changed);
        assert_eq!(domain, Domain::discrete([Value::from("a")]));
    }

    #[test]
    fn removing_an_interior_interval_value_is_a_no_op() {
        let mut domain = Domain::interval(1, 5);

        assert!(!domain.remove(&Value::Int(3)));
        assert!(domain.remove(&Value::Int(1)));
        assert_eq!(domain, Domain::interval(2, 5));
    }

    #[test]
    fn singleton_value_is_representation_independent() {
        assert_eq!(
            Domain::interval(4, 4).singleton_value(),
            Some(Value::Int(4))
        );
        assert_eq!(
            Domain::singleton(4_i64).singleton_value(),
            Some(Value::Int(4))
        );
        assert_eq!(Domain::interval(4, 5).singleton_value(), None);
    }

    #[test]
    fn upper_bound_ignores_non_integers() {
        let domain = Domain::discrete([Value::Int(3), Value::from("z"), Value::Int(-1)]);
        assert_eq!(domain.upper_bound(), Some(3));
        assert_eq!(Domain::discrete(["z"]).upper_bound(), None);
        assert_eq!(Domain::interval(2, 9).upper_bound(), Some(9));
    }

    #[test]
    fn empty_domains_do_not_intersect_anything() {
        assert!(!Domain::empty().intersects(&Domain::interval(0, 10)));
        assert!(!Domain::interval(3, 2).intersects(&Domain::interval(0, 10)));
        assert!(Domain::interval(0, 3).intersects(&Domain::discrete([3_i64])));
    }

    #[test]
    fn unknown_is_tracked_only_in_discrete_domains() {
        assert!(Domain::discrete([Value::Unknown]).contains_unknown());
        assert!(!Domain::interval(0, 3).contains_unknown());
    }
}
