use log::trace;

use super::binding_network::BindingEvent;
use super::binding_network::BindingNetwork;
use crate::basic_types::Domain;
use crate::basic_types::IdGenerator;
use crate::basic_types::Inconsistency;
use crate::basic_types::ObjectVariable;
use crate::basic_types::PropagationStatus;
use crate::basic_types::TemporalBound;
use crate::basic_types::TemporalConstraint;
use crate::basic_types::TimePoint;
use crate::basic_types::Value;
use crate::chronet_assert_simple;
use crate::containers::HashMap;
use crate::containers::HashSet;

const INFINITY: i64 = i64::MAX;

#[derive(Clone, Debug, Default)]
struct TemporalState {
    /// Controllability flag per known time point. Tracked for every point an edge
    /// names, always `true` for now, never exploited.
    controllable: HashMap<TimePoint, bool>,
    /// Accumulated bounds per ordered time-point pair. The effective weight of a pair
    /// is the minimum over its bounds.
    edges: HashMap<(TimePoint, TimePoint), HashSet<(ObjectVariable, bool)>>,
    /// Ordered pairs whose edges a bound variable participates in.
    involvements: HashMap<ObjectVariable, HashSet<(TimePoint, TimePoint)>>,
    /// Tightest known pairwise distances; unbounded pairs are absent.
    minimal: HashMap<(TimePoint, TimePoint), i64>,
}

/// The simple temporal network.
///
/// Records directed distance edges `to - from <= bound` (`<` when strict) between time
/// points. Every bound is an object variable of the binding network; constant bounds
/// are materialized as fresh singleton-domain helper variables named `_hcov_<k>`.
/// After each batch the minimal network is recomputed by Floyd-Warshall closure over
/// the current effective edge weights and rejected if any self-distance is negative.
///
/// Time is integer valued; a strict bound is one time unit tighter than its value.
#[derive(Clone, Debug, Default)]
pub struct TemporalNetwork {
    current: TemporalState,
    saved: TemporalState,
}

impl TemporalNetwork {
    /// The number of known time points.
    pub fn size(&self) -> usize {
        self.current.controllable.len()
    }

    /// All known time points, in no particular order.
    pub fn timepoints(&self) -> impl Iterator<Item = &TimePoint> {
        self.current.controllable.keys()
    }

    /// The controllability flag of a time point, if it is known.
    pub fn controllability(&self, timepoint: &str) -> Option<bool> {
        self.current.controllable.get(timepoint).copied()
    }

    /// The tightest known upper bound on `to - from`, or `None` when the pair is
    /// unknown or unbounded.
    pub fn minimal_distance(&self, from: &str, to: &str) -> Option<i64> {
        self.current
            .minimal
            .get(&(TimePoint::from(from), TimePoint::from(to)))
            .copied()
    }

    /// Overwrites the single snapshot slot with the current state.
    pub fn backup(&mut self) {
        self.saved = self.current.clone();
    }

    /// Rewinds the current state to the snapshot. The snapshot itself stays in place.
    pub fn restore(&mut self) {
        self.current = self.saved.clone();
    }

    /// Resets the network, snapshot slot included, to empty.
    pub fn clear(&mut self) {
        *self = TemporalNetwork::default();
    }

    /// The ordered time-point pairs whose edges `variable` bounds. Maintained for the
    /// eventual binding-to-temporal reaction, which is not wired up yet.
    pub(crate) fn edges_bounded_by(
        &self,
        variable: &str,
    ) -> Option<&HashSet<(TimePoint, TimePoint)>> {
        self.current.involvements.get(variable)
    }

    /// Records a batch of edges and recomputes the minimal network. On failure the
    /// state is left mid-batch; the caller owns snapshotting and rollback of both
    /// networks.
    pub(crate) fn propagate(
        &mut self,
        edges: Vec<TemporalConstraint>,
        binding: &mut BindingNetwork,
        ids: &mut IdGenerator,
    ) -> PropagationStatus {
        for edge in edges {
            self.record_edge(edge, binding, ids)?;
        }
        self.recompute_minimal_network(binding)
    }

    fn record_edge(
        &mut self,
        edge: TemporalConstraint,
        binding: &mut BindingNetwork,
        ids: &mut IdGenerator,
    ) -> PropagationStatus {
        let TemporalConstraint {
            from,
            to,
            bound,
            strict,
        } = edge;
        let bound_variable = match bound {
            TemporalBound::Variable(variable) => {
                chronet_assert_simple!(
                    binding.is_declared(variable.as_str()),
                    "temporal bound variable `{variable}` was never declared"
                );
                variable
            }
            TemporalBound::Constant(constant) => {
                let variable = ObjectVariable::from(format!("_hcov_{}", ids.next_id()));
                binding.declare_variables([(variable.clone(), Domain::singleton(constant))]);
                variable
            }
        };
        trace!("temporal edge {from} -> {to} bounded by {bound_variable} (strict {strict})");

        let _ = self.current.controllable.entry(from.clone()).or_insert(true);
        let _ = self.current.controllable.entry(to.clone()).or_insert(true);
        let forward = (from.clone(), to.clone());
        let _ = self
            .current
            .edges
            .entry(forward.clone())
            .or_default()
            .insert((bound_variable.clone(), strict));
        let _ = self
            .current
            .involvements
            .entry(bound_variable.clone())
            .or_default()
            .insert(forward);

        // An existing reverse edge means `to - from` is also bounded from below; each
        // reverse bound variable must stay at or above the negated new bound.
        if let Some(reverse_bounds) = self.current.edges.get(&(to, from)) {
            if let Some(upper) = binding.domain(bound_variable.as_str()).upper_bound() {
                let events: Vec<BindingEvent> = reverse_bounds
                    .iter()
                    .map(|(reverse_variable, reverse_strict)| BindingEvent::RestrictLower {
                        variable: reverse_variable.clone(),
                        bound: Value::Int(upper.saturating_neg()),
                        strict: *reverse_strict,
                    })
                    .collect();
                binding.propagate(events)?;
            }
        }
        Ok(())
    }

    /// Rebuilds the all-pairs minimal network from the current effective edge weights
    /// and rejects it when any self-distance is negative. `O(T^3)` in the number of
    /// time points; callers should batch edges instead of submitting them one by one.
    fn recompute_minimal_network(&mut self, binding: &BindingNetwork) -> PropagationStatus {
        let points: Vec<TimePoint> = self.current.controllable.keys().cloned().collect();
        let count = points.len();
        let indices: HashMap<&TimePoint, usize> = points
            .iter()
            .enumerate()
            .map(|(index, point)| (point, index))
            .collect();

        let mut matrix = vec![INFINITY; count * count];
        for index in 0..count {
            matrix[index * count + index] = 0;
        }
        for ((from, to), bounds) in &self.current.edges {
            let cell = indices[from] * count + indices[to];
            let weight = effective_weight(bounds, binding);
            if weight < matrix[cell] {
                matrix[cell] = weight;
            }
        }

        for via in 0..count {
            for from in 0..count {
                for to in 0..count {
                    let through =
                        saturating_path(matrix[from * count + via], matrix[via * count + to]);
                    if through < matrix[from * count + to] {
                        matrix[from * count + to] = through;
                    }
                }
            }
        }

        for (index, point) in points.iter().enumerate() {
            if matrix[index * count + index] < 0 {
                return Err(Inconsistency::NegativeSelfDistance(point.clone()));
            }
        }

        let mut minimal: HashMap<(TimePoint, TimePoint), i64> = HashMap::default();
        for (from_index, from) in points.iter().enumerate() {
            for (to_index, to) in points.iter().enumerate() {
                let weight = matrix[from_index * count + to_index];
                if weight < INFINITY {
                    let _ = minimal.insert((from.clone(), to.clone()), weight);
                }
            }
        }
        self.current.minimal = minimal;
        Ok(())
    }
}

/// The effective weight of one ordered pair: the minimum over its bounds of the bound
/// variable's upper bound, less one when strict. Bounds without a numeric upper bound
/// do not contribute.
fn effective_weight(bounds: &HashSet<(ObjectVariable, bool)>, binding: &BindingNetwork) -> i64 {
    bounds
        .iter()
        .filter_map(|(variable, strict)| {
            binding
                .domain(variable.as_str())
                .upper_bound()
                .map(|upper| if *strict { upper.saturating_sub(1) } else { upper })
        })
        .min()
        .unwrap_or(INFINITY)
}

fn saturating_path(first: i64, second: i64) -> i64 {
    if first == INFINITY || second == INFINITY {
        INFINITY
    } else {
        first.saturating_add(second)
    }
}
