/// Generates the monotonically increasing suffixes behind auto-named instances, time
/// points and helper constant variables.
///
/// There is no global counter; a generator is owned by whoever needs one (the
/// constraint network owns one for helper variables, callers inject one into
/// [`ActionMethod::new`]) so independent engines stay deterministic.
///
/// [`ActionMethod::new`]: crate::planning::ActionMethod::new
#[derive(Clone, Copy, Debug, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    /// Returns the next suffix. Never returns the same value twice for one generator.
    pub fn next_id(&mut self) -> u64 {
        let id = self.counter;
        self.counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::IdGenerator;

    #[test]
    fn ids_increase_from_zero() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }
}
