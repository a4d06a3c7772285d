use serde::Serialize;

/// Pass/total counts extracted from one test-runner invocation.
///
/// `passed <= total` is expected but not enforced: counts come from heuristic
/// parsing of free-form console output, so `failed()` saturates rather than
/// trusting the inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub passed: u32,
    pub total: u32,
}

impl TestOutcome {
    pub fn new(passed: u32, total: u32) -> Self {
        Self { passed, total }
    }

    pub fn failed(&self) -> u32 {
        self.total.saturating_sub(self.passed)
    }
}

impl std::ops::AddAssign for TestOutcome {
    fn add_assign(&mut self, rhs: Self) {
        // counts come from untrusted output; clamp instead of overflowing
        self.passed = self.passed.saturating_add(rhs.passed);
        self.total = self.total.saturating_add(rhs.total);
    }
}

impl std::iter::Sum for TestOutcome {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut acc = Self::default();
        for outcome in iter {
            acc += outcome;
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_is_total_minus_passed() {
        assert_eq!(TestOutcome::new(7, 10).failed(), 3);
        assert_eq!(TestOutcome::new(5, 5).failed(), 0);
    }

    #[test]
    fn test_failed_saturates_on_malformed_counts() {
        // passed > total can happen with garbled runner output
        assert_eq!(TestOutcome::new(9, 3).failed(), 0);
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let outcomes = [
            TestOutcome::new(u32::MAX - 1, u32::MAX),
            TestOutcome::new(7, 10),
        ];
        let total: TestOutcome = outcomes.into_iter().sum();
        assert_eq!(total, TestOutcome::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_sum_across_directories() {
        let outcomes = [
            TestOutcome::new(3, 5),
            TestOutcome::new(0, 0),
            TestOutcome::new(4, 4),
        ];
        let total: TestOutcome = outcomes.into_iter().sum();
        assert_eq!(total, TestOutcome::new(7, 9));
    }
}
