//! Nested histograms of nonzero degrees over power-of-two thresholds.

/// Thresholds of the "at most" ladder, tightest last.
pub const AT_MOST: [usize; 9] = [1024, 512, 256, 128, 64, 32, 16, 8, 4];

/// Thresholds of the "at least" ladder, loosest first.
pub const AT_LEAST: [usize; 11] = [4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// Pair of nested counters per threshold.
///
/// `at_most[k]` counts the degrees `≤ AT_MOST[k]` and
/// `at_least[k]` counts the degrees `≥ AT_LEAST[k]`.
/// Each ladder is walked from its loosest bound and stops
/// at the first bound that fails, so that counts are nested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DyadicHistogram {
    at_most: [usize; AT_MOST.len()],
    at_least: [usize; AT_LEAST.len()],
}

impl DyadicHistogram {
    pub fn new() -> Self {
        Self::default()
    }
    /// Record one degree.
    pub fn add(&mut self, degree: usize) {
        for (count, &bound) in self.at_most.iter_mut().zip(&AT_MOST) {
            if degree > bound {
                break;
            }
            *count += 1;
        }
        for (count, &bound) in self.at_least.iter_mut().zip(&AT_LEAST) {
            if degree < bound {
                break;
            }
            *count += 1;
        }
    }
    /// Number of degrees at most `bound`, if `bound` is on the ladder.
    pub fn count_at_most(&self, bound: usize) -> Option<usize> {
        AT_MOST
            .iter()
            .position(|&b| b == bound)
            .map(|k| self.at_most[k])
    }
    /// Number of degrees at least `bound`, if `bound` is on the ladder.
    pub fn count_at_least(&self, bound: usize) -> Option<usize> {
        AT_LEAST
            .iter()
            .position(|&b| b == bound)
            .map(|k| self.at_least[k])
    }
    /// Iterate on `(bound, count)` pairs of the "at most" ladder, by increasing bound.
    pub fn at_most(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        AT_MOST.iter().copied().zip(self.at_most.iter().copied()).rev()
    }
    /// Iterate on `(bound, count)` pairs of the "at least" ladder, by increasing bound.
    pub fn at_least(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        AT_LEAST.iter().copied().zip(self.at_least.iter().copied())
    }
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_ladders() {
        let mut h = DyadicHistogram::new();
        for d in [0, 1, 4, 5, 8, 100, 1024, 1025, 5000] {
            h.add(d)
        }
        assert_eq!(h.count_at_most(4), Some(3));
        assert_eq!(h.count_at_most(8), Some(5));
        assert_eq!(h.count_at_most(128), Some(6));
        assert_eq!(h.count_at_most(1024), Some(7));
        assert_eq!(h.count_at_least(4), Some(7));
        assert_eq!(h.count_at_least(8), Some(5));
        assert_eq!(h.count_at_least(1024), Some(3));
        assert_eq!(h.count_at_least(2048), Some(1));
        assert_eq!(h.count_at_least(4096), Some(1));
        assert_eq!(h.count_at_most(3), None);
    }

    #[test]
    fn monotonic() {
        let mut h = DyadicHistogram::new();
        for d in 0..3000 {
            h.add(d % 1500)
        }
        let at_most: Vec<_> = h.at_most().map(|(_, c)| c).collect();
        assert!(at_most.windows(2).all(|w| w[0] <= w[1]));
        let at_least: Vec<_> = h.at_least().map(|(_, c)| c).collect();
        assert!(at_least.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(h.at_most().next(), Some((4, 10)));
    }
}
