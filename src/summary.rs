//! Streaming statistics over a sequence of numbers.

/// Values whose absolute value is below this threshold are treated as zero.
pub const ZERO_TOL: f64 = 1e-16;

/// Equality of two floats up to `ZERO_TOL`.
#[inline]
pub fn approx_eq(v1: f64, v2: f64) -> bool {
    (v1 - v2).abs() <= ZERO_TOL
}

/// Return wether `val` is integral.
///
/// The reference integer is obtained by rounding half up,
/// that is `floor(val + 0.5)`.
#[inline]
pub fn is_integral(val: f64) -> bool {
    let iv = (val + 0.5).floor();
    (val - iv).abs() <= ZERO_TOL
}

/// Running aggregate of a sequence of values.
///
/// `add` is O(1) and `finish` derives the final statistics
/// without consuming the aggregate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    min: f64,
    max: f64,
    min_abs: f64,
    max_abs: f64,
    sum: f64,
    count: usize,
    integral: usize,
    positive: usize,
    negative: usize,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            min_abs: f64::INFINITY,
            max_abs: 0.,
            sum: 0.,
            count: 0,
            integral: 0,
            positive: 0,
            negative: 0,
        }
    }
    /// Feed one value.
    pub fn add(&mut self, val: f64) {
        self.min = self.min.min(val);
        self.max = self.max.max(val);
        let abs = val.abs();
        if abs >= ZERO_TOL {
            self.min_abs = self.min_abs.min(abs);
            self.max_abs = self.max_abs.max(abs);
        }
        self.sum += val;
        if is_integral(val) {
            self.integral += 1;
        }
        if val >= ZERO_TOL {
            self.positive += 1;
        } else if val <= -ZERO_TOL {
            self.negative += 1;
        }
        self.count += 1;
    }
    /// Feed every value of an iterator.
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for v in iter {
            self.add(v)
        }
    }
    /// Number of values fed so far.
    pub fn count(&self) -> usize {
        self.count
    }
    /// Number of values `≥ 1e-16`.
    pub fn positive(&self) -> usize {
        self.positive
    }
    /// Number of values `≤ -1e-16`.
    pub fn negative(&self) -> usize {
        self.negative
    }
    /// Smallest value, `+∞` while empty.
    pub fn min(&self) -> f64 {
        self.min
    }
    /// Largest value, `-∞` while empty.
    pub fn max(&self) -> f64 {
        self.max
    }
    /// Smallest absolute value among the non-zero values.
    /// Is `None` if every value was zero.
    pub fn min_abs(&self) -> Option<f64> {
        if self.min_abs.is_finite() {
            Some(self.min_abs)
        } else {
            None
        }
    }
    /// Largest absolute value among the non-zero values.
    pub fn max_abs(&self) -> Option<f64> {
        self.min_abs().map(|_| self.max_abs)
    }
    /// Return wether every value fed so far is integral.
    pub fn all_integral(&self) -> bool {
        self.integral == self.count
    }
    /// Derive the final statistics.
    pub fn finish(&self) -> Stats {
        if self.count == 0 {
            return Stats {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                ratio_lsa: 0.,
                all_integral: true,
                perc_integral: f64::NAN,
            };
        }
        let n = self.count as f64;
        Stats {
            min: self.min,
            max: self.max,
            mean: self.sum / n,
            ratio_lsa: match self.min_abs() {
                Some(min_abs) => self.max_abs / min_abs,
                None => 0.,
            },
            all_integral: self.all_integral(),
            perc_integral: 100. * self.integral as f64 / n,
        }
    }
}

/// Final statistics of a `Summary`.
///
/// An empty summary gives `NaN` everywhere except for `ratio_lsa` (`0`)
/// and `all_integral` (vacuously `true`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Ratio of the largest to the smallest non-zero absolute value.
    /// Is `0` if no value was non-zero.
    pub ratio_lsa: f64,
    pub all_integral: bool,
    pub perc_integral: f64,
}

/// Population standard deviation of `el` around an already computed `mean`.
///
/// Is `NaN` on an empty sequence.
pub fn std_dev<I>(el: I, mean: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut n = 0;
    let mut sum = 0.;
    for x in el {
        let diff = x - mean;
        sum += diff * diff;
        n += 1;
    }
    if n == 0 {
        f64::NAN
    } else {
        (sum / n as f64).sqrt()
    }
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn integrality() {
        for &v in &[0., 1., 2., -1., -3., 1024., -7.] {
            assert!(is_integral(v), "{v}");
        }
        for &v in &[0.5, -0.5, 1.25, 2.9999, -3.1] {
            assert!(!is_integral(v), "{v}");
        }
    }

    #[test]
    fn summary_basics() {
        let mut s = Summary::new();
        s.extend([3., -2., 0., 0.5]);
        assert_eq!(s.count(), 4);
        assert_eq!(s.positive(), 2);
        assert_eq!(s.negative(), 1);
        assert_eq!(s.min_abs(), Some(0.5));
        assert_eq!(s.max_abs(), Some(3.));
        let stats = s.finish();
        assert_eq!(stats.min, -2.);
        assert_eq!(stats.max, 3.);
        assert_relative_eq!(stats.mean, 0.375);
        assert_relative_eq!(stats.ratio_lsa, 6.);
        assert!(!stats.all_integral);
        assert_relative_eq!(stats.perc_integral, 75.);
    }

    #[test]
    fn zeros_do_not_touch_ratio() {
        let mut s = Summary::new();
        s.extend([0., 1e-17, -1e-18]);
        assert_eq!(s.min_abs(), None);
        let stats = s.finish();
        assert_eq!(stats.ratio_lsa, 0.);
        assert_eq!(stats.max, 1e-17);
    }

    #[test]
    fn negative_max() {
        let mut s = Summary::new();
        s.extend([-4., -2., -8.]);
        assert_eq!(s.finish().max, -2.);
    }

    #[test]
    fn empty_summary() {
        let stats = Summary::new().finish();
        assert!(stats.mean.is_nan());
        assert!(stats.min.is_nan());
        assert!(stats.perc_integral.is_nan());
        assert_eq!(stats.ratio_lsa, 0.);
        assert!(stats.all_integral);
    }

    #[test]
    fn population_std_dev() {
        let el = [2., 4., 4., 4., 5., 5., 7., 9.];
        assert_relative_eq!(std_dev(el, 5.), 2.);
        let degrees: [usize; 4] = [1, 1, 3, 3];
        assert_relative_eq!(std_dev(degrees.iter().map(|&d| d as f64), 2.), 1.);
        assert!(std_dev(Vec::new(), 0.).is_nan());
    }
}
