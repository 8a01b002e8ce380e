//! Structural classification of the constraint rows.
//!
//! The checks performed on a row are independent from each other:
//! one row can match several patterns at once.

use crate::feature::Feature;
use crate::histogram::DyadicHistogram;
use crate::model::{ProblemModel, Sense, VarType};
use crate::summary::{Summary, approx_eq};
use arrayvec::ArrayVec;
use log::*;

/// Right-hand sides at least this large make cardinality rows.
const CARDINALITY_RHS: f64 = 1.99;
/// Right-hand sides at least this large make knapsack rows.
const KNAPSACK_RHS: f64 = 1.1;
/// Minimal spread of the coefficients of a knapsack row.
const KNAPSACK_SPREAD: f64 = 0.1;

/// Canonical shapes of linear constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowPattern {
    /// `x = 1`, `x ≥ 1`, ... with a single nonzero.
    Singleton,
    /// Equality with two nonzeros.
    Aggregation,
    /// `a x - a y (sense) b`, the two variables being of the same kind.
    Precedence,
    /// Two nonzeros, one of them on a binary variable.
    VariableBound,
    /// `∑ x_i = 1` on binaries.
    Partitioning,
    /// `∑ x_i ≤ 1` on binaries.
    Packing,
    /// `∑ x_i ≥ 1` on binaries.
    Covering,
    /// `∑ x_i = k` on binaries, `k ≥ 2`.
    Cardinality,
    /// `∑ x_i ≤ k` on binaries, `k ≥ 2`.
    InvKnapsack,
    /// `∑ a_i x_i ≤ b` on binaries with nonnegative, distinct weights.
    Knapsack,
    /// Knapsack whose weights are all integers.
    IntegerKnapsack,
    /// `∑ a_i x_i - c y ≤ 0` on binaries: a single negative coefficient.
    BinPacking,
    /// Equality on binaries with at least two positive and two negative coefficients.
    FlowBin,
    /// Same as `FlowBin` with some non-binary variable.
    FlowMixed,
    /// Row with some continuous variable.
    MixedBin,
    /// Row with some general integer variable.
    GenInt,
}

use RowPattern::*;

impl RowPattern {
    /// Every pattern, in the order of their features.
    pub const ALL: [RowPattern; 16] = [
        Partitioning,
        Packing,
        Covering,
        Cardinality,
        Knapsack,
        IntegerKnapsack,
        InvKnapsack,
        Singleton,
        Aggregation,
        Precedence,
        VariableBound,
        BinPacking,
        MixedBin,
        GenInt,
        FlowBin,
        FlowMixed,
    ];
    /// Feature counting the rows with this pattern.
    pub fn count_feature(self) -> Feature {
        match self {
            Singleton => Feature::RowsSingleton,
            Aggregation => Feature::RowsAggr,
            Precedence => Feature::RowsPrec,
            VariableBound => Feature::RowsVarBnd,
            Partitioning => Feature::RowsPartitioning,
            Packing => Feature::RowsPacking,
            Covering => Feature::RowsCovering,
            Cardinality => Feature::RowsCardinality,
            InvKnapsack => Feature::RowsInvKnapsack,
            Knapsack => Feature::RowsKnapsack,
            IntegerKnapsack => Feature::RowsIntegerKnapsack,
            BinPacking => Feature::RowsBinPacking,
            FlowBin => Feature::RowsFlowBin,
            FlowMixed => Feature::RowsFlowMx,
            MixedBin => Feature::RowsMixedBin,
            GenInt => Feature::RowsGenInt,
        }
    }
    /// Feature giving the percentage of rows with this pattern.
    pub fn percent_feature(self) -> Feature {
        match self {
            Singleton => Feature::PercRowsSingleton,
            Aggregation => Feature::PercRowsAggr,
            Precedence => Feature::PercRowsPrec,
            VariableBound => Feature::PercRowsVarBnd,
            Partitioning => Feature::PercRowsPartitioning,
            Packing => Feature::PercRowsPacking,
            Covering => Feature::PercRowsCovering,
            Cardinality => Feature::PercRowsCardinality,
            InvKnapsack => Feature::PercRowsInvKnapsack,
            Knapsack => Feature::PercRowsKnapsack,
            IntegerKnapsack => Feature::PercRowsIntegerKnapsack,
            BinPacking => Feature::PercRowsBinPacking,
            FlowBin => Feature::PercRowsFlowBin,
            FlowMixed => Feature::PercRowsFlowMx,
            MixedBin => Feature::PercRowsMixedBin,
            GenInt => Feature::PercRowsGenInt,
        }
    }
    fn slot(self) -> usize {
        self as usize
    }
}

/// Patterns matched by a single row.
pub type Patterns = ArrayVec<RowPattern, 16>;

/// One constraint seen in isolation.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    pub coefs: &'a [f64],
    /// Type of the variable of each coefficient.
    pub types: &'a [VarType],
    pub sense: Sense,
    pub rhs: f64,
}

/// Return every pattern matched by `row`.
///
/// The summary of the coefficients of the row is also returned.
/// If `coefs` and `types` differ in length, the trailing entries
/// of the longer one are ignored.
pub fn classify_row(row: &RowView<'_>) -> (Patterns, Summary) {
    let nz = row.coefs.len().min(row.types.len());
    let (coefs, types) = (&row.coefs[..nz], &row.types[..nz]);
    let mut summary = Summary::new();
    summary.extend(coefs.iter().copied());
    let (mut n_bin, mut n_int, mut n_cont) = (0, 0, 0);
    for t in types {
        match t {
            VarType::Binary => n_bin += 1,
            VarType::Integer => n_int += 1,
            VarType::Continuous => n_cont += 1,
        }
    }
    let eq = row.sense.is_equality();
    let mut res = Patterns::new();

    match nz {
        1 => res.push(Singleton),
        2 => {
            if eq {
                res.push(Aggregation)
            }
            if n_bin == 1 {
                res.push(VariableBound)
            }
            if n_bin % 2 == 0
                && n_cont % 2 == 0
                && summary.negative() == 1
                && summary.positive() == 1
                && matches!(
                    (summary.min_abs(), summary.max_abs()),
                    (Some(lo), Some(hi)) if approx_eq(lo, hi)
                )
            {
                res.push(Precedence)
            }
        }
        _ => (),
    }

    let (min, max) = (summary.min(), summary.max());
    let flow = eq && summary.negative() >= 2 && summary.positive() >= 2;
    if n_bin == nz {
        if approx_eq(min, 1.) && approx_eq(max, 1.) {
            if approx_eq(row.rhs, 1.) {
                match row.sense {
                    Sense::Equal => res.push(Partitioning),
                    Sense::GreaterEqual => res.push(Covering),
                    Sense::LessEqual => res.push(Packing),
                    _ => (),
                }
            } else if row.rhs >= CARDINALITY_RHS {
                match row.sense {
                    Sense::Equal => res.push(Cardinality),
                    Sense::LessEqual => res.push(InvKnapsack),
                    _ => (),
                }
            }
        } else if row.rhs >= KNAPSACK_RHS {
            if max - min >= KNAPSACK_SPREAD && summary.negative() == 0 {
                res.push(Knapsack);
                if summary.all_integral() {
                    res.push(IntegerKnapsack)
                }
            }
            if summary.negative() == 1 && nz >= 2 {
                res.push(BinPacking)
            }
        }
        if flow {
            res.push(FlowBin)
        }
    } else {
        if flow {
            res.push(FlowMixed)
        }
        if n_cont > 0 {
            res.push(MixedBin)
        }
        if n_int > 0 {
            res.push(GenInt)
        }
    }
    (res, summary)
}

/// Aggregates of a pass over every row of a problem.
#[derive(Clone, Debug)]
pub struct RowProfile {
    pub rows: usize,
    counts: [usize; 16],
    pub equalities: usize,
    pub inequalities: usize,
    /// Every coefficient of the matrix, in row-major order.
    pub coefs: Vec<f64>,
    pub coef_summary: Summary,
    pub rhs: Vec<f64>,
    pub rhs_summary: Summary,
    pub degrees: Vec<usize>,
    pub degree_summary: Summary,
    pub histogram: DyadicHistogram,
}

impl RowProfile {
    /// Go through every row of `pb`.
    pub fn scan<M: ProblemModel + ?Sized>(pb: &M) -> Self {
        let n_rows = pb.num_rows();
        let mut res = Self {
            rows: n_rows,
            counts: [0; 16],
            equalities: 0,
            inequalities: 0,
            coefs: Vec::with_capacity(pb.num_nonzeros()),
            coef_summary: Summary::new(),
            rhs: Vec::with_capacity(n_rows),
            rhs_summary: Summary::new(),
            degrees: Vec::with_capacity(n_rows),
            degree_summary: Summary::new(),
            histogram: DyadicHistogram::new(),
        };
        let mut types = Vec::new();
        for i in 0..n_rows {
            let row = pb.row(i);
            types.clear();
            types.extend(row.indices().iter().map(|&j| pb.var_type(j)));
            let view = RowView {
                coefs: row.data(),
                types: &types,
                sense: pb.sense(i),
                rhs: pb.rhs(i),
            };
            let (patterns, _) = classify_row(&view);
            trace!("Row {}: {:?}", i, patterns);
            res.add(&view, &patterns)
        }
        debug!(
            "Scanned {} rows: {} equalities, {} inequalities",
            res.rows, res.equalities, res.inequalities
        );
        res
    }
    fn add(&mut self, row: &RowView<'_>, patterns: &Patterns) {
        for p in patterns {
            self.counts[p.slot()] += 1
        }
        if row.sense.is_equality() {
            self.equalities += 1
        } else {
            self.inequalities += 1
        }
        for &v in row.coefs {
            self.coef_summary.add(v);
            self.coefs.push(v)
        }
        self.rhs_summary.add(row.rhs);
        self.rhs.push(row.rhs);
        let degree = row.coefs.len();
        self.degree_summary.add(degree as f64);
        self.degrees.push(degree);
        self.histogram.add(degree);
    }
    /// Number of rows matching `pattern`.
    pub fn count(&self, pattern: RowPattern) -> usize {
        self.counts[pattern.slot()]
    }
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use VarType::*;

    fn classify(coefs: &[f64], types: &[VarType], sense: Sense, rhs: f64) -> Patterns {
        classify_row(&RowView {
            coefs,
            types,
            sense,
            rhs,
        })
        .0
    }

    #[test]
    fn pattern_slots_are_distinct() {
        let mut slots: Vec<_> = RowPattern::ALL.iter().map(|p| p.slot()).collect();
        slots.sort();
        slots.dedup();
        assert_eq!(slots.len(), 16);
        assert!(slots.iter().all(|&s| s < 16));
    }

    #[test]
    fn singleton() {
        assert_eq!(
            classify(&[3.], &[Continuous], Sense::LessEqual, 4.).as_slice(),
            &[Singleton, MixedBin]
        );
    }

    #[test]
    fn set_rows() {
        let ones = [1.; 4];
        let bins = [Binary; 4];
        assert_eq!(
            classify(&ones, &bins, Sense::Equal, 1.).as_slice(),
            &[Partitioning]
        );
        assert_eq!(
            classify(&ones, &bins, Sense::LessEqual, 1.).as_slice(),
            &[Packing]
        );
        assert_eq!(
            classify(&ones, &bins, Sense::GreaterEqual, 1.).as_slice(),
            &[Covering]
        );
        assert_eq!(
            classify(&ones, &bins, Sense::Equal, 3.).as_slice(),
            &[Cardinality]
        );
        assert_eq!(
            classify(&ones, &bins, Sense::LessEqual, 2.).as_slice(),
            &[InvKnapsack]
        );
        assert!(classify(&ones, &bins, Sense::GreaterEqual, 2.).is_empty());
        assert!(classify(&ones, &bins, Sense::Ranged, 1.).is_empty());
    }

    #[test]
    fn knapsacks() {
        let bins = [Binary; 3];
        assert_eq!(
            classify(&[2., 3., 5.], &bins, Sense::LessEqual, 7.).as_slice(),
            &[Knapsack, IntegerKnapsack]
        );
        assert_eq!(
            classify(&[2.5, 3., 5.], &bins, Sense::LessEqual, 7.).as_slice(),
            &[Knapsack]
        );
        // rhs too small
        assert!(classify(&[2., 3., 5.], &bins, Sense::LessEqual, 1.).is_empty());
        assert_eq!(
            classify(&[2., 3., -4.], &bins, Sense::LessEqual, 2.).as_slice(),
            &[BinPacking]
        );
    }

    #[test]
    fn two_nonzeros() {
        // x - y = 0 on binaries
        assert_eq!(
            classify(&[1., -1.], &[Binary, Binary], Sense::Equal, 0.).as_slice(),
            &[Aggregation, Precedence]
        );
        // x - 10 y <= 0 with x continuous and y binary
        assert_eq!(
            classify(&[1., -10.], &[Continuous, Binary], Sense::LessEqual, 0.).as_slice(),
            &[VariableBound, MixedBin]
        );
        // -2 x + 3 y = 0: magnitudes differ
        assert_eq!(
            classify(&[-2., 3.], &[Continuous, Continuous], Sense::Equal, 0.).as_slice(),
            &[Aggregation, MixedBin]
        );
        // 2 x - 2 y <= 0 on continuous variables
        assert_eq!(
            classify(&[2., -2.], &[Continuous, Continuous], Sense::LessEqual, 0.).as_slice(),
            &[Precedence, MixedBin]
        );
        // different kinds of variables
        assert!(
            !classify(&[1., -1.], &[Integer, Continuous], Sense::LessEqual, 0.)
                .contains(&Precedence)
        );
    }

    #[test]
    fn flows() {
        let coefs = [1., 1., -1., -1.];
        assert_eq!(
            classify(&coefs, &[Binary; 4], Sense::Equal, 0.).as_slice(),
            &[FlowBin]
        );
        assert_eq!(
            classify(&coefs, &[Binary, Integer, Continuous, Binary], Sense::Equal, 0.).as_slice(),
            &[FlowMixed, MixedBin, GenInt]
        );
        assert!(classify(&coefs, &[Binary; 4], Sense::LessEqual, 0.).is_empty());
    }

    #[test]
    fn patterns_overlap() {
        let bins = [Binary; 2];
        assert_eq!(
            classify(&[1., 1.], &bins, Sense::Equal, 1.).as_slice(),
            &[Aggregation, Partitioning]
        );
        assert_eq!(
            classify(&[3., -1.], &bins, Sense::Equal, 2.).as_slice(),
            &[Aggregation, BinPacking]
        );
        assert_eq!(
            classify(&[4., -4.], &bins, Sense::Equal, 2.).as_slice(),
            &[Aggregation, Precedence, BinPacking]
        );
    }

    #[test]
    fn empty_row() {
        assert!(classify(&[], &[], Sense::Equal, 1.).is_empty());
    }

    #[test]
    fn mismatched_view() {
        let (patterns, summary) = classify_row(&RowView {
            coefs: &[1., 1., 7.],
            types: &[Binary, Binary],
            sense: Sense::LessEqual,
            rhs: 1.,
        });
        assert_eq!(patterns.as_slice(), &[Packing]);
        assert_eq!(summary.count(), 2);
        assert!(classify(&[2.], &[], Sense::Equal, 2.).is_empty());
    }
}
