//! Assembling the feature vector of a problem.
//!
//! The computation goes through the rows, then through the columns,
//! and derives percentages, means and standard deviations from the
//! accumulated counts. It is a pure function of the problem.
//!
//! Degenerate problems are not rejected: a percentage or a ratio with a zero
//! denominator is `NaN`, as are the statistics of an empty sequence.

use crate::columns::ColumnProfile;
use crate::feature::{Feature, FeatureVector, Ladder, COL_LADDER, ROW_LADDER};
use crate::histogram::DyadicHistogram;
use crate::model::ProblemModel;
use crate::rows::{RowPattern, RowProfile};
use crate::summary::{Stats, Summary, std_dev};
use log::*;

/// `100 * count / total`, or `NaN` if `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    ratio(100. * count as f64, total as f64)
}

/// `num / denom`, or `NaN` if `denom` is zero.
fn ratio(num: f64, denom: f64) -> f64 {
    if denom == 0. { f64::NAN } else { num / denom }
}

/// Features filled from the statistics of one sequence.
#[derive(Debug)]
struct StatFeatures {
    min: Feature,
    max: Feature,
    avg: Feature,
    std_dev: Feature,
    ratio_lsa: Option<Feature>,
    all_int: Option<Feature>,
    perc_int: Option<Feature>,
}

const COEF_FEATURES: StatFeatures = StatFeatures {
    min: Feature::AMin,
    max: Feature::AMax,
    avg: Feature::AAvg,
    std_dev: Feature::AStdDev,
    ratio_lsa: Some(Feature::ARatioLsa),
    all_int: Some(Feature::AAllInt),
    perc_int: Some(Feature::APercInt),
};

const OBJ_FEATURES: StatFeatures = StatFeatures {
    min: Feature::ObjMin,
    max: Feature::ObjMax,
    avg: Feature::ObjAvg,
    std_dev: Feature::ObjStdDev,
    ratio_lsa: Some(Feature::ObjRatioLsa),
    all_int: Some(Feature::ObjAllInt),
    perc_int: Some(Feature::ObjPercInt),
};

const RHS_FEATURES: StatFeatures = StatFeatures {
    min: Feature::RhsMin,
    max: Feature::RhsMax,
    avg: Feature::RhsAvg,
    std_dev: Feature::RhsStdDev,
    ratio_lsa: Some(Feature::RhsRatioLsa),
    all_int: Some(Feature::RhsAllInt),
    perc_int: Some(Feature::RhsPercInt),
};

const ROW_NZ_FEATURES: StatFeatures = StatFeatures {
    min: Feature::RowNzMin,
    max: Feature::RowNzMax,
    avg: Feature::RowNzAvg,
    std_dev: Feature::RowNzStdDev,
    ratio_lsa: None,
    all_int: None,
    perc_int: None,
};

const COL_NZ_FEATURES: StatFeatures = StatFeatures {
    min: Feature::ColNzMin,
    max: Feature::ColNzMax,
    avg: Feature::ColNzAvg,
    std_dev: Feature::ColNzStdDev,
    ratio_lsa: None,
    all_int: None,
    perc_int: None,
};

impl FeatureVector {
    fn set_stats<I>(&mut self, features: &StatFeatures, summary: &Summary, el: I)
    where
        I: IntoIterator<Item = f64>,
    {
        let Stats {
            min,
            max,
            mean,
            ratio_lsa,
            all_integral,
            perc_integral,
        } = summary.finish();
        self.set(features.min, min);
        self.set(features.max, max);
        self.set(features.avg, mean);
        self.set(features.std_dev, std_dev(el, mean));
        if let Some(f) = features.ratio_lsa {
            self.set(f, ratio_lsa)
        }
        if let Some(f) = features.all_int {
            self.set(f, if all_integral { 1. } else { 0. })
        }
        if let Some(f) = features.perc_int {
            self.set(f, perc_integral)
        }
    }
    fn set_count(&mut self, (count_feature, perc_feature): (Feature, Feature), count: usize, total: usize) {
        self.set(count_feature, count as f64);
        self.set(perc_feature, percentage(count, total));
    }
    fn set_histogram(&mut self, ladder: &Ladder, histogram: &DyadicHistogram, total: usize) {
        for (&features, (_, count)) in ladder.at_most.iter().zip(histogram.at_most()) {
            self.set_count(features, count, total)
        }
        for (&features, (_, count)) in ladder.at_least.iter().zip(histogram.at_least()) {
            self.set_count(features, count, total)
        }
    }
    fn set_rows(&mut self, rows: &RowProfile) {
        let n = rows.rows;
        for pattern in RowPattern::ALL {
            let features = (pattern.count_feature(), pattern.percent_feature());
            self.set_count(features, rows.count(pattern), n)
        }
        self.set_count(
            (Feature::Equalities, Feature::PercEqualities),
            rows.equalities,
            n,
        );
        self.set(Feature::Inequalities, rows.inequalities as f64);
        self.set_stats(&COEF_FEATURES, &rows.coef_summary, rows.coefs.iter().copied());
        self.set_stats(&RHS_FEATURES, &rows.rhs_summary, rows.rhs.iter().copied());
        self.set_stats(
            &ROW_NZ_FEATURES,
            &rows.degree_summary,
            rows.degrees.iter().map(|&d| d as f64),
        );
        self.set_histogram(&ROW_LADDER, &rows.histogram, n);
    }
    fn set_columns(&mut self, cols: &ColumnProfile) {
        let n = cols.cols;
        self.set(Feature::Bin, cols.binary as f64);
        self.set(Feature::GenInt, cols.general_integer as f64);
        self.set(Feature::Integer, cols.integer() as f64);
        self.set(Feature::Continuous, cols.continuous as f64);
        self.set(Feature::PercInteger, percentage(cols.integer(), n));
        self.set(Feature::PercBin, percentage(cols.binary, n));
        self.set_stats(&OBJ_FEATURES, &cols.obj_summary, cols.obj.iter().copied());
        self.set_stats(
            &COL_NZ_FEATURES,
            &cols.degree_summary,
            cols.degrees.iter().map(|&d| d as f64),
        );
        self.set_histogram(&COL_LADDER, &cols.histogram, n);
    }
}

/// Compute the features of `pb`.
///
/// The output always has `Feature::COUNT` entries; some of them
/// are `NaN` when the problem has no row or no column.
pub fn compute<M: ProblemModel + ?Sized>(pb: &M) -> FeatureVector {
    let (rows, cols, nz) = (pb.num_rows(), pb.num_cols(), pb.num_nonzeros());
    debug!("Computing features of a {rows}x{cols} problem with {nz} nonzeros");
    if rows == 0 || cols == 0 {
        warn!("Problem with {rows} rows and {cols} columns: some features are NaN");
    }
    let mut res = FeatureVector::zeros();
    res.set(Feature::Cols, cols as f64);
    res.set(Feature::Rows, rows as f64);
    res.set(Feature::ColsPerRow, ratio(cols as f64, rows as f64));
    res.set(Feature::Nz, nz as f64);
    res.set(
        Feature::Density,
        ratio(100. * nz as f64, rows as f64 * cols as f64),
    );

    let row_profile = RowProfile::scan(pb);
    res.set_rows(&row_profile);
    trace!("Row features done");

    let col_profile = ColumnProfile::scan(pb);
    res.set_columns(&col_profile);
    trace!("Column features done");
    res
}
