//! Pass over the variables: types, objective and sparsity.

use crate::histogram::DyadicHistogram;
use crate::model::{ProblemModel, VarType};
use crate::summary::Summary;
use log::*;

/// Aggregates of a pass over every column of a problem.
#[derive(Clone, Debug)]
pub struct ColumnProfile {
    pub cols: usize,
    pub binary: usize,
    pub general_integer: usize,
    pub continuous: usize,
    pub obj: Vec<f64>,
    pub obj_summary: Summary,
    pub degrees: Vec<usize>,
    pub degree_summary: Summary,
    pub histogram: DyadicHistogram,
}

impl ColumnProfile {
    /// Go through every column of `pb`.
    pub fn scan<M: ProblemModel + ?Sized>(pb: &M) -> Self {
        let n_cols = pb.num_cols();
        let mut res = Self {
            cols: n_cols,
            binary: 0,
            general_integer: 0,
            continuous: 0,
            obj: Vec::with_capacity(n_cols),
            obj_summary: Summary::new(),
            degrees: Vec::with_capacity(n_cols),
            degree_summary: Summary::new(),
            histogram: DyadicHistogram::new(),
        };
        for j in 0..n_cols {
            res.add(pb.var_type(j), pb.objective(j), pb.col_degree(j))
        }
        debug!(
            "Scanned {} columns: {} binary, {} general integer, {} continuous",
            res.cols, res.binary, res.general_integer, res.continuous
        );
        res
    }
    fn add(&mut self, var_type: VarType, obj: f64, degree: usize) {
        match var_type {
            VarType::Binary => self.binary += 1,
            VarType::Integer => self.general_integer += 1,
            VarType::Continuous => self.continuous += 1,
        }
        self.obj_summary.add(obj);
        self.obj.push(obj);
        self.degree_summary.add(degree as f64);
        self.degrees.push(degree);
        self.histogram.add(degree);
    }
    /// Number of integer columns, binary included.
    pub fn integer(&self) -> usize {
        self.binary + self.general_integer
    }
}
