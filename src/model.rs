//! Read-only access to a sparse linear or mixed-integer program.
//!
//! The feature computation only sees a problem through the `ProblemModel`
//! trait. `SparseProblem` is an implementation that stores the constraint
//! matrix twice, in CSR and CSC form.

use crate::summary::ZERO_TOL;
use rand::Rng;
use sprs::{CsMat, CsVecView, TriMat};
use std::fmt;
use std::fmt::Display;
use thiserror::Error;

/// Relational sense of a constraint row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    /// `a.x = b`
    Equal,
    /// `a.x ≤ b`
    LessEqual,
    /// `a.x ≥ b`
    GreaterEqual,
    /// `l ≤ a.x ≤ b`, the right-hand side being the upper bound.
    Ranged,
    /// Free row.
    Free,
}

impl Sense {
    /// Return wether the row is an equality.
    pub fn is_equality(self) -> bool {
        self == Sense::Equal
    }
}

impl Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            Sense::Equal => 'E',
            Sense::LessEqual => 'L',
            Sense::GreaterEqual => 'G',
            Sense::Ranged => 'R',
            Sense::Free => 'N',
        };
        write!(f, "{c}")
    }
}

/// Type of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Binary,
    /// Integer variable that is not binary.
    Integer,
    Continuous,
}

/// Common interface for the problems whose features can be computed.
///
/// Row `i` is in `0..num_rows()`, column `j` in `0..num_cols()`;
/// implementations may panic on indices out of these ranges.
pub trait ProblemModel {
    /// Number of constraints.
    fn num_rows(&self) -> usize;
    /// Number of variables.
    fn num_cols(&self) -> usize;
    /// Number of nonzero entries of the constraint matrix.
    fn num_nonzeros(&self) -> usize;
    /// Nonzero entries of row `i`, indexed by column.
    fn row(&self, i: usize) -> CsVecView<'_, f64>;
    /// Nonzero entries of column `j`, indexed by row.
    fn col(&self, j: usize) -> CsVecView<'_, f64>;
    /// Objective coefficient of column `j`.
    fn objective(&self, j: usize) -> f64;
    /// Right-hand side of row `i`.
    fn rhs(&self, i: usize) -> f64;
    /// Sense of row `i`.
    fn sense(&self, i: usize) -> Sense;
    /// Return wether column `j` is binary.
    fn is_binary(&self, j: usize) -> bool;
    /// Return wether column `j` is integer (binary included).
    fn is_integer(&self, j: usize) -> bool;

    // provided
    /// Number of nonzero entries of row `i`.
    fn row_degree(&self, i: usize) -> usize {
        self.row(i).nnz()
    }
    /// Number of nonzero entries of column `j`.
    fn col_degree(&self, j: usize) -> usize {
        self.col(j).nnz()
    }
    /// Type of column `j`.
    fn var_type(&self, j: usize) -> VarType {
        if self.is_binary(j) {
            VarType::Binary
        } else if self.is_integer(j) {
            VarType::Integer
        } else {
            VarType::Continuous
        }
    }
}

/// Errors raised while building a problem.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("row {row} refers to column {col} but the problem has {cols} columns")]
    ColumnOutOfRange { row: usize, col: usize, cols: usize },
    #[error("coefficient of column {col} in row {row} is not finite")]
    NonFiniteCoefficient { row: usize, col: usize },
    #[error("right-hand side of row {0} is not finite")]
    NonFiniteRhs(usize),
    #[error("objective coefficient of column {0} is not finite")]
    NonFiniteObjective(usize),
    #[error("expected {expected} {what}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

/// A problem stored as a sparse matrix in both row-major and column-major order.
///
/// The matrix never stores entries of absolute value below `ZERO_TOL`.
/// Only the row-major copy is serialized, and deserialization goes
/// through the same checks as `SparseProblem::new`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "FrozenProblem", try_from = "FrozenProblem")]
pub struct SparseProblem {
    by_row: CsMat<f64>,
    by_col: CsMat<f64>,
    obj: Vec<f64>,
    rhs: Vec<f64>,
    sense: Vec<Sense>,
    var_type: Vec<VarType>,
}

impl SparseProblem {
    /// Build a problem from a constraint matrix in any storage order.
    ///
    /// Entries of absolute value below `ZERO_TOL` are dropped.
    pub fn new(
        matrix: CsMat<f64>,
        obj: Vec<f64>,
        rows: Vec<(Sense, f64)>,
        var_type: Vec<VarType>,
    ) -> Result<Self, ModelError> {
        check_len("objective coefficients", matrix.cols(), obj.len())?;
        check_len("column types", matrix.cols(), var_type.len())?;
        check_len("rows", matrix.rows(), rows.len())?;
        if let Some(j) = obj.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteObjective(j));
        }
        if let Some(i) = rows.iter().position(|(_, b)| !b.is_finite()) {
            return Err(ModelError::NonFiniteRhs(i));
        }
        let mut triplets = Vec::with_capacity(matrix.nnz());
        for (&v, (i, j)) in &matrix {
            if !v.is_finite() {
                return Err(ModelError::NonFiniteCoefficient { row: i, col: j });
            }
            triplets.push((i, j, v))
        }
        let (by_row, by_col) = compress(matrix.shape(), triplets);
        let (sense, rhs) = rows.into_iter().unzip();
        Ok(Self {
            by_row,
            by_col,
            obj,
            rhs,
            sense,
            var_type,
        })
    }
    /// The constraint matrix in CSR form.
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.by_row
    }
    /// Create a random problem with `rows` constraints and `cols` variables,
    /// where each entry of the matrix is nonzero with probability `density`.
    ///
    /// Coefficients, right-hand sides and types are drawn from small
    /// sets of values so that the structured rows (packing, knapsack, ...)
    /// actually occur.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Self {
        const COEFFS: [f64; 7] = [1., 1., 1., -1., 2., 3.5, -2.];
        const RHS: [f64; 5] = [0., 1., 2., 5., 1.5];
        const SENSES: [Sense; 4] = [
            Sense::Equal,
            Sense::LessEqual,
            Sense::GreaterEqual,
            Sense::Ranged,
        ];
        const TYPES: [VarType; 3] = [VarType::Binary, VarType::Integer, VarType::Continuous];
        let mut builder = ProblemBuilder::new();
        for _ in 0..cols {
            let obj = f64::from(rng.random_range(-3i32..=3));
            let _ = builder.add_column(obj, TYPES[rng.random_range(0..TYPES.len())]);
        }
        for _ in 0..rows {
            let mut coefs = Vec::new();
            for j in 0..cols {
                if rng.random_bool(density) {
                    coefs.push((j, COEFFS[rng.random_range(0..COEFFS.len())]))
                }
            }
            let sense = SENSES[rng.random_range(0..SENSES.len())];
            let rhs = RHS[rng.random_range(0..RHS.len())];
            builder
                .add_row(sense, rhs, &coefs)
                .expect("generated columns are in range");
        }
        builder.build()
    }
}

/// Sum the entries repeated at the same position, drop the zeros and
/// return the matrix in CSR and CSC form.
fn compress(
    shape: (usize, usize),
    mut triplets: Vec<(usize, usize, f64)>,
) -> (CsMat<f64>, CsMat<f64>) {
    triplets.sort_by_key(|&(i, j, _)| (i, j));
    let mut tri_mat = TriMat::with_capacity(shape, triplets.len());
    let mut iter = triplets.into_iter().peekable();
    while let Some((i, j, mut v)) = iter.next() {
        while let Some((_, _, w)) = iter.next_if(|&(i2, j2, _)| (i2, j2) == (i, j)) {
            v += w
        }
        if v.abs() >= ZERO_TOL {
            tri_mat.add_triplet(i, j, v)
        }
    }
    (tri_mat.to_csr(), tri_mat.to_csc())
}

/// Serialized form of a `SparseProblem`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct FrozenProblem {
    matrix: CsMat<f64>,
    obj: Vec<f64>,
    rhs: Vec<f64>,
    sense: Vec<Sense>,
    var_type: Vec<VarType>,
}

impl From<SparseProblem> for FrozenProblem {
    fn from(pb: SparseProblem) -> Self {
        Self {
            matrix: pb.by_row,
            obj: pb.obj,
            rhs: pb.rhs,
            sense: pb.sense,
            var_type: pb.var_type,
        }
    }
}

impl TryFrom<FrozenProblem> for SparseProblem {
    type Error = ModelError;

    fn try_from(frozen: FrozenProblem) -> Result<Self, ModelError> {
        check_len("senses", frozen.rhs.len(), frozen.sense.len())?;
        let rows = frozen.sense.into_iter().zip(frozen.rhs).collect();
        Self::new(frozen.matrix, frozen.obj, rows, frozen.var_type)
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), ModelError> {
    if expected == got {
        Ok(())
    } else {
        Err(ModelError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

impl ProblemModel for SparseProblem {
    fn num_rows(&self) -> usize {
        self.by_row.rows()
    }
    fn num_cols(&self) -> usize {
        self.by_row.cols()
    }
    fn num_nonzeros(&self) -> usize {
        self.by_row.nnz()
    }
    fn row(&self, i: usize) -> CsVecView<'_, f64> {
        self.by_row
            .outer_view(i)
            .unwrap_or_else(|| panic!("Row {} out of range ({} rows)", i, self.num_rows()))
    }
    fn col(&self, j: usize) -> CsVecView<'_, f64> {
        self.by_col
            .outer_view(j)
            .unwrap_or_else(|| panic!("Column {} out of range ({} columns)", j, self.num_cols()))
    }
    fn objective(&self, j: usize) -> f64 {
        self.obj[j]
    }
    fn rhs(&self, i: usize) -> f64 {
        self.rhs[i]
    }
    fn sense(&self, i: usize) -> Sense {
        self.sense[i]
    }
    fn is_binary(&self, j: usize) -> bool {
        self.var_type[j] == VarType::Binary
    }
    fn is_integer(&self, j: usize) -> bool {
        self.var_type[j] != VarType::Continuous
    }
}

/// Incremental construction of a `SparseProblem`, row by row.
///
/// Columns must be declared before the rows that use them.
/// Entries repeated in a row are summed.
#[derive(Clone, Debug, Default)]
pub struct ProblemBuilder {
    triplets: Vec<(usize, usize, f64)>,
    obj: Vec<f64>,
    var_type: Vec<VarType>,
    rows: Vec<(Sense, f64)>,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Declare a variable and return its index.
    pub fn add_column(&mut self, obj: f64, var_type: VarType) -> usize {
        self.obj.push(obj);
        self.var_type.push(var_type);
        self.obj.len() - 1
    }
    /// Declare `n` variables of the same type with objective coefficient `obj`.
    pub fn add_columns(&mut self, n: usize, obj: f64, var_type: VarType) -> &mut Self {
        for _ in 0..n {
            let _ = self.add_column(obj, var_type);
        }
        self
    }
    /// Add the constraint `coefs . x (sense) rhs` and return its index.
    pub fn add_row(
        &mut self,
        sense: Sense,
        rhs: f64,
        coefs: &[(usize, f64)],
    ) -> Result<usize, ModelError> {
        let row = self.rows.len();
        let cols = self.obj.len();
        for &(col, val) in coefs {
            if col >= cols {
                return Err(ModelError::ColumnOutOfRange { row, col, cols });
            }
            if !val.is_finite() {
                return Err(ModelError::NonFiniteCoefficient { row, col });
            }
        }
        if !rhs.is_finite() {
            return Err(ModelError::NonFiniteRhs(row));
        }
        self.triplets
            .extend(coefs.iter().map(|&(col, val)| (row, col, val)));
        self.rows.push((sense, rhs));
        Ok(row)
    }
    /// Finalize the problem.
    ///
    /// Entries that sum to zero are not stored.
    pub fn build(self) -> SparseProblem {
        let shape = (self.rows.len(), self.obj.len());
        let (by_row, by_col) = compress(shape, self.triplets);
        let (sense, rhs) = self.rows.into_iter().unzip();
        SparseProblem {
            by_row,
            by_col,
            obj: self.obj,
            rhs,
            sense,
            var_type: self.var_type,
        }
    }
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small() -> SparseProblem {
        let mut b = ProblemBuilder::new();
        let x = b.add_column(1., VarType::Binary);
        let y = b.add_column(-2., VarType::Integer);
        let z = b.add_column(0.5, VarType::Continuous);
        b.add_row(Sense::LessEqual, 4., &[(x, 1.), (y, 2.), (z, 3.)])
            .unwrap();
        b.add_row(Sense::Equal, 0., &[(x, 1.), (z, -1.)]).unwrap();
        b.build()
    }

    #[test]
    fn both_orders() {
        let pb = small();
        assert_eq!(pb.num_rows(), 2);
        assert_eq!(pb.num_cols(), 3);
        assert_eq!(pb.num_nonzeros(), 5);
        assert_eq!(pb.row(0).indices(), &[0, 1, 2]);
        assert_eq!(pb.row(1).data(), &[1., -1.]);
        assert_eq!(pb.col(2).indices(), &[0, 1]);
        assert_eq!(pb.col(2).data(), &[3., -1.]);
        assert_eq!(pb.row_degree(0), 3);
        assert_eq!(pb.col_degree(1), 1);
        assert_eq!(pb.var_type(0), VarType::Binary);
        assert_eq!(pb.var_type(1), VarType::Integer);
        assert!(pb.is_integer(1));
        assert!(!pb.is_binary(1));
        assert_eq!(pb.sense(1), Sense::Equal);
        assert_eq!(pb.rhs(0), 4.);
        assert_eq!(pb.objective(2), 0.5);
    }

    #[test]
    fn duplicates_are_summed() {
        let mut b = ProblemBuilder::new();
        let _ = b.add_columns(3, 0., VarType::Binary);
        b.add_row(Sense::GreaterEqual, 1., &[(0, 1.), (1, 1.), (0, 2.)])
            .unwrap();
        b.add_row(
            Sense::LessEqual,
            1.,
            &[(0, 1.), (0, -1.), (1, 1.), (2, 0.), (1, 0.)],
        )
        .unwrap();
        let pb = b.build();
        assert_eq!(pb.row(0).data(), &[3., 1.]);
        assert_eq!(pb.row(1).indices(), &[1]);
        assert_eq!(pb.num_nonzeros(), 3);
        assert_eq!(pb.col_degree(0), 1);
    }

    #[test]
    fn builder_errors() {
        let mut b = ProblemBuilder::new();
        let _ = b.add_column(0., VarType::Continuous);
        assert_eq!(
            b.add_row(Sense::Equal, 1., &[(3, 1.)]),
            Err(ModelError::ColumnOutOfRange {
                row: 0,
                col: 3,
                cols: 1
            })
        );
        assert_eq!(
            b.add_row(Sense::Equal, f64::NAN, &[(0, 1.)]),
            Err(ModelError::NonFiniteRhs(0))
        );
        assert_eq!(
            b.add_row(Sense::Equal, 0., &[(0, f64::INFINITY)]),
            Err(ModelError::NonFiniteCoefficient { row: 0, col: 0 })
        );
    }

    #[test]
    fn from_matrix() {
        let pb = small();
        let csc = pb.matrix().to_other_storage();
        let rows = vec![(Sense::LessEqual, 4.), (Sense::Equal, 0.)];
        let types = vec![VarType::Binary, VarType::Integer, VarType::Continuous];
        let rebuilt = SparseProblem::new(csc, vec![1., -2., 0.5], rows.clone(), types.clone());
        assert_eq!(rebuilt, Ok(pb));
        let err = SparseProblem::new(small().matrix().clone(), vec![1.], rows, types);
        assert_eq!(
            err,
            Err(ModelError::LengthMismatch {
                what: "objective coefficients",
                expected: 3,
                got: 1
            })
        );
    }

    #[test]
    fn stored_zeros_are_dropped() {
        let mut tri_mat = TriMat::new((1, 2));
        tri_mat.add_triplet(0, 0, 0.);
        tri_mat.add_triplet(0, 1, 2.);
        let pb = SparseProblem::new(
            tri_mat.to_csr(),
            vec![0.; 2],
            vec![(Sense::Equal, 1.)],
            vec![VarType::Binary; 2],
        )
        .unwrap();
        assert_eq!(pb.num_nonzeros(), 1);
        assert_eq!(pb.col_degree(0), 0);
        assert_eq!(pb.row(0).data(), &[2.]);
    }

    #[test]
    fn random_is_seeded() {
        let pb1 = SparseProblem::random(20, 15, 0.3, &mut StdRng::seed_from_u64(7));
        let pb2 = SparseProblem::random(20, 15, 0.3, &mut StdRng::seed_from_u64(7));
        assert_eq!(pb1, pb2);
        assert_eq!(pb1.num_rows(), 20);
        assert_eq!(pb1.num_cols(), 15);
    }

    #[test]
    fn sense_display() {
        assert_eq!(format!("{}{}", Sense::Equal, Sense::GreaterEqual), "EG");
    }
}
