//! Identifiers, names and storage of the computed features.
//!
//! Every feature has a fixed index in the output vector. The mapping between
//! indices and display names is the table written in `feature_table!` below
//! and never changes.

use ndarray::{Array1, ArrayView1};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;
use std::ops::Index;
use std::sync::OnceLock;

macro_rules! feature_table {
    ($($variant:ident => $name:literal,)*) => {
        /// Identifier of a feature, its discriminant being its index in a `FeatureVector`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum Feature {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl Feature {
            /// Every feature, by increasing index.
            pub const ALL: &'static [Feature] = &[$(Feature::$variant,)*];
            /// Length of a `FeatureVector`.
            pub const COUNT: usize = Feature::ALL.len();
            const NAMES: &'static [&'static str] = &[$($name,)*];
        }
    };
}

feature_table! {
    // problem size
    Cols => "cols",
    Rows => "rows",
    ColsPerRow => "colsPerRow",
    Equalities => "equalities",
    PercEqualities => "percEqualities",
    Inequalities => "inequalities",
    Nz => "nz",
    Density => "density",

    // column types
    Bin => "bin",
    GenInt => "genInt",
    Integer => "integer",
    Continuous => "continuous",
    PercInteger => "percInteger",
    PercBin => "percBin",

    // row structure, count then percentage of rows
    RowsPartitioning => "rPartitioning",
    PercRowsPartitioning => "rPercPartitioning",
    RowsPacking => "rPacking",
    PercRowsPacking => "rPercPacking",
    RowsCovering => "rCovering",
    PercRowsCovering => "rPercCovering",
    RowsCardinality => "rCardinality",
    PercRowsCardinality => "rPercCardinality",
    RowsKnapsack => "rKnapsack",
    PercRowsKnapsack => "rPercKnapsack",
    RowsIntegerKnapsack => "rIntegerKnapsack",
    PercRowsIntegerKnapsack => "rPercIntegerKnapsack",
    RowsInvKnapsack => "rInvKnapsack",
    PercRowsInvKnapsack => "rPercInvKnapsack",
    RowsSingleton => "rSingleton",
    PercRowsSingleton => "rPercSingleton",
    RowsAggr => "rAggre",
    PercRowsAggr => "rPercAggre",
    RowsPrec => "rPrec",
    PercRowsPrec => "rPercPrec",
    RowsVarBnd => "rVarBnd",
    PercRowsVarBnd => "rPercVarBnd",
    RowsBinPacking => "rBinPacking",
    PercRowsBinPacking => "rPercBinPacking",
    RowsMixedBin => "rMixedBin",
    PercRowsMixedBin => "rPercMixedBin",
    RowsGenInt => "rGenInt",
    PercRowsGenInt => "rPercGenInt",
    RowsFlowBin => "rFlowBin",
    PercRowsFlowBin => "rPercFlowBin",
    RowsFlowMx => "rFlowMx",
    PercRowsFlowMx => "rPercFlowMx",

    // coefficients of the constraint matrix
    AMin => "aMin",
    AMax => "aMax",
    AAvg => "aAvg",
    AStdDev => "aStdDev",
    ARatioLsa => "aRatioLSA",
    AAllInt => "aAllInt",
    APercInt => "aPercInt",

    // objective coefficients
    ObjMin => "objMin",
    ObjMax => "objMax",
    ObjAvg => "objAvg",
    ObjStdDev => "objStdDev",
    ObjRatioLsa => "objRatioLSA",
    ObjAllInt => "objAllInt",
    ObjPercInt => "objPercInt",

    // right-hand sides
    RhsMin => "rhsMin",
    RhsMax => "rhsMax",
    RhsAvg => "rhsAvg",
    RhsStdDev => "rhsStdDev",
    RhsRatioLsa => "rhsRatioLSA",
    RhsAllInt => "rhsAllInt",
    RhsPercInt => "rhsPercInt",

    // nonzero degrees
    RowNzMin => "rowNzMin",
    RowNzMax => "rowNzMax",
    RowNzAvg => "rowNzAvg",
    RowNzStdDev => "rowNzStdDev",
    ColNzMin => "colNzMin",
    ColNzMax => "colNzMax",
    ColNzAvg => "colNzAvg",
    ColNzStdDev => "colNzStdDev",

    // row degree histograms
    RowsLessE4Nz => "rowsLessE4Nz",
    RowsLessE8Nz => "rowsLessE8Nz",
    RowsLessE16Nz => "rowsLessE16Nz",
    RowsLessE32Nz => "rowsLessE32Nz",
    RowsLessE64Nz => "rowsLessE64Nz",
    RowsLessE128Nz => "rowsLessE128Nz",
    RowsLessE256Nz => "rowsLessE256Nz",
    RowsLessE512Nz => "rowsLessE512Nz",
    RowsLessE1024Nz => "rowsLessE1024Nz",
    PercRowsLessE4Nz => "percRowsLessE4Nz",
    PercRowsLessE8Nz => "percRowsLessE8Nz",
    PercRowsLessE16Nz => "percRowsLessE16Nz",
    PercRowsLessE32Nz => "percRowsLessE32Nz",
    PercRowsLessE64Nz => "percRowsLessE64Nz",
    PercRowsLessE128Nz => "percRowsLessE128Nz",
    PercRowsLessE256Nz => "percRowsLessE256Nz",
    PercRowsLessE512Nz => "percRowsLessE512Nz",
    PercRowsLessE1024Nz => "percRowsLessE1024Nz",
    RowsLeast4Nz => "rowsLeast4Nz",
    RowsLeast8Nz => "rowsLeast8Nz",
    RowsLeast16Nz => "rowsLeast16Nz",
    RowsLeast32Nz => "rowsLeast32Nz",
    RowsLeast64Nz => "rowsLeast64Nz",
    RowsLeast128Nz => "rowsLeast128Nz",
    RowsLeast256Nz => "rowsLeast256Nz",
    RowsLeast512Nz => "rowsLeast512Nz",
    RowsLeast1024Nz => "rowsLeast1024Nz",
    RowsLeast2048Nz => "rowsLeast2048Nz",
    RowsLeast4096Nz => "rowsLeast4096Nz",
    PercRowsLeast4Nz => "percRowsLeast4Nz",
    PercRowsLeast8Nz => "percRowsLeast8Nz",
    PercRowsLeast16Nz => "percRowsLeast16Nz",
    PercRowsLeast32Nz => "percRowsLeast32Nz",
    PercRowsLeast64Nz => "percRowsLeast64Nz",
    PercRowsLeast128Nz => "percRowsLeast128Nz",
    PercRowsLeast256Nz => "percRowsLeast256Nz",
    PercRowsLeast512Nz => "percRowsLeast512Nz",
    PercRowsLeast1024Nz => "percRowsLeast1024Nz",
    PercRowsLeast2048Nz => "percRowsLeast2048Nz",
    PercRowsLeast4096Nz => "percRowsLeast4096Nz",

    // column degree histograms
    ColsLessE4Nz => "colsLessE4Nz",
    ColsLessE8Nz => "colsLessE8Nz",
    ColsLessE16Nz => "colsLessE16Nz",
    ColsLessE32Nz => "colsLessE32Nz",
    ColsLessE64Nz => "colsLessE64Nz",
    ColsLessE128Nz => "colsLessE128Nz",
    ColsLessE256Nz => "colsLessE256Nz",
    ColsLessE512Nz => "colsLessE512Nz",
    ColsLessE1024Nz => "colsLessE1024Nz",
    PercColsLessE4Nz => "percColsLessE4Nz",
    PercColsLessE8Nz => "percColsLessE8Nz",
    PercColsLessE16Nz => "percColsLessE16Nz",
    PercColsLessE32Nz => "percColsLessE32Nz",
    PercColsLessE64Nz => "percColsLessE64Nz",
    PercColsLessE128Nz => "percColsLessE128Nz",
    PercColsLessE256Nz => "percColsLessE256Nz",
    PercColsLessE512Nz => "percColsLessE512Nz",
    PercColsLessE1024Nz => "percColsLessE1024Nz",
    ColsLeast4Nz => "colsLeast4Nz",
    ColsLeast8Nz => "colsLeast8Nz",
    ColsLeast16Nz => "colsLeast16Nz",
    ColsLeast32Nz => "colsLeast32Nz",
    ColsLeast64Nz => "colsLeast64Nz",
    ColsLeast128Nz => "colsLeast128Nz",
    ColsLeast256Nz => "colsLeast256Nz",
    ColsLeast512Nz => "colsLeast512Nz",
    ColsLeast1024Nz => "colsLeast1024Nz",
    ColsLeast2048Nz => "colsLeast2048Nz",
    ColsLeast4096Nz => "colsLeast4096Nz",
    PercColsLeast4Nz => "percColsLeast4Nz",
    PercColsLeast8Nz => "percColsLeast8Nz",
    PercColsLeast16Nz => "percColsLeast16Nz",
    PercColsLeast32Nz => "percColsLeast32Nz",
    PercColsLeast64Nz => "percColsLeast64Nz",
    PercColsLeast128Nz => "percColsLeast128Nz",
    PercColsLeast256Nz => "percColsLeast256Nz",
    PercColsLeast512Nz => "percColsLeast512Nz",
    PercColsLeast1024Nz => "percColsLeast1024Nz",
    PercColsLeast2048Nz => "percColsLeast2048Nz",
    PercColsLeast4096Nz => "percColsLeast4096Nz",
}

impl Feature {
    /// Position of the feature in a `FeatureVector`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
    /// Feature at position `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
    /// Display name of the feature.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Counter and percentage features of each level of a degree histogram,
/// by increasing threshold.
#[derive(Debug)]
pub(crate) struct Ladder {
    pub at_most: [(Feature, Feature); 9],
    pub at_least: [(Feature, Feature); 11],
}

pub(crate) const ROW_LADDER: Ladder = Ladder {
    at_most: [
        (Feature::RowsLessE4Nz, Feature::PercRowsLessE4Nz),
        (Feature::RowsLessE8Nz, Feature::PercRowsLessE8Nz),
        (Feature::RowsLessE16Nz, Feature::PercRowsLessE16Nz),
        (Feature::RowsLessE32Nz, Feature::PercRowsLessE32Nz),
        (Feature::RowsLessE64Nz, Feature::PercRowsLessE64Nz),
        (Feature::RowsLessE128Nz, Feature::PercRowsLessE128Nz),
        (Feature::RowsLessE256Nz, Feature::PercRowsLessE256Nz),
        (Feature::RowsLessE512Nz, Feature::PercRowsLessE512Nz),
        (Feature::RowsLessE1024Nz, Feature::PercRowsLessE1024Nz),
    ],
    at_least: [
        (Feature::RowsLeast4Nz, Feature::PercRowsLeast4Nz),
        (Feature::RowsLeast8Nz, Feature::PercRowsLeast8Nz),
        (Feature::RowsLeast16Nz, Feature::PercRowsLeast16Nz),
        (Feature::RowsLeast32Nz, Feature::PercRowsLeast32Nz),
        (Feature::RowsLeast64Nz, Feature::PercRowsLeast64Nz),
        (Feature::RowsLeast128Nz, Feature::PercRowsLeast128Nz),
        (Feature::RowsLeast256Nz, Feature::PercRowsLeast256Nz),
        (Feature::RowsLeast512Nz, Feature::PercRowsLeast512Nz),
        (Feature::RowsLeast1024Nz, Feature::PercRowsLeast1024Nz),
        (Feature::RowsLeast2048Nz, Feature::PercRowsLeast2048Nz),
        (Feature::RowsLeast4096Nz, Feature::PercRowsLeast4096Nz),
    ],
};

pub(crate) const COL_LADDER: Ladder = Ladder {
    at_most: [
        (Feature::ColsLessE4Nz, Feature::PercColsLessE4Nz),
        (Feature::ColsLessE8Nz, Feature::PercColsLessE8Nz),
        (Feature::ColsLessE16Nz, Feature::PercColsLessE16Nz),
        (Feature::ColsLessE32Nz, Feature::PercColsLessE32Nz),
        (Feature::ColsLessE64Nz, Feature::PercColsLessE64Nz),
        (Feature::ColsLessE128Nz, Feature::PercColsLessE128Nz),
        (Feature::ColsLessE256Nz, Feature::PercColsLessE256Nz),
        (Feature::ColsLessE512Nz, Feature::PercColsLessE512Nz),
        (Feature::ColsLessE1024Nz, Feature::PercColsLessE1024Nz),
    ],
    at_least: [
        (Feature::ColsLeast4Nz, Feature::PercColsLeast4Nz),
        (Feature::ColsLeast8Nz, Feature::PercColsLeast8Nz),
        (Feature::ColsLeast16Nz, Feature::PercColsLeast16Nz),
        (Feature::ColsLeast32Nz, Feature::PercColsLeast32Nz),
        (Feature::ColsLeast64Nz, Feature::PercColsLeast64Nz),
        (Feature::ColsLeast128Nz, Feature::PercColsLeast128Nz),
        (Feature::ColsLeast256Nz, Feature::PercColsLeast256Nz),
        (Feature::ColsLeast512Nz, Feature::PercColsLeast512Nz),
        (Feature::ColsLeast1024Nz, Feature::PercColsLeast1024Nz),
        (Feature::ColsLeast2048Nz, Feature::PercColsLeast2048Nz),
        (Feature::ColsLeast4096Nz, Feature::PercColsLeast4096Nz),
    ],
};

/// Immutable lookup table between feature indices and names.
///
/// Build it once (or use `FeatureTable::standard`) and pass it around by reference.
#[derive(Clone, Debug)]
pub struct FeatureTable {
    names: Vec<&'static str>,
    by_name: HashMap<&'static str, Feature>,
}

impl Default for FeatureTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureTable {
    pub fn new() -> Self {
        let names: Vec<_> = Feature::ALL.iter().map(|f| f.name()).collect();
        let by_name: HashMap<_, _> = Feature::ALL.iter().map(|&f| (f.name(), f)).collect();
        debug_assert_eq!(by_name.len(), names.len());
        Self { names, by_name }
    }
    /// A table shared by the whole process.
    pub fn standard() -> &'static Self {
        static TABLE: OnceLock<FeatureTable> = OnceLock::new();
        TABLE.get_or_init(Self::new)
    }
    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    /// Name of the feature at position `index`.
    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.names.get(index).copied()
    }
    /// Feature called `name`.
    pub fn feature(&self, name: &str) -> Option<Feature> {
        self.by_name.get(name).copied()
    }
    /// Position of the feature called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.feature(name).map(Feature::index)
    }
    /// Iterate on `(index, name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'static str)> + '_ {
        self.names.iter().copied().enumerate()
    }
}

/// Values of every feature of a problem, indexed by `Feature`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    data: Array1<f64>,
}

impl FeatureVector {
    pub(crate) fn zeros() -> Self {
        Self {
            data: Array1::zeros(Feature::COUNT),
        }
    }
    pub(crate) fn set(&mut self, feature: Feature, value: f64) {
        self.data[feature.index()] = value
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Value at position `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.data.view()
    }
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.to_vec()
    }
    pub fn into_array(self) -> Array1<f64> {
        self.data
    }
    /// Iterate on `(name, value)` pairs using the names of `table`.
    pub fn named<'a>(
        &'a self,
        table: &'a FeatureTable,
    ) -> impl Iterator<Item = (&'static str, f64)> + 'a {
        table
            .iter()
            .zip(self.data.iter())
            .map(|((_, name), &value)| (name, value))
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.data[feature.index()]
    }
}

impl Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, value) in self.named(FeatureTable::standard()) {
            writeln!(f, "{name:<22} {value}")?;
        }
        Ok(())
    }
}
