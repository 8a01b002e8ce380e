//! Saving and loading frozen problems.
//!
//! A snapshot is the `bincode` encoding of a `SparseProblem`, so that the
//! features of an instance can be recomputed without the tool that built it.
//! Loading checks the problem like `SparseProblem::new` does: a snapshot
//! with inconsistent lengths or non-finite values is an `Encoding` error.

use crate::model::SparseProblem;
use log::*;
use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of snapshot files.
pub const EXTENSION: &str = "lp.dat";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("cannot decode snapshot: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Path of the snapshot called `name`.
pub fn file_path(name: &str) -> PathBuf {
    let mut filename = PathBuf::from(name);
    let _ = filename.set_extension(EXTENSION);
    filename
}

/// Write `pb` in the file `path`.
pub fn save(pb: &SparseProblem, path: &Path) -> Result<(), SnapshotError> {
    info!("Saving {}", path.display());
    let mut buf = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut buf, pb)?;
    buf.flush()?;
    Ok(())
}

/// Read the problem stored in the file `path`.
pub fn load(path: &Path) -> Result<SparseProblem, SnapshotError> {
    debug!("Loading {}", path.display());
    let mut buf = BufReader::new(File::open(path)?);
    let pb = bincode::deserialize_from(&mut buf)?;
    trace!("Done");
    Ok(pb)
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProblemModel, Sense, VarType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sprs::{CsMat, TriMat};

    fn one_by_three() -> CsMat<f64> {
        let mut tri_mat = TriMat::new((1, 3));
        for j in 0..3 {
            tri_mat.add_triplet(0, j, 1.)
        }
        tri_mat.to_csr()
    }

    fn write_raw<T: serde::Serialize>(path: &Path, value: &T) {
        let mut buf = BufWriter::new(File::create(path).unwrap());
        bincode::serialize_into(&mut buf, value).unwrap();
        buf.flush().unwrap();
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_path("random"));
        let pb = SparseProblem::random(30, 12, 0.2, &mut StdRng::seed_from_u64(3));
        save(&pb, &path).unwrap();
        assert_eq!(load(&path).unwrap(), pb);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match load(&dir.path().join("nothing")) {
            Err(SnapshotError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage");
        std::fs::write(&path, [1, 2, 3]).unwrap();
        assert!(matches!(load(&path), Err(SnapshotError::Encoding(_))));
    }

    #[test]
    fn inconsistent_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_path("short"));
        // three columns but a single objective coefficient and type
        let fields = (
            one_by_three(),
            vec![1.],
            vec![1.],
            vec![Sense::LessEqual],
            vec![VarType::Binary],
        );
        write_raw(&path, &fields);
        match load(&path) {
            Err(SnapshotError::Encoding(e)) => {
                assert!(e.to_string().contains("objective coefficients"), "{e}")
            }
            other => panic!("unexpected {other:?}"),
        }
        // one row but two senses
        let fields = (
            one_by_three(),
            vec![0.; 3],
            vec![1.],
            vec![Sense::LessEqual, Sense::Equal],
            vec![VarType::Binary; 3],
        );
        write_raw(&path, &fields);
        assert!(matches!(load(&path), Err(SnapshotError::Encoding(_))));
    }

    #[test]
    fn non_finite_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_path("nan"));
        let fields = (
            one_by_three(),
            vec![0.; 3],
            vec![f64::NAN],
            vec![Sense::Equal],
            vec![VarType::Continuous; 3],
        );
        write_raw(&path, &fields);
        assert!(matches!(load(&path), Err(SnapshotError::Encoding(_))));
        let fields = (
            one_by_three(),
            vec![0.; 3],
            vec![2.],
            vec![Sense::Equal],
            vec![VarType::Continuous; 3],
        );
        write_raw(&path, &fields);
        assert_eq!(load(&path).unwrap().num_nonzeros(), 3);
    }

    #[test]
    fn extension() {
        assert_eq!(file_path("knapsack"), PathBuf::from("knapsack.lp.dat"));
    }
}
