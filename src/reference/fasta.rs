use std::collections::HashMap;
use std::path::Path;

use rust_htslib::errors::Error as HtslibError;
use rust_htslib::faidx;

use super::{ReferenceBaseSource, ReferenceError};

/// Indexed FASTA reference backed by htslib's faidx.
///
/// Contig lengths come from the faidx index and bound every lookup.
pub struct FastaReference {
    reader: faidx::Reader,
    contigs: HashMap<String, u64>,
}

impl std::fmt::Debug for FastaReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastaReference")
            .field("contigs", &self.contigs.len())
            .finish()
    }
}

impl FastaReference {
    /// Open an indexed FASTA. htslib builds the `.fai` when it is missing.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let open_error = |source| ReferenceError::Open {
            path: path.display().to_string(),
            source,
        };
        // fai_load does not report a missing file on its own.
        if !path.exists() {
            return Err(open_error(HtslibError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }
        let reader = faidx::Reader::from_path(path).map_err(open_error)?;
        let contigs = reader
            .seq_names()
            .map_err(open_error)?
            .into_iter()
            .map(|name| {
                let length = reader.fetch_seq_len(&name);
                (name, length)
            })
            .collect();
        Ok(Self { reader, contigs })
    }

    /// Names of the contigs in the index.
    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }
}

impl ReferenceBaseSource for FastaReference {
    fn base_at(&self, contig: &str, position: u64) -> Result<u8, ReferenceError> {
        let length = *self
            .contigs
            .get(contig)
            .ok_or_else(|| ReferenceError::UnknownContig(contig.to_string()))?;
        if position == 0 || position > length {
            return Err(ReferenceError::OutOfRange {
                contig: contig.to_string(),
                position,
                length,
            });
        }

        // faidx coordinates are 0-based with an inclusive end.
        let offset = (position - 1) as usize;
        let sequence = self
            .reader
            .fetch_seq_string(contig, offset, offset)
            .map_err(|err| ReferenceError::Fetch {
                contig: contig.to_string(),
                position,
                message: err.to_string(),
            })?;

        sequence
            .bytes()
            .next()
            .map(|base| base.to_ascii_uppercase())
            .ok_or_else(|| ReferenceError::Fetch {
                contig: contig.to_string(),
                position,
                message: "empty sequence returned".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_fasta(dir: &Path) -> PathBuf {
        let path = dir.join("ref.fa");
        let mut file = File::create(&path).unwrap();
        writeln!(file, ">chr1").unwrap();
        writeln!(file, "ATGATGAT").unwrap();
        writeln!(file, "TAGA").unwrap();
        writeln!(file, ">chr2").unwrap();
        writeln!(file, "ccgg").unwrap();
        path
    }

    #[test]
    fn fetches_single_bases_across_lines() {
        let dir = tempfile::tempdir().unwrap();
        let reference = FastaReference::from_path(write_fasta(dir.path())).unwrap();
        assert_eq!(reference.base_at("chr1", 1).unwrap(), b'A');
        assert_eq!(reference.base_at("chr1", 9).unwrap(), b'T');
        assert_eq!(reference.base_at("chr2", 4).unwrap(), b'G');
    }

    #[test]
    fn reports_unknown_contig_and_range() {
        let dir = tempfile::tempdir().unwrap();
        let reference = FastaReference::from_path(write_fasta(dir.path())).unwrap();
        assert!(matches!(
            reference.base_at("chr3", 1),
            Err(ReferenceError::UnknownContig(_))
        ));
        assert!(matches!(
            reference.base_at("chr2", 5),
            Err(ReferenceError::OutOfRange { length: 4, .. })
        ));
    }

    #[test]
    fn index_lists_contigs() {
        let dir = tempfile::tempdir().unwrap();
        let reference = FastaReference::from_path(write_fasta(dir.path())).unwrap();
        let mut names: Vec<_> = reference.contig_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["chr1", "chr2"]);
        assert_eq!(
            reference.base_at("chr1", 13).unwrap_err().to_string(),
            "position 13 is outside contig 'chr1' (length 12)"
        );
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FastaReference::from_path(dir.path().join("absent.fa")).unwrap_err();
        assert!(matches!(err, ReferenceError::Open { .. }));
    }
}
