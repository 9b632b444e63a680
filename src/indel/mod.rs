//! Indel calls in the Bambino coordinate convention.
//!
//! An [`IndelCall`] is one row of the upstream classifier's output: a
//! chromosome, the 1-based position of the first base after the anchor, a
//! ref/alt pair where exactly one side is the `-` sentinel, and the
//! already-computed annotations that end up in INFO/FORMAT.

mod alleles;
mod annotations;

pub use alleles::{reconstruct_alleles, VcfAlleles};
pub use annotations::{AlleleDepth, Annotations, ClassProbabilities};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Allele value marking the empty side of a Bambino indel.
pub const SENTINEL: &str = "-";

/// Prefix carried by canonical chromosome names.
pub const CHR_PREFIX: &str = "chr";

/// Errors raised when an input row violates the Bambino allele contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndelError {
    /// Both ref and alt are the `-` sentinel.
    #[error("{chrom}:{pos}: both ref and alt are '-'")]
    BothSentinel {
        /// Chromosome of the offending call.
        chrom: String,
        /// Bambino position of the offending call.
        pos: u64,
    },

    /// Neither ref nor alt is the `-` sentinel, so the call is not an indel.
    #[error("{chrom}:{pos}: neither ref '{ref_allele}' nor alt '{alt_allele}' is '-'")]
    NoSentinel {
        /// Chromosome of the offending call.
        chrom: String,
        /// Bambino position of the offending call.
        pos: u64,
        /// Ref allele as given.
        ref_allele: String,
        /// Alt allele as given.
        alt_allele: String,
    },

    /// The non-sentinel allele is empty.
    #[error("{chrom}:{pos}: indel sequence is empty")]
    EmptySequence {
        /// Chromosome of the offending call.
        chrom: String,
        /// Bambino position of the offending call.
        pos: u64,
    },

    /// Position 1 has no base to its left to serve as anchor.
    #[error("{chrom}:{pos}: position must be at least 2 to have an anchor base")]
    NoAnchor {
        /// Chromosome of the offending call.
        chrom: String,
        /// Bambino position of the offending call.
        pos: u64,
    },
}

/// Insertion or deletion, decided by which allele carries the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndelKind {
    /// `ref == "-"`; the inserted bases live in `alt`.
    Insertion,
    /// `alt == "-"`; the deleted bases live in `ref`.
    Deletion,
}

impl fmt::Display for IndelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndelKind::Insertion => f.write_str("insertion"),
            IndelKind::Deletion => f.write_str("deletion"),
        }
    }
}

/// One validated indel call.
///
/// Constructed through [`IndelCall::new`], which enforces the sentinel
/// invariant; the `with_*` methods only attach annotation data.
#[derive(Debug, Clone, PartialEq)]
pub struct IndelCall {
    chrom: Arc<str>,
    pos: u64,
    kind: IndelKind,
    sequence: String,
    dbsnp: Option<String>,
    filter_tag: Option<String>,
    annotations: Annotations,
}

impl IndelCall {
    /// Validate a Bambino-style call.
    ///
    /// `chrom` is canonicalized to carry the `chr` prefix. Alleles are
    /// upper-cased.
    pub fn new(
        chrom: &str,
        pos: u64,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Result<Self, IndelError> {
        let chrom = canonical_chrom(chrom);
        let ref_allele = ref_allele.trim();
        let alt_allele = alt_allele.trim();

        let (kind, sequence) = match (ref_allele == SENTINEL, alt_allele == SENTINEL) {
            (true, true) => {
                return Err(IndelError::BothSentinel {
                    chrom: chrom.to_string(),
                    pos,
                })
            }
            (false, false) => {
                return Err(IndelError::NoSentinel {
                    chrom: chrom.to_string(),
                    pos,
                    ref_allele: ref_allele.to_string(),
                    alt_allele: alt_allele.to_string(),
                })
            }
            (true, false) => (IndelKind::Insertion, alt_allele),
            (false, true) => (IndelKind::Deletion, ref_allele),
        };

        if sequence.is_empty() {
            return Err(IndelError::EmptySequence {
                chrom: chrom.to_string(),
                pos,
            });
        }
        if pos < 2 {
            return Err(IndelError::NoAnchor {
                chrom: chrom.to_string(),
                pos,
            });
        }

        Ok(Self {
            chrom,
            pos,
            kind,
            sequence: sequence.to_ascii_uppercase(),
            dbsnp: None,
            filter_tag: None,
            annotations: Annotations::default(),
        })
    }

    /// Attach the raw dbSNP text.
    pub fn with_dbsnp(mut self, dbsnp: impl Into<String>) -> Self {
        self.dbsnp = Some(dbsnp.into());
        self
    }

    /// Attach the reclassification tag.
    pub fn with_filter_tag(mut self, tag: impl Into<String>) -> Self {
        self.filter_tag = Some(tag.into());
        self
    }

    /// Attach the annotation columns.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Canonical (`chr`-prefixed) chromosome name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Bambino position: first base after the anchor, 1-based.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// 1-based position of the anchor base, i.e. the VCF `POS`.
    pub fn anchor_pos(&self) -> u64 {
        self.pos - 1
    }

    /// Whether this call inserts or deletes bases.
    pub fn kind(&self) -> IndelKind {
        self.kind
    }

    /// Inserted or deleted bases (never the sentinel).
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Bambino ref allele, `-` for insertions.
    pub fn ref_allele(&self) -> &str {
        match self.kind {
            IndelKind::Insertion => SENTINEL,
            IndelKind::Deletion => &self.sequence,
        }
    }

    /// Bambino alt allele, `-` for deletions.
    pub fn alt_allele(&self) -> &str {
        match self.kind {
            IndelKind::Insertion => &self.sequence,
            IndelKind::Deletion => SENTINEL,
        }
    }

    /// Raw dbSNP text, if any.
    pub fn dbsnp(&self) -> Option<&str> {
        self.dbsnp.as_deref()
    }

    /// Reclassification tag, if any.
    pub fn filter_tag(&self) -> Option<&str> {
        self.filter_tag.as_deref()
    }

    /// Annotation columns.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Add the `chr` prefix when missing.
pub fn canonical_chrom(chrom: &str) -> Arc<str> {
    let chrom = chrom.trim();
    if chrom.starts_with(CHR_PREFIX) {
        Arc::from(chrom)
    } else {
        Arc::from(format!("{CHR_PREFIX}{chrom}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_is_detected_from_ref_sentinel() {
        let call = IndelCall::new("chr1", 100, "-", "ca").unwrap();
        assert_eq!(call.kind(), IndelKind::Insertion);
        assert_eq!(call.sequence(), "CA");
        assert_eq!(call.ref_allele(), "-");
        assert_eq!(call.alt_allele(), "CA");
        assert_eq!(call.anchor_pos(), 99);
    }

    #[test]
    fn deletion_is_detected_from_alt_sentinel() {
        let call = IndelCall::new("chr1", 100, "AG", "-").unwrap();
        assert_eq!(call.kind(), IndelKind::Deletion);
        assert_eq!(call.ref_allele(), "AG");
        assert_eq!(call.alt_allele(), "-");
    }

    #[test]
    fn unprefixed_chromosome_is_canonicalized() {
        let call = IndelCall::new("7", 55, "-", "T").unwrap();
        assert_eq!(call.chrom(), "chr7");
        assert_eq!(canonical_chrom("chrX").as_ref(), "chrX");
    }

    #[test]
    fn both_sentinels_are_rejected() {
        let err = IndelCall::new("chr2", 10, "-", "-").unwrap_err();
        assert_eq!(
            err,
            IndelError::BothSentinel {
                chrom: "chr2".to_string(),
                pos: 10
            }
        );
        assert!(err.to_string().contains("chr2:10"));
    }

    #[test]
    fn missing_sentinel_is_rejected() {
        let err = IndelCall::new("chr2", 10, "A", "G").unwrap_err();
        assert!(matches!(err, IndelError::NoSentinel { .. }));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = IndelCall::new("chr2", 10, "-", "").unwrap_err();
        assert!(matches!(err, IndelError::EmptySequence { .. }));
    }

    #[test]
    fn first_base_has_no_anchor() {
        let err = IndelCall::new("chr2", 1, "-", "A").unwrap_err();
        assert!(matches!(err, IndelError::NoAnchor { pos: 1, .. }));
    }
}
