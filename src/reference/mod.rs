//! Reference sequence access for anchor bases.
//!
//! VCF indel alleles start with the reference base immediately left of the
//! event. [`AnchorLookup`] resolves that base from any [`ReferenceBaseSource`],
//! translating canonical `chr`-prefixed names into the naming convention of
//! the reference and alignments.

mod fasta;

pub use fasta::FastaReference;

use std::collections::HashMap;

use thiserror::Error;

use crate::indel::{IndelCall, CHR_PREFIX};

/// Errors raised while fetching reference bases.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The FASTA file or its index could not be opened.
    #[error("failed to open reference {path}: {source}")]
    Open {
        /// Path to the FASTA file.
        path: String,
        /// Underlying htslib error.
        #[source]
        source: rust_htslib::errors::Error,
    },

    /// The contig is not present in the reference.
    #[error("contig '{0}' not found in reference")]
    UnknownContig(String),

    /// The position lies outside the contig.
    #[error("position {position} is outside contig '{contig}' (length {length})")]
    OutOfRange {
        /// Contig name.
        contig: String,
        /// Requested 1-based position.
        position: u64,
        /// Contig length.
        length: u64,
    },

    /// htslib failed to return a sequence.
    #[error("failed to fetch {contig}:{position}: {message}")]
    Fetch {
        /// Contig name.
        contig: String,
        /// Requested 1-based position.
        position: u64,
        /// Description of the failure.
        message: String,
    },
}

/// Source of single reference bases.
pub trait ReferenceBaseSource {
    /// Base at 1-based `position` on `contig`, upper-cased.
    fn base_at(&self, contig: &str, position: u64) -> Result<u8, ReferenceError>;
}

impl<T: ReferenceBaseSource + ?Sized> ReferenceBaseSource for &T {
    fn base_at(&self, contig: &str, position: u64) -> Result<u8, ReferenceError> {
        (**self).base_at(contig, position)
    }
}

/// Chromosome naming convention of the reference and alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContigNaming {
    chr_prefixed: bool,
}

impl ContigNaming {
    /// Names carry `chr` (`chr1`, `chrX`).
    pub const PREFIXED: Self = Self { chr_prefixed: true };
    /// Names are bare (`1`, `X`).
    pub const BARE: Self = Self {
        chr_prefixed: false,
    };

    /// Naming from a prefix flag.
    pub fn new(chr_prefixed: bool) -> Self {
        Self { chr_prefixed }
    }

    /// Whether names carry the `chr` prefix.
    pub fn is_chr_prefixed(&self) -> bool {
        self.chr_prefixed
    }

    /// Translate a canonical name into this convention.
    pub fn contig_name<'a>(&self, canonical: &'a str) -> &'a str {
        if self.chr_prefixed {
            canonical
        } else {
            canonical.strip_prefix(CHR_PREFIX).unwrap_or(canonical)
        }
    }

    /// Infer the convention from a set of contig names.
    ///
    /// Returns `None` when no names are given.
    pub fn infer<'a, I>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = names.into_iter().peekable();
        names.peek()?;
        Some(Self::new(names.any(|name| name.starts_with(CHR_PREFIX))))
    }
}

impl Default for ContigNaming {
    fn default() -> Self {
        Self::PREFIXED
    }
}

/// Anchor base lookup for indel calls.
#[derive(Debug)]
pub struct AnchorLookup<R> {
    source: R,
    naming: ContigNaming,
}

impl<R: ReferenceBaseSource> AnchorLookup<R> {
    /// Combine a base source with the naming used to address it.
    pub fn new(source: R, naming: ContigNaming) -> Self {
        Self { source, naming }
    }

    /// Naming convention in use.
    pub fn naming(&self) -> ContigNaming {
        self.naming
    }

    /// Reference base immediately left of the call's event.
    pub fn anchor_base(&self, call: &IndelCall) -> Result<u8, ReferenceError> {
        let contig = self.naming.contig_name(call.chrom());
        self.source.base_at(contig, call.anchor_pos())
    }
}

/// In-memory reference keyed by contig name.
#[derive(Debug, Clone, Default)]
pub struct MemoryReference {
    contigs: HashMap<String, Vec<u8>>,
}

impl MemoryReference {
    /// Create an empty reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contig, replacing any existing sequence with the same name.
    pub fn with_contig(mut self, name: impl Into<String>, sequence: impl AsRef<[u8]>) -> Self {
        self.insert(name, sequence);
        self
    }

    /// Add a contig in place.
    pub fn insert(&mut self, name: impl Into<String>, sequence: impl AsRef<[u8]>) {
        self.contigs
            .insert(name.into(), sequence.as_ref().to_ascii_uppercase());
    }

    /// Contig names held by this reference.
    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }
}

impl ReferenceBaseSource for MemoryReference {
    fn base_at(&self, contig: &str, position: u64) -> Result<u8, ReferenceError> {
        let sequence = self
            .contigs
            .get(contig)
            .ok_or_else(|| ReferenceError::UnknownContig(contig.to_string()))?;
        position
            .checked_sub(1)
            .and_then(|offset| sequence.get(offset as usize))
            .copied()
            .ok_or(ReferenceError::OutOfRange {
                contig: contig.to_string(),
                position,
                length: sequence.len() as u64,
            })
    }
}
