//! # Bambino indel calls to VCF v4.2
//!
//! Converts classified indel calls, written in the Bambino convention (a
//! 1-based event position plus a `-` sentinel on the empty allele side), into
//! VCF records whose REF/ALT share an anchor base.
//!
//! ## Pipeline
//!
//! 1. **Table ingest**: read the tab-separated call table in its given order
//! 2. **Anchor lookup**: fetch the reference base left of each event
//! 3. **Allele reconstruction**: prepend the anchor, shift POS back by one
//! 4. **Field encoding**: INFO/FORMAT from declarative field tables
//! 5. **Document assembly**: header, then one line per call
//!
//! ## Usage Example
//!
//! ```
//! use chrono::NaiveDate;
//! use indel_vcf::reference::{AnchorLookup, ContigNaming, MemoryReference};
//! use indel_vcf::{render_vcf, ConversionConfig, IndelCall};
//!
//! let reference = MemoryReference::new().with_contig("chr1", "ACGTACGTAC");
//! let lookup = AnchorLookup::new(reference, ContigNaming::PREFIXED);
//! let calls = vec![IndelCall::new("chr1", 5, "-", "TT").unwrap()];
//! let config = ConversionConfig::default()
//!     .with_file_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//!
//! let vcf = render_vcf(&calls, &lookup, "tumor", &config).unwrap();
//! assert!(vcf.ends_with("chr1\t4\t.\tT\tTTT\t.\tPASS\t.\t.\t.\n"));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod alignment; // Sample name and naming from the alignment header
pub mod config;    // Conversion settings
pub mod indel;     // Bambino calls and allele reconstruction
pub mod pipeline;  // Table ingest and batch driver
pub mod reference; // Anchor base lookup
pub mod vcf;       // Field tables, records and header

// Re-exports for convenience
pub use config::ConversionConfig;
pub use indel::{IndelCall, IndelError, IndelKind};
pub use pipeline::{build_records, produce_vcf, render_vcf, write_vcf, BatchSummary, TableError};
pub use reference::ReferenceError;
pub use vcf::{Filter, RecordBuilder, VcfRecord};

use thiserror::Error;

/// Errors that abort a conversion batch.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The indel table could not be read.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The reference could not be opened.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The anchor base of one call could not be resolved.
    #[error("{chrom}:{pos}: anchor base lookup failed")]
    Record {
        /// Canonical chromosome of the call.
        chrom: String,
        /// Bambino position of the call.
        pos: u64,
        /// Lookup failure.
        #[source]
        source: ReferenceError,
    },

    /// Writing the output failed.
    #[error("failed to write VCF: {0}")]
    Io(#[from] std::io::Error),
}
