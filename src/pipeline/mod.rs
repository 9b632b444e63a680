//! Batch conversion of an ordered indel table into one VCF document.
//!
//! Records are assembled for the whole batch before anything is written, so a
//! failing row leaves no partial output behind.

mod table;

pub use table::{read_indel_table, read_indel_table_path, TableError, REQUIRED_COLUMNS};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::alignment::{alignment_naming, sample_name};
use crate::config::ConversionConfig;
use crate::indel::{IndelCall, IndelKind};
use crate::reference::{
    AnchorLookup, ContigNaming, FastaReference, ReferenceBaseSource,
};
use crate::vcf::{
    render_header, RecordBuilder, VcfRecord, FORMAT_FIELDS, INFO_FIELDS, RECLASSIFICATION_FIELDS,
};
use crate::ConversionError;

/// Counts of the records written by one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Insertion records.
    pub insertions: usize,
    /// Deletion records.
    pub deletions: usize,
}

impl BatchSummary {
    /// Total records.
    pub fn total(&self) -> usize {
        self.insertions + self.deletions
    }
}

/// Build one record per call, in input order.
///
/// The first call whose anchor base cannot be resolved aborts the batch.
pub fn build_records<R: ReferenceBaseSource>(
    calls: &[IndelCall],
    lookup: &AnchorLookup<R>,
) -> Result<Vec<VcfRecord>, ConversionError> {
    let builder = RecordBuilder::standard(lookup.naming());
    calls
        .iter()
        .map(|call| {
            let anchor = lookup
                .anchor_base(call)
                .map_err(|source| ConversionError::Record {
                    chrom: call.chrom().to_string(),
                    pos: call.pos(),
                    source,
                })?;
            Ok(builder.build(call, anchor))
        })
        .collect()
}

/// Write the header and one line per call to `writer`.
pub fn write_vcf<W: Write, R: ReferenceBaseSource>(
    writer: &mut W,
    calls: &[IndelCall],
    lookup: &AnchorLookup<R>,
    sample: &str,
    config: &ConversionConfig,
) -> Result<BatchSummary, ConversionError> {
    let records = build_records(calls, lookup)?;
    write_document(writer, &document_header(config, sample), &records)?;
    Ok(summarize(calls))
}

/// Render the VCF document into a string.
pub fn render_vcf<R: ReferenceBaseSource>(
    calls: &[IndelCall],
    lookup: &AnchorLookup<R>,
    sample: &str,
    config: &ConversionConfig,
) -> Result<String, ConversionError> {
    let mut buffer = Vec::new();
    write_vcf(&mut buffer, calls, lookup, sample, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Convert an indel table into a VCF file.
///
/// The sample name comes from the alignment's read group. Chromosome naming
/// is taken from the configuration when forced, otherwise from the
/// alignment's targets, then from the FASTA index.
pub fn produce_vcf(
    call_table: impl AsRef<Path>,
    bam_path: impl AsRef<Path>,
    fasta_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchSummary, ConversionError> {
    let calls = read_indel_table_path(call_table)?;
    let reference = FastaReference::from_path(fasta_path.as_ref())?;
    let naming = resolve_naming(config, bam_path.as_ref(), reference.contig_names());
    let lookup = AnchorLookup::new(reference, naming);
    let sample = sample_name(bam_path.as_ref());

    // Build before creating the output so failures leave nothing behind.
    let records = build_records(&calls, &lookup)?;
    let output_path = output_path.as_ref();
    let mut writer = BufWriter::new(File::create(output_path)?);
    write_document(&mut writer, &document_header(config, &sample), &records)?;

    let summary = summarize(&calls);
    info!(
        output = %output_path.display(),
        sample = %sample,
        chr_prefixed = lookup.naming().is_chr_prefixed(),
        insertions = summary.insertions,
        deletions = summary.deletions,
        "wrote VCF"
    );
    Ok(summary)
}

/// Chromosome naming for a run: forced, else alignment targets, else the
/// reference's contigs, else chr-prefixed.
pub fn resolve_naming<'a>(
    config: &ConversionConfig,
    bam_path: &Path,
    reference_contigs: impl IntoIterator<Item = &'a str>,
) -> ContigNaming {
    if let Some(naming) = config.forced_naming() {
        return naming;
    }
    if let Some(naming) = alignment_naming(bam_path) {
        return naming;
    }
    ContigNaming::infer(reference_contigs).unwrap_or_else(|| {
        warn!("cannot determine chromosome naming, assuming chr-prefixed names");
        ContigNaming::PREFIXED
    })
}

fn document_header(config: &ConversionConfig, sample: &str) -> String {
    render_header(
        &config.header_meta(),
        INFO_FIELDS.iter().chain(&RECLASSIFICATION_FIELDS),
        &FORMAT_FIELDS,
        sample,
    )
}

fn write_document<W: Write>(
    writer: &mut W,
    header: &str,
    records: &[VcfRecord],
) -> std::io::Result<()> {
    writeln!(writer, "{header}")?;
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()
}

fn summarize(calls: &[IndelCall]) -> BatchSummary {
    calls
        .iter()
        .fold(BatchSummary::default(), |mut summary, call| {
            match call.kind() {
                IndelKind::Insertion => summary.insertions += 1,
                IndelKind::Deletion => summary.deletions += 1,
            }
            summary
        })
}
