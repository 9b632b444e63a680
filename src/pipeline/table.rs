//! Reader for the classifier's tab-separated indel table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, warn};

use crate::indel::{AlleleDepth, Annotations, ClassProbabilities, IndelCall, IndelError};
use crate::vcf::{FORMAT_FIELDS, INFO_FIELDS, RECLASSIFICATION_FIELDS};

/// Columns every table must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["chr", "pos", "ref", "alt"];

/// Errors raised while reading the indel table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be opened.
    #[error("failed to open indel table {path}: {source}")]
    Open {
        /// Table path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the header row.
    #[error("indel table is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A row could not be read or a cell could not be parsed.
    #[error("indel table line {line}: {source}")]
    Row {
        /// 1-based line number.
        line: u64,
        /// Underlying csv error.
        #[source]
        source: csv::Error,
    },

    /// A row violates the indel allele contract.
    #[error("indel table line {line}: {source}")]
    Indel {
        /// 1-based line number.
        line: u64,
        /// Underlying validation error.
        #[source]
        source: IndelError,
    },

    /// The header row could not be read.
    #[error("failed to read indel table header: {0}")]
    Header(#[source] csv::Error),
}

/// Read every call from a table file, preserving row order.
pub fn read_indel_table_path<P: AsRef<Path>>(path: P) -> Result<Vec<IndelCall>, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_indel_table(file)
}

/// Read every call from tab-separated text, preserving row order.
pub fn read_indel_table<R: Read>(input: R) -> Result<Vec<IndelCall>, TableError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(Trim::All)
        .from_reader(input);
    let headers = reader.headers().map_err(TableError::Header)?.clone();
    check_columns(&headers)?;

    let mut calls = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line();
        let more = reader
            .read_record(&mut record)
            .map_err(|source| TableError::Row { line, source })?;
        if !more {
            break;
        }
        let line = record.position().map_or(line, |position| position.line());
        let row: IndelRow = record
            .deserialize(Some(&headers))
            .map_err(|source| TableError::Row { line, source })?;
        calls.push(row.into_call().map_err(|source| TableError::Indel { line, source })?);
    }

    debug!(rows = calls.len(), "read indel table");
    Ok(calls)
}

fn check_columns(headers: &StringRecord) -> Result<(), TableError> {
    let has = |column: &&str| headers.iter().any(|header| header == *column);

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|column| !has(*column)) {
        return Err(TableError::MissingColumn(*missing));
    }

    let optional = INFO_FIELDS
        .iter()
        .chain(&RECLASSIFICATION_FIELDS)
        .chain(&FORMAT_FIELDS)
        .flat_map(|spec| spec.columns.iter().map(move |column| (spec.code, *column)));
    for (code, column) in optional {
        if !has(&column) {
            warn!(column, field = code, "indel table lacks column, field will be omitted");
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct IndelRow {
    chr: String,
    #[serde(deserialize_with = "cell::position")]
    pos: u64,
    #[serde(rename = "ref")]
    ref_allele: String,
    #[serde(rename = "alt")]
    alt_allele: String,
    #[serde(default, deserialize_with = "cell::text")]
    dbsnp: Option<String>,
    #[serde(default, deserialize_with = "cell::text")]
    filter: Option<String>,
    #[serde(default, deserialize_with = "cell::text")]
    predicted_class: Option<String>,
    #[serde(default, deserialize_with = "cell::float")]
    prob_s: Option<f64>,
    #[serde(default, deserialize_with = "cell::float")]
    prob_g: Option<f64>,
    #[serde(default, deserialize_with = "cell::float")]
    prob_a: Option<f64>,
    #[serde(default, deserialize_with = "cell::text")]
    annotation: Option<String>,
    #[serde(default, deserialize_with = "cell::float")]
    max_maf: Option<f64>,
    #[serde(default, deserialize_with = "cell::flag")]
    is_common: bool,
    #[serde(default, deserialize_with = "cell::text")]
    clin_info: Option<String>,
    #[serde(default, deserialize_with = "cell::integer")]
    indel_complexity: Option<i64>,
    #[serde(default, deserialize_with = "cell::float")]
    dissimilarity: Option<f64>,
    #[serde(default, deserialize_with = "cell::integer")]
    indel_size: Option<i64>,
    #[serde(default, deserialize_with = "cell::integer")]
    repeat: Option<i64>,
    #[serde(default, deserialize_with = "cell::flag")]
    is_uniq_mapped: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_near_boundary: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_bidirectional: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_multiallelic: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_truncating: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_nmd_insensitive: bool,
    #[serde(default, deserialize_with = "cell::float")]
    ipg: Option<f64>,
    #[serde(default, deserialize_with = "cell::float")]
    local_strength: Option<f64>,
    #[serde(default, deserialize_with = "cell::flag")]
    is_at_ins: bool,
    #[serde(default, deserialize_with = "cell::flag")]
    is_at_del: bool,
    #[serde(default, deserialize_with = "cell::text")]
    reclassified: Option<String>,
    #[serde(default, deserialize_with = "cell::text")]
    rescued_by: Option<String>,
    #[serde(default, deserialize_with = "cell::count")]
    ref_count: Option<u32>,
    #[serde(default, deserialize_with = "cell::count")]
    alt_count: Option<u32>,
}

impl IndelRow {
    fn into_call(self) -> Result<IndelCall, IndelError> {
        let annotations = Annotations {
            predicted_class: self.predicted_class,
            probabilities: ClassProbabilities::from_parts(self.prob_s, self.prob_g, self.prob_a),
            annotation: self.annotation,
            max_maf: self.max_maf,
            is_common: self.is_common,
            clin_info: self.clin_info,
            indel_complexity: self.indel_complexity,
            dissimilarity: self.dissimilarity,
            indel_size: self.indel_size,
            repeat: self.repeat,
            is_uniq_mapped: self.is_uniq_mapped,
            is_near_boundary: self.is_near_boundary,
            is_bidirectional: self.is_bidirectional,
            is_multiallelic: self.is_multiallelic,
            is_truncating: self.is_truncating,
            is_nmd_insensitive: self.is_nmd_insensitive,
            indels_per_gene: self.ipg,
            local_strength: self.local_strength,
            is_at_ins: self.is_at_ins,
            is_at_del: self.is_at_del,
            reclassified: self.reclassified,
            rescued_by: self.rescued_by,
            allele_depth: AlleleDepth::from_parts(self.ref_count, self.alt_count),
        };

        let mut call = IndelCall::new(&self.chr, self.pos, &self.ref_allele, &self.alt_allele)?
            .with_annotations(annotations);
        if let Some(dbsnp) = self.dbsnp {
            call = call.with_dbsnp(dbsnp);
        }
        if let Some(tag) = self.filter {
            call = call.with_filter_tag(tag);
        }
        Ok(call)
    }
}

/// Cell parsers tolerant of the spellings pandas and R write for missing
/// values and booleans.
mod cell {
    use super::*;
    use serde::de::Error;

    const MISSING: [&str; 6] = ["", "-", ".", "na", "nan", "none"];

    fn is_missing(raw: &str) -> bool {
        MISSING.iter().any(|missing| raw.eq_ignore_ascii_case(missing))
    }

    fn parse_integer(raw: &str) -> Option<i64> {
        raw.parse::<i64>().ok().or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && value.fract() == 0.0)
                .map(|value| value as i64)
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(d)?;
        Ok((!is_missing(raw.trim())).then(|| raw.trim().to_string()))
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        if is_missing(raw) {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number '{raw}'")))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        if is_missing(raw) {
            return Ok(None);
        }
        parse_integer(raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid integer '{raw}'")))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        integer(d)?
            .map(|value| {
                u32::try_from(value)
                    .map_err(|_| D::Error::custom(format!("invalid read count '{value}'")))
            })
            .transpose()
    }

    pub fn position<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        parse_integer(raw)
            .and_then(|value| u64::try_from(value).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid position '{raw}'")))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        if is_missing(raw) || raw.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        if raw.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        raw.parse::<f64>()
            .map(|value| value != 0.0)
            .map_err(|_| D::Error::custom(format!("invalid flag '{raw}'")))
    }
}
