use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{
    FieldSpec, FieldValue, FORMAT_FIELDS, INFO_FIELDS, RECLASSIFICATION_FIELDS, RESCUED_BY_NEAREST,
};
use crate::indel::{reconstruct_alleles, IndelCall};
use crate::reference::ContigNaming;

/// VCF missing-value marker.
pub const MISSING: &str = ".";

static DBSNP_ACCESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"rs[0-9]+").expect("dbSNP accession pattern is valid"));

/// dbSNP accessions found anywhere in `raw`, `;`-joined, or `.` when none.
pub fn dbsnp_id(raw: Option<&str>) -> String {
    let ids: Vec<&str> = raw
        .map(|raw| {
            DBSNP_ACCESSION
                .find_iter(raw)
                .map(|found| found.as_str())
                .collect()
        })
        .unwrap_or_default();

    if ids.is_empty() {
        MISSING.to_string()
    } else {
        ids.join(";")
    }
}

/// FILTER value derived from the reclassification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// No reclassification, or an unrecognized tag.
    Pass,
    /// Tag `notfound`.
    NotFound,
    /// Tag `lt2count`.
    LessThanTwoCount,
    /// Tag `by_nearest`.
    RescuedByNearest,
}

impl Filter {
    /// Map a reclassification tag; anything unrecognized passes.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("notfound") => Filter::NotFound,
            Some("lt2count") => Filter::LessThanTwoCount,
            Some(RESCUED_BY_NEAREST) => Filter::RescuedByNearest,
            // `-`, unset and unknown tags
            _ => Filter::Pass,
        }
    }

    /// FILTER column text.
    pub fn code(&self) -> &'static str {
        match self {
            Filter::Pass => "PASS",
            Filter::NotFound => "NtF",
            Filter::LessThanTwoCount => "Lt2",
            Filter::RescuedByNearest => "RqN",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One VCF data line with a single sample column.
#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord {
    chrom: Arc<str>,
    pos: u64,
    id: String,
    reference: String,
    alternate: String,
    filter: Filter,
    info: Vec<String>,
    format: Vec<(&'static str, String)>,
}

impl VcfRecord {
    /// CHROM column.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// POS column (1-based anchor position).
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// ID column.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// REF column.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// ALT column.
    pub fn alternate(&self) -> &str {
        &self.alternate
    }

    /// FILTER column.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// INFO tokens in field order.
    pub fn info_tokens(&self) -> &[String] {
        &self.info
    }

    /// INFO column, `.` when no field is present.
    pub fn info(&self) -> String {
        join_or_missing(self.info.iter().map(String::as_str), ";")
    }

    /// FORMAT column, `.` when no field is present.
    pub fn format_keys(&self) -> String {
        join_or_missing(self.format.iter().map(|(key, _)| *key), ":")
    }

    /// Sample column, `.` when no field is present.
    pub fn sample(&self) -> String {
        join_or_missing(self.format.iter().map(|(_, value)| value.as_str()), ":")
    }
}

impl fmt::Display for VcfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.reference,
            self.alternate,
            MISSING,
            self.filter,
            self.info(),
            self.format_keys(),
            self.sample()
        )
    }
}

fn join_or_missing<'a>(parts: impl Iterator<Item = &'a str>, separator: &str) -> String {
    let joined = parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator);
    if joined.is_empty() {
        MISSING.to_string()
    } else {
        joined
    }
}

/// Builds [`VcfRecord`]s from calls and their anchor bases.
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    info_fields: Vec<&'a FieldSpec>,
    format_fields: &'a [FieldSpec],
    naming: ContigNaming,
}

impl RecordBuilder<'static> {
    /// Builder over the standard INFO, reclassification and FORMAT tables.
    pub fn standard(naming: ContigNaming) -> Self {
        Self::new(
            INFO_FIELDS.iter().chain(&RECLASSIFICATION_FIELDS),
            &FORMAT_FIELDS,
            naming,
        )
    }
}

impl<'a> RecordBuilder<'a> {
    /// Builder over explicit field tables.
    pub fn new(
        info_fields: impl IntoIterator<Item = &'a FieldSpec>,
        format_fields: &'a [FieldSpec],
        naming: ContigNaming,
    ) -> Self {
        Self {
            info_fields: info_fields.into_iter().collect(),
            format_fields,
            naming,
        }
    }

    /// Assemble the record for `call` whose anchor base is `anchor`.
    pub fn build(&self, call: &IndelCall, anchor: u8) -> VcfRecord {
        let alleles = reconstruct_alleles(call, anchor);

        let info = self
            .info_fields
            .iter()
            .filter_map(|spec| spec.info_token(call))
            .filter(|token| !token.is_empty())
            .collect();

        let format = self
            .format_fields
            .iter()
            .filter_map(|spec| match spec.evaluate(call)? {
                FieldValue::Value(value) => Some((spec.code, value)),
                FieldValue::Flag => None,
            })
            .collect();

        VcfRecord {
            chrom: Arc::from(self.naming.contig_name(call.chrom())),
            pos: alleles.pos,
            id: dbsnp_id(call.dbsnp()),
            reference: alleles.reference,
            alternate: alleles.alternate,
            filter: Filter::from_tag(call.filter_tag()),
            info,
            format,
        }
    }
}
