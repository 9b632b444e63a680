//! INFO and FORMAT field dictionaries.
//!
//! Each [`FieldSpec`] couples the header metadata of one field with the
//! encoder that extracts its value from an [`IndelCall`]. Table order is the
//! order of both the header meta lines and the INFO tokens.

use std::fmt;

use crate::indel::{IndelCall, SENTINEL};

/// Filter tag marking calls rescued by a nearby indel.
pub(crate) const RESCUED_BY_NEAREST: &str = "by_nearest";

/// Prefix on the provenance text of rescued calls.
const RESCUED_BY_PREFIX: &str = "rescued_by:";

/// VCF `Number` of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    /// Fixed number of values; `0` for flags.
    Count(u32),
    /// One value per allele, REF included (`R`).
    PerAllele,
    /// Unbounded (`.`).
    Unbounded,
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Count(n) => write!(f, "{n}"),
            Number::PerAllele => f.write_str("R"),
            Number::Unbounded => f.write_str("."),
        }
    }
}

/// VCF `Type` of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Presence-only.
    Flag,
    /// Integer value(s).
    Integer,
    /// Floating-point value(s).
    Float,
    /// Free text.
    String,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::Flag => "Flag",
            FieldType::Integer => "Integer",
            FieldType::Float => "Float",
            FieldType::String => "String",
        })
    }
}

/// How a field's value is pulled from a call.
#[derive(Clone, Copy)]
pub enum Encoder {
    /// Presence predicate for flag fields.
    Flag(fn(&IndelCall) -> bool),
    /// Formatter for valued fields; `None` omits the field.
    Value(fn(&IndelCall) -> Option<String>),
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Flag(_) => f.write_str("Encoder::Flag"),
            Encoder::Value(_) => f.write_str("Encoder::Value"),
        }
    }
}

/// Value produced by a field for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Flag is set.
    Flag,
    /// Formatted value.
    Value(String),
}

/// Static description of one INFO or FORMAT field.
#[derive(Debug)]
pub struct FieldSpec {
    /// VCF identifier.
    pub code: &'static str,
    /// Input table columns feeding the field.
    pub columns: &'static [&'static str],
    /// VCF `Number`.
    pub number: Number,
    /// VCF `Type`.
    pub ty: FieldType,
    /// Header description.
    pub description: &'static str,
    /// Value extraction.
    pub encoder: Encoder,
}

impl FieldSpec {
    /// Value for `call`, or `None` when the field is omitted.
    pub fn evaluate(&self, call: &IndelCall) -> Option<FieldValue> {
        match self.encoder {
            Encoder::Flag(is_set) => is_set(call).then_some(FieldValue::Flag),
            Encoder::Value(format) => format(call).map(FieldValue::Value),
        }
    }

    /// INFO token for `call`: the bare code for flags, `CODE=value` otherwise.
    pub fn info_token(&self, call: &IndelCall) -> Option<String> {
        self.evaluate(call).map(|value| match value {
            FieldValue::Flag => self.code.to_string(),
            FieldValue::Value(value) => format!("{}={}", self.code, value),
        })
    }

    /// Header meta line, e.g. `##INFO=<ID=DB,Number=0,Type=Flag,Description="...">`.
    pub fn meta_line(&self, section: &str) -> String {
        format!(
            "##{section}=<ID={},Number={},Type={},Description=\"{}\">",
            self.code, self.number, self.ty, self.description
        )
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != SENTINEL)
}

/// Percent-encode characters reserved in INFO values. Commas survive only in
/// list-valued fields, where they separate values.
fn escape(value: &str, list: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            ';' => escaped.push_str("%3B"),
            '=' => escaped.push_str("%3D"),
            ',' if !list => escaped.push_str("%2C"),
            ' ' => escaped.push_str("%20"),
            '\t' => escaped.push_str("%09"),
            '\n' => escaped.push_str("%0A"),
            '\r' => escaped.push_str("%0D"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn text(value: &Option<String>) -> Option<String> {
    present(value).map(|value| escape(value, false))
}

fn text_list(value: &Option<String>) -> Option<String> {
    present(value).map(|value| escape(value, true))
}

fn number<T: ToString>(value: Option<T>) -> Option<String> {
    value.map(|value| value.to_string())
}

fn on_dbsnp(call: &IndelCall) -> bool {
    call.dbsnp()
        .map(str::trim)
        .is_some_and(|raw| !raw.is_empty() && raw != SENTINEL)
}

fn probabilities(call: &IndelCall) -> Option<String> {
    call.annotations().probabilities.map(|prob| {
        format!("{},{},{}", prob.somatic, prob.germline, prob.artifact)
    })
}

fn max_maf(call: &IndelCall) -> Option<String> {
    // -1 marks "not reported".
    number(call.annotations().max_maf.filter(|maf| *maf >= 0.0))
}

fn rescued_by(call: &IndelCall) -> Option<String> {
    if call.filter_tag() != Some(RESCUED_BY_NEAREST) {
        return None;
    }
    present(&call.annotations().rescued_by).map(|raw| {
        escape(raw.strip_prefix(RESCUED_BY_PREFIX).unwrap_or(raw), false)
    })
}

/// INFO fields, in header and token order.
pub static INFO_FIELDS: [FieldSpec; 21] = [
    FieldSpec {
        code: "PRED",
        columns: &["predicted_class"],
        number: Number::Count(1),
        ty: FieldType::String,
        description: "Predicted class: somatic, germline, artifact",
        encoder: Encoder::Value(|call| text(&call.annotations().predicted_class)),
    },
    FieldSpec {
        code: "PROB",
        columns: &["prob_s", "prob_g", "prob_a"],
        number: Number::Count(3),
        ty: FieldType::Float,
        description: "Prediction probability of being somatic, germline, artifact in this order",
        encoder: Encoder::Value(probabilities),
    },
    FieldSpec {
        code: "DB",
        columns: &["dbsnp"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if on dbSNP",
        encoder: Encoder::Flag(on_dbsnp),
    },
    FieldSpec {
        code: "ANNO",
        columns: &["annotation"],
        number: Number::Unbounded,
        ty: FieldType::String,
        description: "Indel annotation in GeneSymbol|RefSeqAccession|CodonPos|IndelEffect. \
                      Delimited by comma for multiple isoforms",
        encoder: Encoder::Value(|call| text_list(&call.annotations().annotation)),
    },
    FieldSpec {
        code: "MAXMAF",
        columns: &["max_maf"],
        number: Number::Count(1),
        ty: FieldType::Float,
        description: "Maximum minor allele frequency (MAF) reported in dbSNP or ClinVar",
        encoder: Encoder::Value(max_maf),
    },
    FieldSpec {
        code: "COMMON",
        columns: &["is_common"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if curated Common on dbSNP or MAXMAF > 0.01",
        encoder: Encoder::Flag(|call| call.annotations().is_common),
    },
    FieldSpec {
        code: "CLIN",
        columns: &["clin_info"],
        number: Number::Count(1),
        ty: FieldType::String,
        description: "Clinical Significance|Condition curated in ClinVar",
        encoder: Encoder::Value(|call| text(&call.annotations().clin_info)),
    },
    FieldSpec {
        code: "ICP",
        columns: &["indel_complexity"],
        number: Number::Count(1),
        ty: FieldType::Integer,
        description: "Indel complexity",
        encoder: Encoder::Value(|call| number(call.annotations().indel_complexity)),
    },
    FieldSpec {
        code: "DSM",
        columns: &["dissimilarity"],
        number: Number::Count(1),
        ty: FieldType::Float,
        description: "Dissimilarity",
        encoder: Encoder::Value(|call| number(call.annotations().dissimilarity)),
    },
    FieldSpec {
        code: "ISZ",
        columns: &["indel_size"],
        number: Number::Count(1),
        ty: FieldType::Integer,
        description: "Indel size",
        encoder: Encoder::Value(|call| number(call.annotations().indel_size)),
    },
    FieldSpec {
        code: "REP",
        columns: &["repeat"],
        number: Number::Count(1),
        ty: FieldType::Integer,
        description: "Repeat",
        encoder: Encoder::Value(|call| number(call.annotations().repeat)),
    },
    FieldSpec {
        code: "UQM",
        columns: &["is_uniq_mapped"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if supported by uniquely mapped reads",
        encoder: Encoder::Flag(|call| call.annotations().is_uniq_mapped),
    },
    FieldSpec {
        code: "NEB",
        columns: &["is_near_boundary"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if near exon boundary",
        encoder: Encoder::Flag(|call| call.annotations().is_near_boundary),
    },
    FieldSpec {
        code: "BID",
        columns: &["is_bidirectional"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if supported by forward and reverse reads",
        encoder: Encoder::Flag(|call| call.annotations().is_bidirectional),
    },
    FieldSpec {
        code: "MTA",
        columns: &["is_multiallelic"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if multialleleic",
        encoder: Encoder::Flag(|call| call.annotations().is_multiallelic),
    },
    FieldSpec {
        code: "TRC",
        columns: &["is_truncating"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if truncating indel",
        encoder: Encoder::Flag(|call| call.annotations().is_truncating),
    },
    FieldSpec {
        code: "NMD",
        columns: &["is_nmd_insensitive"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if insensitive to nonsense mediated decay",
        encoder: Encoder::Flag(|call| call.annotations().is_nmd_insensitive),
    },
    FieldSpec {
        code: "IPG",
        columns: &["ipg"],
        number: Number::Count(1),
        ty: FieldType::Float,
        description: "Indels per gene",
        encoder: Encoder::Value(|call| number(call.annotations().indels_per_gene)),
    },
    FieldSpec {
        code: "LSG",
        columns: &["local_strength"],
        number: Number::Count(1),
        ty: FieldType::Float,
        description: "Local strength of nucleotide sequence",
        encoder: Encoder::Value(|call| number(call.annotations().local_strength)),
    },
    FieldSpec {
        code: "ATI",
        columns: &["is_at_ins"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if insertion of A or T",
        encoder: Encoder::Flag(|call| call.annotations().is_at_ins),
    },
    FieldSpec {
        code: "ATD",
        columns: &["is_at_del"],
        number: Number::Count(0),
        ty: FieldType::Flag,
        description: "Flagged if deletion of A or T",
        encoder: Encoder::Flag(|call| call.annotations().is_at_del),
    },
];

/// INFO fields set by post-hoc reclassification, appended after [`INFO_FIELDS`].
pub static RECLASSIFICATION_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        code: "RCF",
        columns: &["reclassified"],
        number: Number::Count(1),
        ty: FieldType::String,
        description: "Reclassification source",
        encoder: Encoder::Value(|call| text(&call.annotations().reclassified)),
    },
    FieldSpec {
        code: "RQB",
        columns: &["filter", "rescued_by"],
        number: Number::Count(1),
        ty: FieldType::String,
        description: "Indel used to rescue this entry",
        encoder: Encoder::Value(rescued_by),
    },
];

/// FORMAT fields, in header order.
pub static FORMAT_FIELDS: [FieldSpec; 1] = [FieldSpec {
    code: "AD",
    columns: &["ref_count", "alt_count"],
    number: Number::PerAllele,
    ty: FieldType::Integer,
    description: "Allelic depths by fragment (not read) for the ref and alt alleles in the order listed",
    encoder: Encoder::Value(|call| {
        call.annotations()
            .allele_depth
            .map(|depth| format!("{},{}", depth.ref_count, depth.alt_count))
    }),
}];
