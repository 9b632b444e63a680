use chrono::NaiveDate;

use super::fields::FieldSpec;

/// VCF version written to `##fileformat`.
pub const FILE_FORMAT: &str = "VCFv4.2";

/// FILTER definition for calls reclassified by a user panel.
const RECLASSIFIED_FILTER: &str =
    "##FILTER=<ID=reclassified,Description=\"Reclassified by user-defined panel\">";

const COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Values of the fixed meta lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMeta {
    /// `##source` value.
    pub source: String,
    /// `##reference` value.
    pub reference: String,
    /// `##filedate` value.
    pub file_date: NaiveDate,
}

/// Meta lines followed by the tab-delimited column header, without a
/// trailing newline.
pub fn render_header<'a>(
    meta: &HeaderMeta,
    info_fields: impl IntoIterator<Item = &'a FieldSpec>,
    format_fields: impl IntoIterator<Item = &'a FieldSpec>,
    sample: &str,
) -> String {
    let mut lines = vec![
        format!("##fileformat={FILE_FORMAT}"),
        format!("##filedate={}", meta.file_date.format("%Y%m%d")),
        format!("##source={}", meta.source),
        format!("##reference={}", meta.reference),
        RECLASSIFIED_FILTER.to_string(),
    ];
    lines.extend(info_fields.into_iter().map(|spec| spec.meta_line("INFO")));
    lines.extend(format_fields.into_iter().map(|spec| spec.meta_line("FORMAT")));

    lines.push(format!("{}\t{sample}", COLUMNS.join("\t")));

    lines.join("\n")
}
