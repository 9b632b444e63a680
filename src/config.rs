//! Conversion settings shared by the library entry points and the CLI.

use chrono::{Local, NaiveDate};

use crate::reference::ContigNaming;
use crate::vcf::HeaderMeta;

/// Default `##source` value.
pub const DEFAULT_SOURCE: &str = "RNAIndel";
/// Default `##reference` value.
pub const DEFAULT_REFERENCE: &str = "GRCh38";

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// `##source` meta value.
    pub source: String,
    /// `##reference` meta value.
    pub reference: String,
    /// Force the chromosome naming instead of detecting it from the inputs.
    pub chr_prefixed: Option<bool>,
    /// Date written to `##filedate`; today when unset.
    pub file_date: Option<NaiveDate>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            reference: DEFAULT_REFERENCE.to_string(),
            chr_prefixed: None,
            file_date: None,
        }
    }
}

impl ConversionConfig {
    /// Set the `##source` value.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the `##reference` value.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Force chr-prefixed (`true`) or bare (`false`) chromosome names.
    pub fn with_chr_prefixed(mut self, chr_prefixed: bool) -> Self {
        self.chr_prefixed = Some(chr_prefixed);
        self
    }

    /// Pin the `##filedate` value, making output reproducible.
    pub fn with_file_date(mut self, date: NaiveDate) -> Self {
        self.file_date = Some(date);
        self
    }

    /// Forced naming, if any.
    pub fn forced_naming(&self) -> Option<ContigNaming> {
        self.chr_prefixed.map(ContigNaming::new)
    }

    /// Fixed meta values, resolving the file date against the local clock.
    pub fn header_meta(&self) -> HeaderMeta {
        HeaderMeta {
            source: self.source.clone(),
            reference: self.reference.clone(),
            file_date: self.file_date.unwrap_or_else(|| Local::now().date_naive()),
        }
    }
}
