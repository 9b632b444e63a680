//! VCF v4.2 encoding of indel calls.
//!
//! - [`fields`]: INFO/FORMAT dictionaries with their encoders
//! - [`record`]: per-call record assembly
//! - [`header`]: meta lines and column header

pub mod fields;
mod header;
mod record;

pub use fields::{
    Encoder, FieldSpec, FieldType, FieldValue, Number, FORMAT_FIELDS, INFO_FIELDS,
    RECLASSIFICATION_FIELDS,
};
pub use header::{render_header, HeaderMeta, FILE_FORMAT};
pub use record::{dbsnp_id, Filter, RecordBuilder, VcfRecord, MISSING};
