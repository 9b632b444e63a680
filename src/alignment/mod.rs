//! Metadata read from the alignment file: sample name and contig naming.

use std::path::Path;

use rust_htslib::bam::{self, Read};
use tracing::{debug, warn};

use crate::reference::ContigNaming;

/// Sample column name used when the alignment carries no `SM` tag.
pub const FALLBACK_SAMPLE_NAME: &str = "SampleName";

/// Sample name from the first `@RG` line's `SM` tag.
///
/// Never fails: an unreadable file, a missing read group or a missing tag
/// all yield [`FALLBACK_SAMPLE_NAME`].
pub fn sample_name<P: AsRef<Path>>(bam_path: P) -> String {
    let bam_path = bam_path.as_ref();
    let reader = match bam::Reader::from_path(bam_path) {
        Ok(reader) => reader,
        Err(err) => {
            warn!(path = %bam_path.display(), error = %err, "cannot read alignment header, using placeholder sample name");
            return FALLBACK_SAMPLE_NAME.to_string();
        }
    };

    let header = String::from_utf8_lossy(reader.header().as_bytes());
    match sample_from_header_text(&header) {
        Some(name) => {
            debug!(sample = name, "sample name from read group");
            name.to_string()
        }
        None => {
            warn!(path = %bam_path.display(), "no SM tag on first read group, using placeholder sample name");
            FALLBACK_SAMPLE_NAME.to_string()
        }
    }
}

/// `SM` value of the first `@RG` line in SAM header text.
pub fn sample_from_header_text(header: &str) -> Option<&str> {
    let read_group = header.lines().find(|line| line.starts_with("@RG"))?;
    read_group
        .split('\t')
        .skip(1)
        .find_map(|field| field.strip_prefix("SM:"))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Contig naming of the alignment's `@SQ` targets.
///
/// Returns `None` when the file cannot be read or declares no targets.
pub fn alignment_naming<P: AsRef<Path>>(bam_path: P) -> Option<ContigNaming> {
    let reader = bam::Reader::from_path(bam_path.as_ref()).ok()?;
    let names = reader.header().target_names();
    ContigNaming::infer(names.iter().filter_map(|name| std::str::from_utf8(name).ok()))
}
