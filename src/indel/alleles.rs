use super::{IndelCall, IndelKind};

/// VCF representation of an indel: both alleles start with the anchor base
/// located at `pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfAlleles {
    /// 1-based position of the anchor base.
    pub pos: u64,
    /// REF allele.
    pub reference: String,
    /// ALT allele.
    pub alternate: String,
}

/// Rebuild anchor-inclusive REF/ALT from a Bambino call.
///
/// ```text
/// pos        12345678 9012
/// reference  ATGATGAT TAGA
/// ins        ATGATGATCTAGA   Bambino: 9 - C   ->  VCF: 8 T TC
/// del        ATG-TGAT TAGA   Bambino: 4 A -   ->  VCF: 3 GA G
/// ```
pub fn reconstruct_alleles(call: &IndelCall, anchor: u8) -> VcfAlleles {
    let anchor = char::from(anchor.to_ascii_uppercase());
    let (reference, alternate) = match call.kind() {
        IndelKind::Insertion => (anchor.to_string(), format!("{anchor}{}", call.sequence())),
        IndelKind::Deletion => (format!("{anchor}{}", call.sequence()), anchor.to_string()),
    };

    VcfAlleles {
        pos: call.anchor_pos(),
        reference,
        alternate,
    }
}
