/// Classifier probabilities for the three indel classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    /// Probability of being somatic.
    pub somatic: f64,
    /// Probability of being germline.
    pub germline: f64,
    /// Probability of being an artifact.
    pub artifact: f64,
}

impl ClassProbabilities {
    /// Combine the three columns; `None` unless every class is present.
    pub fn from_parts(
        somatic: Option<f64>,
        germline: Option<f64>,
        artifact: Option<f64>,
    ) -> Option<Self> {
        Some(Self {
            somatic: somatic?,
            germline: germline?,
            artifact: artifact?,
        })
    }
}

/// Fragment counts supporting the ref and alt alleles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlleleDepth {
    /// Fragments supporting the reference allele.
    pub ref_count: u32,
    /// Fragments supporting the alternate allele.
    pub alt_count: u32,
}

impl AlleleDepth {
    /// Combine the two count columns; `None` unless both are present.
    pub fn from_parts(ref_count: Option<u32>, alt_count: Option<u32>) -> Option<Self> {
        Some(Self {
            ref_count: ref_count?,
            alt_count: alt_count?,
        })
    }
}

/// Precomputed annotations carried by an indel call.
///
/// Every value is optional; absent values are omitted from the VCF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Predicted class (somatic, germline, artifact).
    pub predicted_class: Option<String>,
    /// Class probabilities.
    pub probabilities: Option<ClassProbabilities>,
    /// Gene|transcript|codon|effect annotation, comma separated per isoform.
    pub annotation: Option<String>,
    /// Maximum minor allele frequency; `-1` means not reported.
    pub max_maf: Option<f64>,
    /// Curated common variant.
    pub is_common: bool,
    /// ClinVar significance and condition.
    pub clin_info: Option<String>,
    /// Indel complexity.
    pub indel_complexity: Option<i64>,
    /// Dissimilarity.
    pub dissimilarity: Option<f64>,
    /// Indel size.
    pub indel_size: Option<i64>,
    /// Repeat count.
    pub repeat: Option<i64>,
    /// Supported by uniquely mapped reads.
    pub is_uniq_mapped: bool,
    /// Near an exon boundary.
    pub is_near_boundary: bool,
    /// Supported by forward and reverse reads.
    pub is_bidirectional: bool,
    /// Multiallelic site.
    pub is_multiallelic: bool,
    /// Truncating indel.
    pub is_truncating: bool,
    /// Insensitive to nonsense-mediated decay.
    pub is_nmd_insensitive: bool,
    /// Indels per gene.
    pub indels_per_gene: Option<f64>,
    /// Local strength of the nucleotide sequence.
    pub local_strength: Option<f64>,
    /// Insertion of A or T.
    pub is_at_ins: bool,
    /// Deletion of A or T.
    pub is_at_del: bool,
    /// Source of a post-hoc reclassification.
    pub reclassified: Option<String>,
    /// Nearest indel that rescued this call, as `rescued_by:<id>`.
    pub rescued_by: Option<String>,
    /// Allelic depth for the FORMAT column.
    pub allele_depth: Option<AlleleDepth>,
}
