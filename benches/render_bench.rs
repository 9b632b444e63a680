//! Rendering benchmarks

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indel_vcf::indel::{AlleleDepth, Annotations};
use indel_vcf::reference::{AnchorLookup, ContigNaming, MemoryReference};
use indel_vcf::{render_vcf, ConversionConfig, IndelCall};

const CONTIG_LEN: u64 = 100_000;

fn synthetic_batch(count: u64) -> Vec<IndelCall> {
    (0..count)
        .map(|i| {
            let pos = 2 + (i * 37) % (CONTIG_LEN - 10);
            let call = if i % 2 == 0 {
                IndelCall::new("chr1", pos, "-", "ACG")
            } else {
                IndelCall::new("chr1", pos, "TT", "-")
            }
            .expect("synthetic call is valid");
            call.with_dbsnp(format!("rs{i}")).with_annotations(Annotations {
                predicted_class: Some("somatic".to_string()),
                indel_size: Some(3),
                is_bidirectional: i % 3 == 0,
                allele_depth: Some(AlleleDepth {
                    ref_count: 12,
                    alt_count: 5,
                }),
                ..Annotations::default()
            })
        })
        .collect()
}

fn benchmark_render(c: &mut Criterion) {
    let sequence: Vec<u8> = b"ACGT".iter().copied().cycle().take(CONTIG_LEN as usize).collect();
    let lookup = AnchorLookup::new(
        MemoryReference::new().with_contig("chr1", sequence),
        ContigNaming::PREFIXED,
    );
    let config = ConversionConfig::default()
        .with_file_date(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"));
    let calls = synthetic_batch(10_000);

    c.bench_function("render_vcf_10k", |b| {
        b.iter(|| {
            let vcf = render_vcf(black_box(&calls), &lookup, "S1", &config).expect("render");
            black_box(vcf);
        });
    });
}

criterion_group!(benches, benchmark_render);
criterion_main!(benches);
