use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indel_vcf::{produce_vcf, BatchSummary, ConversionConfig, ConversionError};
use rust_htslib::bam;
use rust_htslib::bam::header::{Header, HeaderRecord};
use tempfile::TempDir;

const TABLE: &str = "chr\tpos\tref\talt\tdbsnp\tfilter\tpredicted_class\tref_count\talt_count\n\
                     1\t9\t-\tCA\trs42\t-\tsomatic\t7\t3\n\
                     chr2\t5\tTT\t-\t-\tlt2count\tartifact\t1\t1\n";

fn write_fasta(dir: &Path, contigs: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("ref.fa");
    let text: String = contigs
        .iter()
        .map(|(name, sequence)| format!(">{name}\n{sequence}\n"))
        .collect();
    fs::write(&path, text).expect("write fasta");
    path
}

fn write_bam(dir: &Path, contigs: &[&str], sample: &str) -> PathBuf {
    let path = dir.join("tumor.bam");
    let mut header = Header::new();

    let mut hd = HeaderRecord::new(b"HD");
    hd.push_tag(b"VN", &"1.6");
    header.push_record(&hd);

    for contig in contigs {
        let mut sq = HeaderRecord::new(b"SQ");
        sq.push_tag(b"SN", contig);
        sq.push_tag(b"LN", &100i64);
        header.push_record(&sq);
    }

    let mut rg = HeaderRecord::new(b"RG");
    rg.push_tag(b"ID", &"rg1");
    rg.push_tag(b"SM", &sample);
    header.push_record(&rg);

    let writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).expect("create bam");
    drop(writer);
    path
}

fn config() -> ConversionConfig {
    ConversionConfig::default()
        .with_source("indel-vcf-test")
        .with_file_date(NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"))
}

#[test]
fn converts_table_with_bam_and_fasta() {
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("calls.tsv");
    fs::write(&table, TABLE).expect("write table");
    let fasta = write_fasta(
        dir.path(),
        &[("chr1", "ATGATGATTAGACCGTTAGC"), ("chr2", "GGCATTACAGT")],
    );
    let bam = write_bam(dir.path(), &["chr1", "chr2"], "PATIENT_7");
    let output = dir.path().join("out.vcf");

    let summary = produce_vcf(&table, &bam, &fasta, &output, &config()).expect("conversion succeeds");
    assert_eq!(summary, BatchSummary { insertions: 1, deletions: 1 });

    let vcf = fs::read_to_string(&output).expect("read output");
    assert!(vcf.contains("##filedate=20240501\n"));
    assert!(vcf.contains("##source=indel-vcf-test\n"));
    let tail: Vec<_> = vcf.lines().rev().take(3).collect();
    assert_eq!(
        tail,
        [
            "chr2\t4\t.\tATT\tA\t.\tLt2\tPRED=artifact\tAD\t1,1",
            "chr1\t8\trs42\tT\tTCA\t.\tPASS\tPRED=somatic;DB\tAD\t7,3",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPATIENT_7",
        ]
    );
}

#[test]
fn bare_alignment_yields_bare_names() {
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("calls.tsv");
    fs::write(&table, TABLE).expect("write table");
    let fasta = write_fasta(dir.path(), &[("1", "ATGATGATTAGACCGTTAGC"), ("2", "GGCATTACAGT")]);
    let bam = write_bam(dir.path(), &["1", "2"], "N1");
    let output = dir.path().join("out.vcf");

    produce_vcf(&table, &bam, &fasta, &output, &config()).expect("conversion succeeds");

    let vcf = fs::read_to_string(&output).expect("read output");
    let chroms: Vec<_> = vcf
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(chroms, ["1", "2"]);
}

#[test]
fn missing_contig_leaves_no_output() {
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("calls.tsv");
    fs::write(&table, TABLE).expect("write table");
    let fasta = write_fasta(dir.path(), &[("chr1", "ATGATGATTAGACCGTTAGC")]);
    let bam = write_bam(dir.path(), &["chr1"], "N1");
    let output = dir.path().join("out.vcf");

    let err = produce_vcf(&table, &bam, &fasta, &output, &config()).unwrap_err();
    assert!(matches!(err, ConversionError::Record { ref chrom, pos: 5, .. } if chrom == "chr2"));
    assert!(!output.exists());
}

#[test]
fn unreadable_alignment_falls_back_to_default_sample() {
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("calls.tsv");
    fs::write(&table, TABLE).expect("write table");
    let fasta = write_fasta(
        dir.path(),
        &[("chr1", "ATGATGATTAGACCGTTAGC"), ("chr2", "GGCATTACAGT")],
    );
    let output = dir.path().join("out.vcf");

    produce_vcf(&table, dir.path().join("absent.bam"), &fasta, &output, &config())
        .expect("conversion succeeds");

    let vcf = fs::read_to_string(&output).expect("read output");
    assert!(vcf
        .lines()
        .any(|line| line.starts_with("#CHROM") && line.ends_with("\tSampleName")));
}
