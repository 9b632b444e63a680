use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::debug;

use indel_vcf::config::{DEFAULT_REFERENCE, DEFAULT_SOURCE};
use indel_vcf::{produce_vcf, ConversionConfig};

#[derive(Parser, Debug)]
#[command(
    name = "indel-vcf",
    version,
    about = "Convert Bambino-format indel calls into VCF v4.2"
)]
struct Cli {
    /// Tab-separated indel table (`chr`, `pos`, `ref`, `alt` plus annotation columns).
    calls: PathBuf,
    /// Alignment whose first read group names the sample.
    #[arg(long)]
    bam: PathBuf,
    /// Reference FASTA; indexed on first use when no `.fai` exists.
    #[arg(long)]
    fasta: PathBuf,
    /// Output VCF path.
    #[arg(short, long)]
    output: PathBuf,
    /// Value of the `##source` meta line.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: String,
    /// Value of the `##reference` meta line.
    #[arg(long, default_value = DEFAULT_REFERENCE)]
    reference_name: String,
    /// Write chr-prefixed chromosome names.
    #[arg(long, conflicts_with = "no_chr_prefix")]
    chr_prefixed: bool,
    /// Write bare chromosome names.
    #[arg(long)]
    no_chr_prefix: bool,
    /// Pin `##filedate` (YYYYMMDD) instead of using today's date.
    #[arg(long, value_parser = parse_file_date)]
    file_date: Option<NaiveDate>,
    /// Log debug detail.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ConversionConfig {
        let mut config = ConversionConfig::default()
            .with_source(&self.source)
            .with_reference(&self.reference_name);
        if self.chr_prefixed {
            config = config.with_chr_prefixed(true);
        } else if self.no_chr_prefix {
            config = config.with_chr_prefixed(false);
        }
        if let Some(date) = self.file_date {
            config = config.with_file_date(date);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    debug!(?config, "conversion settings");

    let summary = produce_vcf(&cli.calls, &cli.bam, &cli.fasta, &cli.output, &config)
        .with_context(|| {
            format!(
                "failed to convert {} into {}",
                cli.calls.display(),
                cli.output.display()
            )
        })?;

    println!(
        "{} records ({} insertions, {} deletions) written to {}",
        summary.total(),
        summary.insertions,
        summary.deletions,
        cli.output.display()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_file_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|err| format!("expected YYYYMMDD, got '{value}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(
            ["indel-vcf", "calls.tsv", "--bam", "a.bam", "--fasta", "r.fa", "-o", "out.vcf"]
                .iter()
                .chain(args)
                .copied(),
        )
    }

    #[test]
    fn defaults_detect_naming() {
        let config = parse(&[]).unwrap().config();
        assert_eq!(config.chr_prefixed, None);
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.file_date, None);
    }

    #[test]
    fn naming_flags_conflict() {
        assert!(parse(&["--chr-prefixed", "--no-chr-prefix"]).is_err());
        let config = parse(&["--no-chr-prefix"]).unwrap().config();
        assert_eq!(config.chr_prefixed, Some(false));
    }

    #[test]
    fn file_date_is_parsed() {
        let config = parse(&["--file-date", "20240229"]).unwrap().config();
        assert_eq!(config.file_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert!(parse(&["--file-date", "2024-02-29"]).is_err());
    }
}
