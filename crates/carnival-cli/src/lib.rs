//! carnival: check Carnival assembly files from the command line.
//!
//! ```bash
//! carnival check prog.cnvl lib.cnvl
//! carnival check --format json prog.cnvl
//! carnival instructions
//! ```

use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use carnival_kernel::text::LineIndex;
use carnival_kernel::{Catalog, Finding, Severity, validate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "carnival", version, about = "Carnival assembly checker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate files and report findings.
    Check {
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the instruction set with operand signatures.
    Instructions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// What a run found, for the exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub errors: usize,
    pub infos: usize,
}

impl Outcome {
    fn add(&mut self, findings: &[Finding]) {
        for finding in findings {
            match finding.severity {
                Severity::Error => self.errors += 1,
                Severity::Info => self.infos += 1,
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Run a parsed command line, writing reports to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    match &cli.command {
        Command::Check { format, files } => {
            let mut outcome = Outcome::default();
            for path in files {
                outcome.add(&check_file(path, *format, !cli.no_color, out)?);
            }
            if *format == Format::Human && files.len() > 1 {
                writeln!(
                    out,
                    "{} file(s): {} error(s), {} info",
                    files.len(),
                    outcome.errors,
                    outcome.infos
                )?;
            }
            Ok(outcome)
        }
        Command::Instructions => {
            write_instructions(Catalog::global(), out)?;
            Ok(Outcome::default())
        }
    }
}

/// Validate one file and report its findings.
pub fn check_file(
    path: &Path,
    format: Format,
    color: bool,
    out: &mut impl Write,
) -> Result<Vec<Finding>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let findings = validate(&text);
    tracing::debug!(file = %path.display(), findings = findings.len(), "checked");

    let name = path.display().to_string();
    match format {
        Format::Human => {
            for finding in &findings {
                write_report(&name, &text, finding, color, out)?;
            }
        }
        Format::Json => {
            for finding in &findings {
                serde_json::to_writer(&mut *out, &JsonFinding::new(&name, finding))?;
                writeln!(out)?;
            }
        }
    }
    Ok(findings)
}

/// One line of `--format json` output.
#[derive(Debug, Serialize)]
struct JsonFinding<'a> {
    file: &'a str,
    #[serde(flatten)]
    finding: &'a Finding,
}

impl<'a> JsonFinding<'a> {
    fn new(file: &'a str, finding: &'a Finding) -> Self {
        Self { file, finding }
    }
}

/// Render one finding as an ariadne report.
pub fn write_report(
    name: &str,
    text: &str,
    finding: &Finding,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (kind, label_color) = match finding.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Info => (ReportKind::Advice, Color::Cyan),
    };
    let span = byte_range(text, finding);

    let mut report = Report::build(kind, (name, span.clone()))
        .with_config(
            Config::default()
                .with_color(color)
                .with_index_type(IndexType::Byte),
        )
        .with_message(&finding.message)
        .with_label(
            Label::new((name, span))
                .with_message(&finding.message)
                .with_color(label_color),
        );
    if let Some(code) = finding.code {
        report = report.with_code(code.as_str());
    }
    report
        .finish()
        .write((name, Source::from(text)), &mut *out)?;
    Ok(())
}

/// Byte range of a finding within the whole document.
fn byte_range(text: &str, finding: &Finding) -> Range<usize> {
    let index = LineIndex::new(text);
    let start = index.line_start(finding.span.line).unwrap_or(text.len());
    let clamp = |col: u32| (start + col as usize).min(text.len());
    clamp(finding.span.start)..clamp(finding.span.end)
}

/// One line per instruction: mnemonic and operand slots.
pub fn write_instructions(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    for (mnemonic, signature) in catalog.iter() {
        writeln!(out, "{mnemonic:<5} {signature}")?;
    }
    Ok(())
}
