//! CLI binary for linkspy.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`,
//! runs the selected check and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use linkspy::pipeline::collect::TraversalIssue;
use linkspy::{
    find_missing_notes, find_unused_attachments, scan, to_json, write_report, CheckKind,
    ProgressCallback, ScanConfig, ScanProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (stderr only) ────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: a bar on stderr that advances per document
/// and prints a red line for every document that could not be read.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Start as a spinner; the bar length is only known once the walk is done.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Walking");
        bar.set_message("collecting documents…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} documents  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Scanning");
        self.bar.set_message("");
    }
}

impl ScanProgressCallback for CliProgressCallback {
    fn on_scan_start(&self, total_documents: usize) {
        self.activate_bar(total_documents);
    }

    fn on_document_start(&self, _index: usize, _total: usize, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn on_document_complete(&self, _index: usize, _total: usize, _findings: usize) {
        self.bar.inc(1);
    }

    fn on_document_error(&self, _index: usize, _total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!("  {} {}", red("✗"), red(error)));
        self.bar.inc(1);
    }

    fn on_scan_complete(&self, total_documents: usize, total_findings: usize) {
        self.bar.finish_and_clear();
        let errors = self.errors.load(Ordering::SeqCst);
        let mark = if total_findings == 0 && errors == 0 {
            green("✔")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{} {} documents checked, {} findings{}",
            mark,
            bold(&total_documents.to_string()),
            bold(&total_findings.to_string()),
            if errors > 0 {
                format!(", {} unreadable", red(&errors.to_string()))
            } else {
                String::new()
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Broken image embeds (default check)
  linkspy ~/Notes

  # Attachments kept somewhere else
  linkspy ~/Notes --attachments files/images

  # Images nobody embeds any more
  linkspy ~/Notes --check unused-attachments

  # [[Links]] to notes that do not exist
  linkspy ~/Notes --check missing-notes

  # Machine-readable report, written to a file
  linkspy ~/Notes --json -o report.json

RESOLUTION:
  [[cat.png]]          → <vault>/<attachments>/cat.png
  [[figs/cat.png]]     → <vault>/figs/cat.png
  [[cat.png|Caption]]  → same as [[cat.png]]; the caption is ignored

  Files under <vault>/.trash are never scanned.

ENVIRONMENT VARIABLES:
  LINKSPY_VAULT        Vault root (instead of the positional argument)
  LINKSPY_ATTACHMENTS  Attachment folder relative to the vault root
  RUST_LOG             Overrides the log filter (e.g. linkspy=debug)
"#;

/// Find broken image embeds in a markdown vault.
#[derive(Parser, Debug)]
#[command(
    name = "linkspy",
    version,
    about = "Find broken image embeds, unused attachments and dangling wiki-links in a markdown vault",
    long_about = "Walk a vault of markdown notes, extract [[wiki-link]] image embeds line by line \
and report every embed whose target file is missing. The scan always runs to completion: \
unreadable documents are reported and skipped.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Root folder of the vault.
    #[arg(env = "LINKSPY_VAULT")]
    vault: PathBuf,

    /// Attachment folder, relative to the vault root.
    #[arg(long, env = "LINKSPY_ATTACHMENTS", default_value = linkspy::config::DEFAULT_ATTACHMENTS_SUBPATH)]
    attachments: PathBuf,

    /// Trash folder name, relative to the vault root; never scanned.
    #[arg(long, env = "LINKSPY_TRASH", default_value = linkspy::config::DEFAULT_TRASH_DIR)]
    trash: String,

    /// Document file extension (case-sensitive).
    #[arg(long, env = "LINKSPY_EXTENSION", default_value = linkspy::config::DEFAULT_MARKDOWN_EXTENSION)]
    extension: String,

    /// Which check to run.
    #[arg(long, env = "LINKSPY_CHECK", value_enum, default_value = "broken-images")]
    check: CheckArg,

    /// Follow symbolic links while walking the vault.
    #[arg(long, env = "LINKSPY_FOLLOW_LINKS")]
    follow_links: bool,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "LINKSPY_OUTPUT")]
    output: Option<PathBuf>,

    /// Output the report as JSON instead of text.
    #[arg(long, env = "LINKSPY_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LINKSPY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LINKSPY_VERBOSE")]
    verbose: bool,

    /// Suppress everything on stderr except errors.
    #[arg(short, long, env = "LINKSPY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CheckArg {
    BrokenImages,
    UnusedAttachments,
    MissingNotes,
}

impl From<CheckArg> for CheckKind {
    fn from(v: CheckArg) -> Self {
        match v {
            CheckArg::BrokenImages => CheckKind::BrokenImages,
            CheckArg::UnusedAttachments => CheckKind::UnusedAttachments,
            CheckArg::MissingNotes => CheckKind::MissingNotes,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already says what is happening; keep INFO logs out
    // of its way unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ScanProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run the check ────────────────────────────────────────────────────
    let rendered = match CheckKind::from(cli.check) {
        CheckKind::BrokenImages => {
            let report = scan(&config);
            print_traversal_issues(&report.traversal_issues, cli.quiet);
            render(&report, cli.json, |r| r.to_text())?
        }
        CheckKind::UnusedAttachments => {
            let report = find_unused_attachments(&config);
            print_traversal_issues(&report.traversal_issues, cli.quiet);
            render(&report, cli.json, |r| r.to_text())?
        }
        CheckKind::MissingNotes => {
            let report = find_missing_notes(&config);
            print_traversal_issues(&report.traversal_issues, cli.quiet);
            render(&report, cli.json, |r| r.to_text())?
        }
    };

    // ── Emit ─────────────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        write_report(output_path, &rendered).context("Failed to write report")?;
        if !cli.quiet {
            eprintln!("{}  report written to {}", green("✔"), bold(&output_path.display().to_string()));
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    }

    Ok(())
}

/// Map CLI args to `ScanConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ScanConfig> {
    let mut builder = ScanConfig::builder(&cli.vault)
        .attachments_subpath(&cli.attachments)
        .trash_dir_name(&cli.trash)
        .markdown_extension(&cli.extension)
        .follow_links(cli.follow_links);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// List walk failures on stderr; the text report only covers documents.
fn print_traversal_issues(issues: &[TraversalIssue], quiet: bool) {
    if quiet || issues.is_empty() {
        return;
    }
    eprintln!(
        "{} {} vault entries could not be walked:",
        cyan("⚠"),
        bold(&issues.len().to_string())
    );
    for issue in issues {
        match issue.path {
            Some(ref path) => eprintln!("  {}: {}", path.display(), red(&issue.detail)),
            None => eprintln!("  {}", red(&issue.detail)),
        }
    }
}

/// Serialise `report` as pretty JSON, or render it as text.
fn render<R, T>(report: &R, json: bool, text: T) -> Result<String>
where
    R: serde::Serialize,
    T: FnOnce(&R) -> String,
{
    if json {
        to_json(report).context("Failed to serialise report")
    } else {
        Ok(text(report))
    }
}
