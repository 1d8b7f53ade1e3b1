// Command line front end
// Argument parsing, interactive prompts and report rendering

use crate::search::{DirLister, FileSearch, Pattern, SearchConfig, SearchError, SearchReport};
use crate::search::pattern::DotRule;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Recursively search a directory for files matching a simple wildcard pattern
#[derive(Debug, Default, Parser)]
#[command(name = "file-search", version)]
pub struct Cli {
    /// Directory to start searching from (prompted for when missing)
    pub directory: Option<PathBuf>,

    /// File name pattern: "*.ext", "name.*", "*.*" or an exact name (prompted for when missing)
    pub pattern: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Split file names at the first or the last dot
    #[arg(long, value_enum)]
    pub dot_rule: Option<DotRule>,

    /// Sort matches by path
    #[arg(long)]
    pub sort: bool,

    /// Skip files and directories whose name starts with a dot
    #[arg(long)]
    pub no_hidden: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,
}

impl Cli {
    /// Fold command line overrides into the loaded config
    pub fn apply_to(&self, config: &SearchConfig) -> SearchConfig {
        let mut merged = config.clone();
        if let Some(rule) = self.dot_rule {
            merged.dot_rule = rule;
        }
        if self.sort {
            merged.sort_results = true;
        }
        if self.no_hidden {
            merged.include_hidden = false;
        }
        if self.pause {
            merged.pause_on_exit = true;
        }
        merged
    }
}

/// Print `label` and read the first whitespace-delimited token from `input`
///
/// Blank lines are skipped. Anything after the first token on the line is
/// dropped, so paths with embedded spaces cannot be entered this way.
pub fn prompt_token<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<String, SearchError> {
    let prompt_err = |e: io::Error| SearchError::Prompt {
        reason: e.to_string(),
    };

    writeln!(output, "{}", label).map_err(prompt_err)?;
    output.flush().map_err(prompt_err)?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).map_err(prompt_err)? == 0 {
            return Err(SearchError::Prompt {
                reason: format!("input closed before answering \"{}\"", label.trim()),
            });
        }
        if let Some(token) = line.split_whitespace().next() {
            return Ok(token.to_string());
        }
    }
}

/// Take directory and pattern from the arguments, prompting for whatever is missing
pub fn resolve_inputs<R: BufRead, W: Write>(
    cli: &Cli,
    input: &mut R,
    output: &mut W,
) -> Result<(PathBuf, String), SearchError> {
    let directory = match &cli.directory {
        Some(dir) => dir.clone(),
        None => PathBuf::from(prompt_token(input, output, "Enter a directory path: ")?),
    };
    let pattern = match &cli.pattern {
        Some(pattern) => pattern.clone(),
        None => prompt_token(input, output, "Enter a pattern for filename: ")?,
    };
    Ok((directory, pattern))
}

pub fn header_line(directory: &Path, pattern: &str) -> String {
    format!(
        "Searching of files by \"{}\" pattern name in \"{}\" directory.",
        pattern,
        directory.display()
    )
}

/// Write the human-readable result listing
pub fn render_report<W: Write>(report: &SearchReport, output: &mut W) -> io::Result<()> {
    if report.is_empty() {
        writeln!(output, "No files are found.")?;
    } else {
        writeln!(output, "Files that match a pattern:")?;
        for file in &report.files {
            writeln!(output, "{}", file.display())?;
        }
    }
    Ok(())
}

/// Block until a line (or EOF) arrives on `input`
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    write!(output, "Press Enter to exit...")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Run one search end to end against `lister`
///
/// Only an unusable pattern or broken terminal I/O fails; finding nothing is
/// a normal outcome.
pub fn run<L, R, W>(
    cli: &Cli,
    config: &SearchConfig,
    lister: L,
    input: &mut R,
    output: &mut W,
) -> Result<SearchReport>
where
    L: DirLister,
    R: BufRead,
    W: Write,
{
    let settings = cli.apply_to(config);
    // With --json, stdout carries only the report; interaction goes to stderr
    let (directory, pattern_text) = if cli.json {
        resolve_inputs(cli, input, &mut io::stderr())?
    } else {
        resolve_inputs(cli, input, output)?
    };

    if !cli.json {
        writeln!(output, "{}", header_line(&directory, &pattern_text))?;
    }

    let pattern = Pattern::with_dot_rule(&pattern_text, settings.dot_rule)?;
    let report = FileSearch::new(lister, pattern)
        .with_options(settings.search_options())
        .search(&directory);

    if cli.json {
        serde_json::to_writer_pretty(&mut *output, &report).context("Failed to serialize report")?;
        writeln!(output)?;
    } else {
        render_report(&report, output)?;
    }

    if settings.pause_on_exit {
        if cli.json {
            wait_for_enter(input, &mut io::stderr())?;
        } else {
            wait_for_enter(input, output)?;
        }
    }

    Ok(report)
}
