/// Raw log loading and line filtering
///
/// Benchmark harness logs mark failed runs inline with `ERROR` or `TIMEOUT`.
/// Any line containing one of those markers is dropped before parsing; every
/// other line is kept byte for byte, line terminator included.
use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const REJECT_MARKERS: [&str; 2] = ["ERROR", "TIMEOUT"];

pub struct LineFilter {
    markers: AhoCorasick,
}

/// Result of filtering a raw log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLines<'a> {
    pub kept: Vec<&'a str>,
    pub rejected: usize,
}

impl FilteredLines<'_> {
    /// Reassemble the surviving lines into one text blob
    pub fn text(&self) -> String {
        self.kept.concat()
    }
}

impl LineFilter {
    pub fn new() -> Result<Self> {
        Self::with_markers(REJECT_MARKERS)
    }

    pub fn with_markers<I, S>(markers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let markers = AhoCorasick::new(markers).context("Failed to build line filter")?;
        Ok(Self { markers })
    }

    /// True if the line carries a failure marker anywhere (case-sensitive)
    pub fn is_rejected(&self, line: &str) -> bool {
        self.markers.is_match(line)
    }

    pub fn filter<'a>(&self, content: &'a str) -> FilteredLines<'a> {
        let mut kept = Vec::new();
        let mut rejected = 0;

        for line in content.split_inclusive('\n') {
            if self.is_rejected(line) {
                rejected += 1;
            } else {
                kept.push(line);
            }
        }

        FilteredLines { kept, rejected }
    }
}

/// Read `input`, drop marked lines, and write the survivors to `cleaned`.
///
/// Returns the cleaned text so callers don't need to read the copy back.
pub fn clean_file(input: &Path, cleaned: &Path, filter: &LineFilter) -> Result<String> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read data file: {}", input.display()))?;

    let filtered = filter.filter(&content);
    let text = filtered.text();

    if let Some(parent) = cleaned.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(cleaned, &text)
        .with_context(|| format!("Failed to write cleaned file: {}", cleaned.display()))?;

    info!(
        "Cleaned {}: kept {} lines, dropped {} error/timeout lines",
        input.display(),
        filtered.kept.len(),
        filtered.rejected
    );
    debug!("Wrote cleaned copy to {}", cleaned.display());

    Ok(text)
}
