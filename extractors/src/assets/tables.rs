use serde::Serialize;
use std::path::Path;
use std::process::Command;

/// A block of aligned rows found on one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub page_number: usize,
    pub rows: Vec<Vec<String>>,
}

/// Trait for optional table extraction backends.
///
/// Implementations must not fail: a missing backend or a failed run yields
/// an empty list.
pub trait TableExtractor: Send + Sync {
    fn extract_tables(&self, pdf_path: &Path) -> Vec<Table>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Used when table extraction is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTableExtractor;

impl TableExtractor for NoopTableExtractor {
    fn extract_tables(&self, _pdf_path: &Path) -> Vec<Table> {
        Vec::new()
    }

    fn backend_name(&self) -> &str {
        "none"
    }
}

/// Table backend using `pdftotext -layout` (from poppler-utils).
///
/// Layout mode keeps column alignment as runs of spaces, so consecutive
/// lines with two or more space-separated cells are grouped into a table.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdftotextTableExtractor;

impl PdftotextTableExtractor {
    pub fn new() -> Self {
        PdftotextTableExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn run(&self, pdf_path: &Path) -> anyhow::Result<String> {
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(pdf_path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    anyhow::anyhow!("pdftotext not found, skipping table extraction")
                } else {
                    anyhow::anyhow!("pdftotext failed: {}", e)
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pdftotext exited with code {}: {}", code, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TableExtractor for PdftotextTableExtractor {
    fn extract_tables(&self, pdf_path: &Path) -> Vec<Table> {
        match self.run(pdf_path) {
            Ok(layout) => parse_layout_tables(&layout),
            Err(e) => {
                tracing::warn!("Error extracting tables from {}: {}", pdf_path.display(), e);
                Vec::new()
            }
        }
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split a layout line into cells separated by runs of two or more spaces
fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .split("  ")
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Group runs of multi-cell lines into tables, one or more per page.
/// pdftotext separates pages with form feeds.
pub(crate) fn parse_layout_tables(layout: &str) -> Vec<Table> {
    let mut tables = Vec::new();

    for (i, page_text) in layout.split('\x0c').enumerate() {
        let mut rows: Vec<Vec<String>> = Vec::new();

        for line in page_text.lines() {
            let cells = split_cells(line);
            if cells.len() >= 2 {
                rows.push(cells);
                continue;
            }

            let block = std::mem::take(&mut rows);
            if block.len() >= 2 {
                tables.push(Table {
                    page_number: i + 1,
                    rows: block,
                });
            }
        }

        if rows.len() >= 2 {
            tables.push(Table {
                page_number: i + 1,
                rows,
            });
        }
    }

    tables
}
