//! Renderers for display rows and frame reports.

mod console;
mod render;

pub use console::write_frame_report;
pub use render::{escape_csv_field, format_csv, format_json, format_table};

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::format::DisplayRow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn render(&self, rows: &[DisplayRow]) -> Result<String> {
        match self {
            OutputFormat::Table => Ok(format_table(rows)),
            OutputFormat::Json => format_json(rows),
            OutputFormat::Csv => Ok(format_csv(rows)),
        }
    }
}

/// Write rendered output to `path`, or stdout when `None`.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_text(&mut file, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            write_text(&mut stdout.lock(), text)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    w.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_case_insensitively() {
        use clap::ValueEnum;
        assert_eq!(OutputFormat::from_str("table", true).unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("JSON", true).unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("Csv", true).unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_output("a,b", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn write_output_missing_dir_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("rows.csv");
        let err = write_output("x", Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }

    #[test]
    fn render_empty_rows() {
        assert_eq!(OutputFormat::Table.render(&[]).unwrap(), "");
        assert_eq!(OutputFormat::Json.render(&[]).unwrap(), "[]");
        assert_eq!(OutputFormat::Csv.render(&[]).unwrap(), "");
    }
}
