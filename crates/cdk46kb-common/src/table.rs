//! String tables backed by CSV.
//!
//! Every cell is kept as text, the way the knowledge-base files are authored:
//! no type inference, missing values are the empty string.

use std::io::{BufReader, Read, Write};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use serde_json::{Map, Value};

use crate::error::{Result, TableError};

/// Ordered column names plus ordered rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// A one-column table, one row per value.
    pub fn from_column<I, S>(header: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: vec![header.into()],
            rows: values.into_iter().map(|v| vec![v.into()]).collect(),
        }
    }

    /// Append a row. The row must have exactly one cell per column.
    pub fn push_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.headers.len() {
            return Err(TableError::Schema(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Lowercase every column name in place.
    pub fn lowercase_headers(&mut self) {
        for h in &mut self.headers {
            *h = h.to_lowercase();
        }
    }

    /// Column names that occur more than once, in first-seen order.
    pub fn duplicate_headers(&self) -> Vec<String> {
        let mut dups = Vec::new();
        for (i, h) in self.headers.iter().enumerate() {
            if self.headers[..i].contains(h) && !dups.contains(h) {
                dups.push(h.clone());
            }
        }
        dups
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows for which `keep` returns true.
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[String]) -> bool,
    {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Rows as JSON objects keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(h, v)| (h.clone(), Value::String(v.clone())))
                    .collect()
            })
            .collect()
    }

    // ── CSV I/O ───────────────────────────────────────────────────────────────

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse CSV with a header row. Ragged rows are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                // Spreadsheet exports often lead with a byte-order mark.
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    // ── Spreadsheets ──────────────────────────────────────────────────────────

    /// First worksheet of an `.xlsx` workbook: the first row is the header,
    /// every cell is rendered as text and blank cells become `""`.
    pub fn read_xlsx(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut workbook: Xlsx<_> = Xlsx::new(BufReader::new(file))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::Schema("workbook has no worksheets".to_string()))??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
        let headers = rows.next().unwrap_or_default();
        Ok(Self { headers, rows: rows.collect() })
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        String::from_utf8(buf).map_err(|e| TableError::Schema(e.to_string()))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // whole floats print without a fraction: 12.0 -> "12"
        other => other.to_string(),
    }
}
