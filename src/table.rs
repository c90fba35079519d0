//! Schema-checked CSV tables.
//!
//! Each table declares its columns up front. The header is written from that
//! schema and every row must produce exactly those columns in that order.

use crate::error::{HarvestError, Result};
use std::io::Write;

const SEPARATOR: char = ',';
const LINE_TERMINATOR: &str = "\r\n";

/// A flat record that can be written as one table row
pub trait Row {
    /// Column names paired with cell values, in output order. `None` is an empty cell.
    fn fields(&self) -> Vec<(&'static str, Option<String>)>;
}

/// Ordered column names of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub columns: Vec<&'static str>,
}

impl Schema {
    pub fn new(name: impl Into<String>, columns: &[&'static str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.to_vec(),
        }
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(w: &mut W, row: &[&str]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", SEPARATOR)?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(LINE_TERMINATOR.as_bytes())
}

/// Writes rows of one schema, header first
pub struct TableWriter<W: Write> {
    schema: Schema,
    out: W,
    rows: usize,
}

impl<W: Write> TableWriter<W> {
    /// Create the writer and emit the header line
    pub fn new(schema: Schema, mut out: W) -> Result<Self> {
        write_row(&mut out, &schema.columns)?;
        Ok(Self {
            schema,
            out,
            rows: 0,
        })
    }

    /// Number of data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write one row, rejecting it if its columns differ from the schema
    pub fn write<R: Row>(&mut self, row: &R) -> Result<()> {
        let fields = row.fields();
        let matches = fields.len() == self.schema.columns.len()
            && fields
                .iter()
                .zip(&self.schema.columns)
                .all(|((name, _), column)| name == column);
        if !matches {
            return Err(HarvestError::SchemaViolation {
                table: self.schema.name.clone(),
                expected: self.schema.columns.iter().map(|c| c.to_string()).collect(),
                actual: fields.iter().map(|(name, _)| name.to_string()).collect(),
            });
        }

        let cells: Vec<&str> = fields
            .iter()
            .map(|(_, value)| value.as_deref().unwrap_or(""))
            .collect();
        write_row(&mut self.out, &cells)?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
