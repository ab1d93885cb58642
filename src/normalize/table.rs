//! Tabular parsing (CSV and XLSX)

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::types::{AppError, AppResult};

/// One cell of a rectangular dataset. Untagged so previews serialize as plain
/// JSON scalars (`null`, number, string).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Plain-text rendering for the sample block of a prompt context.
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Integers render without a trailing `.0` so a CSV `10` round-trips as `10`.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A rectangular dataset: ordered unique column names and rows of scalars.
/// Rows are padded/truncated to the column count at parse time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..self.rows.len().min(n)]
    }
}

pub fn parse_csv(bytes: &[u8]) -> AppResult<DataTable> {
    let delimiter = sniff_delimiter(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Normalization(format!("failed to read CSV header: {}", e)))?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::Normalization(
            "CSV file has no header row".to_string(),
        ));
    }
    let columns = unique_columns(headers.iter().map(|h| h.trim().to_string()).collect());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| AppError::Normalization(format!("failed to parse CSV record: {}", e)))?;
        let mut row: Vec<CellValue> = record.iter().map(parse_scalar).collect();
        row.resize(columns.len(), CellValue::Null);
        rows.push(row);
    }

    Ok(DataTable { columns, rows })
}

/// Parse the first worksheet of an XLSX workbook, first row as header.
pub fn parse_xlsx(bytes: &[u8]) -> AppResult<DataTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::Normalization(format!("failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Normalization("workbook has no worksheets".to_string()))?
        .map_err(|e| AppError::Normalization(format!("failed to read worksheet: {}", e)))?;

    let mut row_iter = range.rows();
    let header = row_iter
        .next()
        .ok_or_else(|| AppError::Normalization("worksheet is empty".to_string()))?;
    let columns = unique_columns(header.iter().map(header_name).collect());

    let mut rows = Vec::new();
    for row in row_iter {
        let mut values: Vec<CellValue> = row.iter().map(convert_cell).collect();
        values.resize(columns.len(), CellValue::Null);
        rows.push(values);
    }

    Ok(DataTable { columns, rows })
}

/// Pick the delimiter by counting candidates in the first line. Ties go to
/// the earlier candidate, so a plain comma-separated header wins.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(b"");
    CANDIDATES
        .into_iter()
        .enumerate()
        .max_by_key(|&(position, candidate)| {
            // weight earlier candidates so the comma wins ties
            first_line.iter().filter(|&&b| b == candidate).count() * 4 + (3 - position)
        })
        .map(|(_, candidate)| candidate)
        .unwrap_or(b',')
}

fn parse_scalar(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.trim().to_string())
            }
        }
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Name blank headers positionally and suffix repeats, keeping first
/// occurrences and original order intact.
fn unique_columns(raw: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.is_empty() {
                format!("column_{}", i)
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0usize);
            let unique = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            unique
        })
        .collect()
}
