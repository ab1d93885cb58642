//! Prompt context derivation
//!
//! Turns normalized content into the bounded textual summary inserted into
//! every request. Contexts are rebuilt per query and never cached.

use crate::normalize::{CellValue, DataTable};

/// Text content is clipped to this many characters before prompting.
pub const MAX_TEXT_CONTEXT_CHARS: usize = 10_000;

/// How many rows the sample block shows.
const SAMPLE_ROWS: usize = 5;

/// Per-column summary of a numeric column.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DescriptiveStat {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Fixed-format summary of a tabular dataset: shape, column names in original
/// order, a head sample, and numeric descriptive statistics.
pub fn table_context(table: &DataTable) -> String {
    format!(
        "Dataset Information:\n\
         Total Rows: {}\n\
         Total Columns: {}\n\
         Column Names: {}\n\
         \n\
         Data Sample (first {} rows):\n\
         {}\n\
         \n\
         Basic Statistics:\n\
         {}",
        table.row_count(),
        table.column_count(),
        table.columns.join(", "),
        SAMPLE_ROWS,
        render_head(table),
        render_stats(&descriptive_stats(table)),
    )
}

/// The first [`MAX_TEXT_CONTEXT_CHARS`] characters, unmodified if shorter.
pub fn text_context(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CONTEXT_CHARS) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

pub fn descriptive_stats(table: &DataTable) -> Vec<DescriptiveStat> {
    table
        .columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| row.get(index).and_then(CellValue::as_number))
                .collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(|a, b| a.total_cmp(b));

            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let std_dev = if count > 1 {
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / (count - 1) as f64;
                variance.sqrt()
            } else {
                0.0
            };
            let median = if count % 2 == 1 {
                values[count / 2]
            } else {
                (values[count / 2 - 1] + values[count / 2]) / 2.0
            };

            Some(DescriptiveStat {
                column: column.clone(),
                count,
                mean,
                std_dev,
                min: values[0],
                median,
                max: values[count - 1],
            })
        })
        .collect()
}

fn render_head(table: &DataTable) -> String {
    let mut grid: Vec<Vec<String>> = vec![table.columns.clone()];
    for row in table.head(SAMPLE_ROWS) {
        grid.push(row.iter().map(CellValue::render).collect());
    }
    render_grid(&grid)
}

fn render_stats(stats: &[DescriptiveStat]) -> String {
    if stats.is_empty() {
        return "No numeric columns.".to_string();
    }

    let mut grid = vec![vec![
        "column".to_string(),
        "count".to_string(),
        "mean".to_string(),
        "std".to_string(),
        "min".to_string(),
        "median".to_string(),
        "max".to_string(),
    ]];
    for stat in stats {
        grid.push(vec![
            stat.column.clone(),
            stat.count.to_string(),
            format!("{:.6}", stat.mean),
            format!("{:.6}", stat.std_dev),
            format!("{:.6}", stat.min),
            format!("{:.6}", stat.median),
            format!("{:.6}", stat.max),
        ]);
    }
    render_grid(&grid)
}

/// Left-aligned fixed-width rendering, two spaces between columns.
fn render_grid(grid: &[Vec<String>]) -> String {
    let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in grid {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    grid.iter()
        .map(|row| {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ");
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DataTable;

    fn sample_table() -> DataTable {
        DataTable {
            columns: vec!["name".to_string(), "val".to_string()],
            rows: vec![
                vec![
                    CellValue::Text("A".to_string()),
                    CellValue::Number(10.0),
                ],
                vec![
                    CellValue::Text("B".to_string()),
                    CellValue::Number(20.0),
                ],
            ],
        }
    }

    #[test]
    fn test_table_context_reports_shape_and_columns() {
        let context = table_context(&sample_table());
        assert!(context.contains("Total Rows: 2"));
        assert!(context.contains("Total Columns: 2"));
        assert!(context.contains("Column Names: name, val"));
    }

    #[test]
    fn test_table_context_lists_columns_in_original_order() {
        let table = DataTable {
            columns: vec!["z".into(), "a".into(), "m".into()],
            rows: vec![],
        };
        let context = table_context(&table);
        assert!(context.contains("Column Names: z, a, m"));
    }

    #[test]
    fn test_table_context_samples_at_most_five_rows() {
        let mut table = sample_table();
        table.rows = (0..8)
            .map(|i| {
                vec![
                    CellValue::Text(format!("row{}", i)),
                    CellValue::Number(i as f64),
                ]
            })
            .collect();
        let context = table_context(&table);
        assert!(context.contains("row0"));
        assert!(context.contains("row4"));
        assert!(!context.contains("row5"));
        // shape still reports the full dataset
        assert!(context.contains("Total Rows: 8"));
    }

    #[test]
    fn test_descriptive_stats() {
        let stats = descriptive_stats(&sample_table());
        assert_eq!(stats.len(), 1);
        let val = &stats[0];
        assert_eq!(val.column, "val");
        assert_eq!(val.count, 2);
        assert_eq!(val.mean, 15.0);
        assert_eq!(val.min, 10.0);
        assert_eq!(val.median, 15.0);
        assert_eq!(val.max, 20.0);
        assert!((val.std_dev - 50.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stats_skip_non_numeric_and_null_cells() {
        let table = DataTable {
            columns: vec!["mixed".into()],
            rows: vec![
                vec![CellValue::Number(4.0)],
                vec![CellValue::Text("n/a".into())],
                vec![CellValue::Null],
                vec![CellValue::Number(6.0)],
            ],
        };
        let stats = descriptive_stats(&table);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].mean, 5.0);
    }

    #[test]
    fn test_all_text_table_has_no_stats_block_rows() {
        let table = DataTable {
            columns: vec!["name".into()],
            rows: vec![vec![CellValue::Text("A".into())]],
        };
        let context = table_context(&table);
        assert!(context.contains("No numeric columns."));
    }

    #[test]
    fn test_text_context_truncates_at_limit() {
        let long: String = "x".repeat(MAX_TEXT_CONTEXT_CHARS + 500);
        let context = text_context(&long);
        assert_eq!(context.chars().count(), MAX_TEXT_CONTEXT_CHARS);
    }

    #[test]
    fn test_text_context_counts_characters_not_bytes() {
        let long: String = "é".repeat(MAX_TEXT_CONTEXT_CHARS + 1);
        let context = text_context(&long);
        assert_eq!(context.chars().count(), MAX_TEXT_CONTEXT_CHARS);
    }

    #[test]
    fn test_text_context_passes_short_text_unmodified() {
        let short = "a modest document";
        assert_eq!(text_context(short), short);
        let exactly: String = "y".repeat(MAX_TEXT_CONTEXT_CHARS);
        assert_eq!(text_context(&exactly), exactly);
    }
}
