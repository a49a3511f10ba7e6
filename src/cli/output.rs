//! Output formatting for CLI

use crate::inference::InferenceStats;
use crate::models::Column;

/// Render a column list as an aligned text table followed by a summary
pub fn format_schema_table(columns: &[Column], stats: &InferenceStats) -> String {
    let name_width = columns
        .iter()
        .map(|c| c.name.chars().count())
        .chain(std::iter::once("COLUMN".len()))
        .max()
        .unwrap_or(0);

    let mut output = format!("{:<name_width$}  {:<7}  NULLABLE\n", "COLUMN", "TYPE");
    for col in columns {
        output.push_str(&format!(
            "{:<name_width$}  {:<7}  {}\n",
            col.name,
            col.value_type.as_sql(),
            if col.has_nulls { "yes" } else { "no" }
        ));
    }

    output.push_str(&format!(
        "\n{} record(s), {} column(s), {} added",
        stats.records_processed,
        columns.len(),
        stats.columns_added
    ));

    if stats.type_mismatches > 0 {
        output.push_str(&format!(
            "\n{} type mismatch(es), first observed type kept:",
            stats.type_mismatches
        ));
        for (name, count) in &stats.mismatched_columns {
            output.push_str(&format!("\n  - {}: {}", name, count));
        }
    }

    output
}
