//! SQL pretty-printing seam
//!
//! Formatting is cosmetic: a printer may change whitespace and layout but
//! never the statements themselves.

/// Formats a block of SQL text
pub trait SqlPrettyPrinter {
    fn pretty_print(&self, sql: &str) -> String;
}

impl<F> SqlPrettyPrinter for F
where
    F: Fn(&str) -> String,
{
    fn pretty_print(&self, sql: &str) -> String {
        self(sql)
    }
}

/// Default printer: strips trailing whitespace, drops leading and trailing
/// blank lines and collapses runs of blank lines into one.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceFormatter;

impl SqlPrettyPrinter for WhitespaceFormatter {
    fn pretty_print(&self, sql: &str) -> String {
        let mut out: Vec<&str> = Vec::new();
        let mut previous_blank = true;

        for line in sql.lines().map(str::trim_end) {
            let blank = line.is_empty();
            if blank && previous_blank {
                continue;
            }
            out.push(line);
            previous_blank = blank;
        }

        while out.last().is_some_and(|line| line.is_empty()) {
            out.pop();
        }

        out.join("\n")
    }
}
