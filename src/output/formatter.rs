use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{IsTerminal, Write};

use super::render::{render_float, RenderedRow};
use crate::advice::AdviceEntry;
use crate::scoring::{Factor, FactorTable, RankedCandidate};

const EMPTY_MESSAGE: &str = "No candidates found.";
const SEPARATOR: &str = "  ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Width of each column: the widest cell or header, counted in chars
fn column_widths(header: &[&str], rows: &[Vec<&str>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Pad every cell; first column left-aligned, the rest right-aligned
fn pad_cells(cells: &[&str], widths: &[usize]) -> Vec<String> {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            if i == 0 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect()
}

fn is_sentinel(cell: &str) -> bool {
    cell == "None" || cell == "Unknown"
}

/// Format rendered rows as a table with a header line.
/// Index column: 3 chars (fits "99."), right-aligned, 1-based
pub fn format_table(rows: &[RenderedRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut header = vec!["Ticker", "Score"];
    header.extend(Factor::ALL.iter().map(|f| f.label()));

    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.ticker.as_str(), row.score.as_str()];
            cells.extend(row.factor_columns().iter().map(|(_, value)| *value));
            cells
        })
        .collect();
    let widths = column_widths(&header, &cells);

    let header_line = format!("{:>3} {}", "#", pad_cells(&header, &widths).join(SEPARATOR));
    let mut lines = vec![if use_colors {
        header_line.bold().to_string()
    } else {
        header_line
    }];

    for (idx, row_cells) in cells.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let padded = pad_cells(row_cells, &widths);

        let line = if use_colors {
            let colored: Vec<String> = padded
                .iter()
                .enumerate()
                .map(|(i, cell)| match i {
                    0 => cell.cyan().to_string(),
                    1 => cell.bold().to_string(),
                    _ if is_sentinel(cell.trim()) => cell.dimmed().to_string(),
                    _ => cell.to_string(),
                })
                .collect();
            format!("{} {}", index_str.dimmed(), colored.join(SEPARATOR))
        } else {
            format!("{} {}", index_str, padded.join(SEPARATOR))
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format rendered rows as tab-separated values for scripting
/// Columns: ticker, score, valuation ratio, dividend yield, short-term change,
/// long-term change (no headers, no colors)
pub fn format_tsv(rows: &[RenderedRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                row.ticker,
                row.score,
                row.valuation_ratio,
                row.dividend_yield,
                row.short_term_change,
                row.long_term_change
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write formatted output followed by a newline; empty output writes nothing
pub fn write_output<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", text)
}

/// Pretty-printed JSON of any serializable output
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

/// Per-factor breakdown of one candidate's composite score (for verbose mode)
pub fn format_breakdown(candidate: &RankedCandidate) -> String {
    let mut lines = vec![format!("{}", candidate.ticker)];
    for contribution in &candidate.breakdown {
        let line = match contribution.share {
            Some(share) => format!(
                "  {:<18} share {:>6}%  x{}  = {}",
                contribution.factor.key(),
                render_float(share * 100.0),
                contribution.weight,
                render_float(contribution.contribution * 100.0)
            ),
            None => format!("  {:<18} not eligible", contribution.factor.key()),
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Format allocation advice as a two-column table
pub fn format_advice_table(entries: &[AdviceEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let header = ["Ticker", "Ratio"];
    let cells: Vec<Vec<&str>> = entries
        .iter()
        .map(|e| vec![e.ticker.as_str(), e.ratio.as_str()])
        .collect();
    let widths = column_widths(&header, &cells);

    let header_line = format!("{:>3} {}", "#", pad_cells(&header, &widths).join(SEPARATOR));
    let mut lines = vec![if use_colors {
        header_line.bold().to_string()
    } else {
        header_line
    }];

    for (idx, row_cells) in cells.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let padded = pad_cells(row_cells, &widths);
        let line = if use_colors {
            format!("{} {}{}{}", index_str.dimmed(), padded[0].cyan(), SEPARATOR, padded[1].bold())
        } else {
            format!("{} {}", index_str, padded.join(SEPARATOR))
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format allocation advice as "ticker\tratio" lines
pub fn format_advice_tsv(entries: &[AdviceEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\t{}", e.ticker, e.ratio))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe the effective factor table
pub fn format_factor_table(table: &FactorTable) -> String {
    let header = ["Factor", "Eligible", "Direction", "Weight"];
    let owned: Vec<[String; 4]> = table
        .iter()
        .map(|d| {
            [
                d.factor.key().to_string(),
                d.eligibility.describe().to_string(),
                d.direction.describe().to_string(),
                d.weight.to_string(),
            ]
        })
        .collect();
    let cells: Vec<Vec<&str>> = owned
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let widths = column_widths(&header, &cells);

    std::iter::once(pad_cells(&header, &widths).join(SEPARATOR))
        .chain(cells.iter().map(|row| pad_cells(row, &widths).join(SEPARATOR)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{CompositeScore, FactorContribution};
    use crate::snapshot::{RawFactors, Ticker};
    use std::collections::BTreeMap;

    fn sample_row(ticker: &str, score: &str) -> RenderedRow {
        RenderedRow {
            ticker: ticker.to_string(),
            score: score.to_string(),
            valuation_ratio: "18.55".to_string(),
            dividend_yield: "None".to_string(),
            short_term_change: "-10.00%".to_string(),
            long_term_change: "Unknown".to_string(),
        }
    }

    #[test]
    fn test_format_table_empty() {
        assert_eq!(format_table(&[], false), "No candidates found.");
    }

    #[test]
    fn test_format_table_single() {
        let result = format_table(&[sample_row("NESN", "133.33")], false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Ticker"));
        assert!(lines[0].contains("Score"));
        assert!(lines[0].contains("P/E"));
        assert!(lines[1].starts_with(" 1. NESN"));
        assert!(lines[1].contains("133.33"));
        assert!(lines[1].contains("-10.00%"));
        assert!(lines[1].contains("Unknown"));
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let rows = vec![sample_row("A", "133.33"), sample_row("LONGTICK", "6.67")];
        let result = format_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(" 1. A       "));
        assert!(lines[2].starts_with(" 2. LONGTICK"));
        // Right-aligned scores end at the same column
        let end_1 = lines[1].find("133.33").unwrap() + "133.33".len();
        let end_2 = lines[2].find("6.67").unwrap() + "6.67".len();
        assert_eq!(end_1, end_2);
    }

    #[test]
    fn test_format_table_keeps_order() {
        let rows = vec![sample_row("B", "90.00"), sample_row("A", "10.00")];
        let result = format_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert!(lines[1].contains(" 1. B"));
        assert!(lines[2].contains(" 2. A"));
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_tsv_single() {
        let result = format_tsv(&[sample_row("NESN", "133.33")]);
        assert_eq!(result, "NESN\t133.33\t18.55\tNone\t-10.00%\tUnknown");
    }

    #[test]
    fn test_write_output_empty_tsv_writes_nothing() {
        let mut out = Vec::new();
        write_output(&mut out, &format_tsv(&[])).unwrap();
        assert!(out.is_empty());

        write_output(&mut out, &format_advice_tsv(&[])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_output_appends_newline() {
        let mut out = Vec::new();
        write_output(&mut out, &format_tsv(&[sample_row("A", "1.00")])).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "A\t1.00\t18.55\tNone\t-10.00%\tUnknown\n"
        );
    }

    #[test]
    fn test_format_json_rows() {
        let json = format_json(&[sample_row("NESN", "66.67")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["ticker"], "NESN");
        assert_eq!(parsed[0]["score"], "66.67");
        assert_eq!(parsed[0]["dividend_yield"], "None");
    }

    #[test]
    fn test_format_json_empty() {
        let rows: Vec<RenderedRow> = vec![];
        assert_eq!(format_json(&rows).unwrap(), "[]");
    }

    #[test]
    fn test_format_breakdown() {
        let candidate = RankedCandidate {
            ticker: Ticker::from("A"),
            factors: RawFactors::default(),
            score: CompositeScore::Scored(4.0 / 3.0),
            breakdown: vec![
                FactorContribution {
                    factor: Factor::ValuationRatio,
                    share: None,
                    weight: 1.0,
                    contribution: 0.0,
                },
                FactorContribution {
                    factor: Factor::ShortTermChange,
                    share: Some(2.0 / 3.0),
                    weight: 2.0,
                    contribution: 4.0 / 3.0,
                },
            ],
        };
        let result = format_breakdown(&candidate);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "A");
        assert!(lines[1].contains("valuation_ratio"));
        assert!(lines[1].contains("not eligible"));
        assert!(lines[2].contains("66.67%"));
        assert!(lines[2].contains("x2"));
        assert!(lines[2].ends_with("= 133.33"));
    }

    #[test]
    fn test_format_advice_table() {
        let entries = vec![
            AdviceEntry { ticker: "A".to_string(), ratio: "66.67%".to_string(), share: 2.0 / 3.0 },
            AdviceEntry { ticker: "B".to_string(), ratio: "33.33%".to_string(), share: 1.0 / 3.0 },
        ];
        let result = format_advice_table(&entries, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Ratio"));
        assert!(lines[1].starts_with(" 1. A"));
        assert!(lines[1].ends_with("66.67%"));
        assert_eq!(format_advice_tsv(&entries), "A\t66.67%\nB\t33.33%");
    }

    #[test]
    fn test_format_advice_empty() {
        assert_eq!(format_advice_table(&[], false), "No candidates found.");
        assert_eq!(format_advice_tsv(&[]), "");
    }

    #[test]
    fn test_format_factor_table() {
        let weights = BTreeMap::from([("dividend_yield".to_string(), 0.5)]);
        let table = FactorTable::from_weights(&weights).unwrap();
        let result = format_factor_table(&table);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("valuation_ratio"));
        assert!(lines[1].contains("lower is better"));
        assert!(lines[2].ends_with("0.5"));
        assert!(lines[3].contains("< 0 (by magnitude)"));
        assert!(lines[3].ends_with("2"));
    }
}
