//! Column-aligned text tables with optional terminal styling

use std::io::{self, Write};

use console::{Style, measure_text_width};

/// One table cell
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    style: Option<Style>,
    link: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            link: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Make the cell a terminal hyperlink to `url` when styling is enabled
    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    fn width(&self) -> usize {
        measure_text_width(&self.text)
    }

    fn write_styled<W: Write>(&self, out: &mut W, column_style: Option<&Style>) -> io::Result<()> {
        let text = match self.style.as_ref().or(column_style) {
            Some(style) => style.clone().force_styling(true).apply_to(&self.text).to_string(),
            None => self.text.clone(),
        };
        match &self.link {
            // OSC 8 hyperlink
            Some(url) => write!(out, "\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\"),
            None => write!(out, "{text}"),
        }
    }
}

struct Column {
    header: String,
    style: Option<Style>,
}

/// A titled table. Widths are computed from the unstyled text so escape
/// sequences never affect alignment.
pub struct Table {
    title: String,
    title_style: Option<Style>,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

const COLUMN_GAP: &str = "  ";

impl Table {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_style: None,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = Some(style);
        self
    }

    pub fn add_column(&mut self, header: impl Into<String>, style: Option<Style>) {
        self.columns.push(Column {
            header: header.into(),
            style,
        });
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(Cell::width)
                    .chain(std::iter::once(measure_text_width(&column.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Write the table. With `styled` unset, no escape sequences are emitted.
    pub fn write<W: Write>(&self, out: &mut W, styled: bool) -> io::Result<()> {
        let widths = self.widths();

        match (&self.title_style, styled) {
            (Some(style), true) => {
                writeln!(out, "{}", style.clone().force_styling(true).apply_to(&self.title))?
            }
            _ => writeln!(out, "{}", self.title)?,
        }

        let header: Vec<Cell> = self.columns.iter().map(|c| Cell::new(&c.header)).collect();
        let bold = Style::new().bold();
        self.write_row(out, &header, &widths, styled.then_some(&bold), styled)?;

        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        writeln!(out, "{}", rule.join(COLUMN_GAP))?;

        for row in &self.rows {
            self.write_row(out, row, &widths, None, styled)?;
        }
        Ok(())
    }

    fn write_row<W: Write>(
        &self,
        out: &mut W,
        row: &[Cell],
        widths: &[usize],
        row_style: Option<&Style>,
        styled: bool,
    ) -> io::Result<()> {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                write!(out, "{COLUMN_GAP}")?;
            }
            if styled {
                let column_style = row_style.or_else(|| self.columns.get(i)?.style.as_ref());
                cell.write_styled(out, column_style)?;
            } else {
                write!(out, "{}", cell.text)?;
            }
            if i < last {
                let pad = widths.get(i).copied().unwrap_or(0).saturating_sub(cell.width());
                write!(out, "{}", " ".repeat(pad))?;
            }
        }
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new("Results").title_style(Style::new().magenta());
        table.add_column("Package", Some(Style::new().cyan()));
        table.add_column("Version", None);
        table.add_row(vec![
            Cell::new("requests").link("https://pypi.org/project/requests/"),
            Cell::new("2.32.3"),
        ]);
        table.add_row(vec![Cell::new("six"), Cell::new("1.16.0 ==")]);
        table
    }

    fn written(table: &Table, styled: bool) -> String {
        let mut out = Vec::new();
        table.write(&mut out, styled).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn write_plain_aligns_columns_without_escapes() {
        let output = written(&sample(), false);

        assert_eq!(
            output,
            "Results\n\
             Package   Version\n\
             ────────  ─────────\n\
             requests  2.32.3\n\
             six       1.16.0 ==\n"
        );
    }

    #[test]
    fn write_styled_emits_hyperlink_and_colors() {
        let output = written(&sample(), true);

        assert!(output.contains("\x1b]8;;https://pypi.org/project/requests/\x1b\\"));
        assert!(output.contains("\x1b["));
        assert!(console::strip_ansi_codes(&output).contains("six"));
    }

    #[test]
    fn write_styled_pads_by_visible_width() {
        let output = written(&sample(), true);
        let six_line = output.lines().find(|l| l.contains("six")).unwrap();

        // "six" + 5 spaces of padding + gap before the version column
        assert!(console::strip_ansi_codes(six_line).starts_with("six       1.16.0"));
    }
}
