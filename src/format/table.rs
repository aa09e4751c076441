//! Plain-text tables

use std::fmt;

/// A bordered text table with a header row
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Line printed above the table
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Truncate cells wider than `width` characters
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width.max(2));
        self
    }

    /// Add a row; missing cells render empty, extra cells are dropped
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell(&self, text: &str) -> String {
        match self.max_width {
            Some(max) if text.chars().count() > max => {
                let mut cut: String = text.chars().take(max - 1).collect();
                cut.push('…');
                cut
            }
            _ => text.to_string(),
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| self.cell(h).chars().count()).collect();
        for row in &self.rows {
            for (w, c) in widths.iter_mut().zip(row) {
                *w = (*w).max(self.cell(c).chars().count());
            }
        }
        widths
    }
}

fn rule(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    writeln!(f, "{}", line)
}

impl Table {
    fn line(&self, f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
        let mut line = String::from("|");
        for (w, c) in widths.iter().zip(cells) {
            let text = self.cell(c);
            let pad = w - text.chars().count();
            line.push(' ');
            line.push_str(&text);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        writeln!(f, "{}", line)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        let widths = self.widths();
        rule(f, &widths)?;
        self.line(f, &widths, &self.headers)?;
        rule(f, &widths)?;
        for row in &self.rows {
            self.line(f, &widths, row)?;
        }
        rule(f, &widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut table = Table::new(["Unit", "Distance"]);
        table.push_row(["Kilometers", "343.56 km"]);
        table.push_row(["Miles", "213.48 miles"]);

        let expected = "\
+------------+--------------+
| Unit       | Distance     |
+------------+--------------+
| Kilometers | 343.56 km    |
| Miles      | 213.48 miles |
+------------+--------------+
";
        assert_eq!(table.to_string(), expected);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_ragged_rows() {
        let mut table = Table::new(["A", "B"]);
        table.push_row(["only one"]);
        table.push_row(["x", "y", "dropped"]);

        let out = table.to_string();
        assert!(out.contains("| only one |   |"));
        assert!(!out.contains("dropped"));
    }

    #[test]
    fn test_max_width_and_title() {
        let mut table = Table::new(["Address"]).with_title("Results").with_max_width(6);
        table.push_row(["Jalan Sudirman"]);

        let out = table.to_string();
        assert!(out.starts_with("Results\n"));
        assert!(out.contains("| Jalan… |"));
    }

    #[test]
    fn test_multibyte_cells_align() {
        let mut table = Table::new(["k", "v"]);
        table.push_row(["Île", "ok"]);
        let out = table.to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
    }
}
