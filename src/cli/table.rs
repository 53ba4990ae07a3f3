//! Plain-text tables for terminal listings

/// Render rows under a header, boxed with ASCII borders.
/// Headers are upper-cased; short rows are padded with empty cells.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: Vec<String>| {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = w - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border.clone());
    out.push(format_row(headers.iter().map(|h| h.to_uppercase()).collect()));
    out.push(border.clone());
    for row in rows {
        out.push(format_row(row.clone()));
    }
    if !rows.is_empty() {
        out.push(border);
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fit_the_widest_cell() {
        let table = render(
            &["ISBN", "Title"],
            &[
                vec!["A".to_string(), "Dune".to_string()],
                vec!["978-0".to_string(), "Ulysses".to_string()],
            ],
        );
        let expected = "\
+-------+---------+
| ISBN  | TITLE   |
+-------+---------+
| A     | Dune    |
| 978-0 | Ulysses |
+-------+---------+";
        assert_eq!(table, expected);
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let table = render(&["ID"], &[]);
        assert_eq!(table, "+----+\n| ID |\n+----+");
    }

    #[test]
    fn short_rows_are_padded() {
        let table = render(&["A", "B"], &[vec!["x".to_string()]]);
        assert!(table.contains("| x |   |"));
    }
}
