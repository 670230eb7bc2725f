//! Column-aligned table output

/// Render rows as a column-aligned table with headers.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let num_cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<&str> = headers.to_vec();
    push_line(&mut out, &header_cells, &widths);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_line(&mut out, &cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let w = widths.get(i).copied().unwrap_or(0);
            format!("{:<width$}", cell, width = w)
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Print rows as a column-aligned table with headers.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", format_table(headers, rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_only() {
        assert_eq!(format_table(&["NAME", "ROLE"], &[]), "NAME  ROLE\n");
    }

    #[test]
    fn test_columns_align_to_widest_cell() {
        let rows = vec![
            vec!["wds-production".to_string(), "wds".to_string()],
            vec!["its1".to_string(), "its".to_string()],
        ];
        let table = format_table(&["NAME", "ROLE"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAME            ROLE");
        assert_eq!(lines[1], "wds-production  wds");
        assert_eq!(lines[2], "its1            its");
    }

    #[test]
    fn test_extra_cells_are_not_padded() {
        let rows = vec![vec!["a".to_string(), "b".to_string(), "extra".to_string()]];
        let table = format_table(&["X"], &rows);
        assert_eq!(table.lines().nth(1), Some("a  b  extra"));
    }
}
