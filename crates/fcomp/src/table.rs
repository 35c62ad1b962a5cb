//! canonical table formatting
//!
//! Each cell is padded to the widest cell of its column, with one space of margin on both sides:
//!
//! ```
//! let rows = fcomp::table::normalize(&["| a | bb |", "|ccc|d|"]);
//! assert_eq!(rows, vec!["| a   | bb |", "| ccc | d  |"]);
//! ```
//!
//! Widths are counted in `char`s. Escaped pipes (`\|`) are cell content.

/// Normalize one contiguous run of table rows
///
/// Rows with fewer cells than the widest row are filled up with empty cells.
pub fn normalize<S: AsRef<str>>(rows: &[S]) -> Vec<String> {
    let rows: Vec<Vec<&str>> = rows.iter().map(|row| split_cells(row.as_ref())).collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or_default();
    let mut widths = vec![0; columns];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter().map(|row| render_row(row, &widths)).collect()
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let mut row = String::from("|");

    for (index, &width) in widths.iter().enumerate() {
        let cell = cells.get(index).copied().unwrap_or_default();
        if width == 0 {
            row.push_str(" |");
        } else {
            row.push_str(&format!(" {cell:<width$} |"));
        }
    }

    row
}

/// Split a row into trimmed cell contents
fn split_cells(row: &str) -> Vec<&str> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(stripped) if !ends_with_escape(stripped) => stripped,
        _ => row,
    };

    let mut cells = vec![];
    let mut start = 0;
    let mut escaped = false;
    for (index, char) in row.char_indices() {
        match char {
            '\\' if !escaped => escaped = true,
            '|' if !escaped => {
                cells.push(row[start..index].trim());
                start = index + 1;
            }
            _ => escaped = false,
        }
    }
    cells.push(row[start..].trim());

    cells
}

/// `true` if `text` ends in an unpaired backslash
fn ends_with_escape(text: &str) -> bool {
    let backslashes = text.chars().rev().take_while(|&char| char == '\\').count();
    backslashes % 2 == 1
}
