use super::domain::Column;
use super::query::RowRange;
use super::vacancy::ListingVacancy;

/// Cells wider than this are wrapped unless the header is wider still.
pub const MAX_COLUMN_WIDTH: usize = 20;

/// Numbers every selected vacancy, keeps the rows inside `range` and draws
/// them as a left-aligned grid with a rule between every row.
pub fn render_listing(
    vacancies: &[&ListingVacancy],
    range: RowRange,
    columns: &[Column],
) -> String {
    let (start, end) = range.bounds(vacancies.len());
    let rows: Vec<Vec<String>> = vacancies
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(index, vacancy)| {
            columns
                .iter()
                .map(|column| match column {
                    Column::Number => (index + 1).to_string(),
                    other => vacancy.cell(*other),
                })
                .collect()
        })
        .collect();

    let headers: Vec<&str> = columns.iter().map(|column| column.header()).collect();
    render_grid(&headers, &rows, MAX_COLUMN_WIDTH)
}

pub fn render_grid(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| block_width(cell).min(max_width))
                .fold(text_width(header), usize::max)
        })
        .collect();

    let rule = rule_line(&widths);
    let mut lines = vec![rule.clone()];
    let header_cells: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    push_row(&mut lines, &header_cells, &widths);
    lines.push(rule.clone());

    for row in rows {
        push_row(&mut lines, row, &widths);
        lines.push(rule.clone());
    }
    lines.join("\n")
}

fn rule_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn push_row(lines: &mut Vec<String>, cells: &[String], widths: &[usize]) {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let cell = cells.get(index).map(String::as_str).unwrap_or_default();
            cell.split('\n')
                .flat_map(|line| wrap_line(line, *width))
                .collect()
        })
        .collect();

    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    for line_index in 0..height {
        let mut line = String::from("|");
        for (cell_lines, width) in wrapped.iter().zip(widths) {
            let text = cell_lines.get(line_index).map(String::as_str).unwrap_or_default();
            line.push(' ');
            line.push_str(text);
            line.push_str(&" ".repeat(width.saturating_sub(text_width(text))));
            line.push_str(" |");
        }
        lines.push(line);
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if text_width(line) <= width || width == 0 {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let current_width = text_width(&current);
            let needed = if current.is_empty() {
                word.len()
            } else {
                current_width + 1 + word.len()
            };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
                continue;
            }
            let rest = word.split_off(width);
            wrapped.push(word.into_iter().collect());
            word = rest;
        }
    }
    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn block_width(text: &str) -> usize {
    text.split('\n').map(text_width).max().unwrap_or(0)
}
