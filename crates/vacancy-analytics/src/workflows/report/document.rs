use super::tables::Sheet;
use std::fmt::{self, Write};

/// Renders both sheets and the chart reference as a standalone HTML page.
pub fn render_html(
    profession: &str,
    years: &Sheet,
    cities: &Sheet,
    chart_file: &str,
) -> Result<String, fmt::Error> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"ru\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(
        html,
        "<title>Аналитика по зарплатам и городам для профессии {}</title>",
        escape_html(profession)
    )?;
    writeln!(
        html,
        "<style>body{{font-family:Verdana,sans-serif}}table{{border-collapse:collapse;margin-bottom:24px}}\
th,td{{border:1px solid #000;padding:4px 8px}}th{{font-weight:bold}}</style>"
    )?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<h1>Аналитика по зарплатам и городам для профессии {}</h1>",
        escape_html(profession)
    )?;
    writeln!(
        html,
        "<img src=\"{}\" alt=\"Графики\" width=\"100%\">",
        escape_html(chart_file)
    )?;

    writeln!(html, "<h2>Статистика по годам</h2>")?;
    write_table(&mut html, years)?;
    writeln!(html, "<h2>Статистика по городам</h2>")?;
    write_table(&mut html, cities)?;

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn write_table(html: &mut String, sheet: &Sheet) -> fmt::Result {
    html.push_str("<table>\n<tr>");
    for header in &sheet.headers {
        write!(html, "<th>{}</th>", escape_html(header))?;
    }
    html.push_str("</tr>\n");

    for row in &sheet.rows {
        html.push_str("<tr>");
        for cell in row {
            write!(html, "<td>{}</td>", escape_html(cell))?;
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    Ok(())
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
