use super::document::escape_html;
use super::tables::with_other_bucket;
use crate::workflows::stats::VacancyStatistics;
use std::f64::consts::PI;
use std::fmt::{self, Write};

const WIDTH: f64 = 1600.0;
const HEIGHT: f64 = 900.0;
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Copy)]
struct Panel {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Panel {
    fn quadrant(column: u8, row: u8) -> Self {
        Self {
            x: f64::from(column) * WIDTH / 2.0,
            y: f64::from(row) * HEIGHT / 2.0,
            width: WIDTH / 2.0,
            height: HEIGHT / 2.0,
        }
    }

    fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

struct Series<'a> {
    label: String,
    values: &'a [f64],
}

/// Draws the 2x2 chart grid: salary and count by year, salary by area and
/// the area share pie.
pub fn render_svg(stats: &VacancyStatistics) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"Verdana, sans-serif\">"
    )?;
    writeln!(
        svg,
        "<rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"#ffffff\"/>"
    )?;

    let years: Vec<String> = stats.by_year.iter().map(|y| y.year.to_string()).collect();
    let profession = &stats.profession;

    let salaries: Vec<f64> = stats.by_year.iter().map(|y| y.mean_salary as f64).collect();
    let profession_salaries: Vec<f64> = stats
        .by_year_profession
        .iter()
        .map(|y| y.mean_salary as f64)
        .collect();
    grouped_bars(
        &mut svg,
        Panel::quadrant(0, 0),
        "Уровень зарплат по годам",
        &years,
        [
            Series {
                label: "Средняя з/п".to_string(),
                values: &salaries,
            },
            Series {
                label: format!("з/п {profession}"),
                values: &profession_salaries,
            },
        ],
    )?;

    let counts: Vec<f64> = stats.by_year.iter().map(|y| y.count as f64).collect();
    let profession_counts: Vec<f64> = stats
        .by_year_profession
        .iter()
        .map(|y| y.count as f64)
        .collect();
    grouped_bars(
        &mut svg,
        Panel::quadrant(1, 0),
        "Количество вакансий по годам",
        &years,
        [
            Series {
                label: "Количество вакансий".to_string(),
                values: &counts,
            },
            Series {
                label: format!("Количество вакансий {profession}"),
                values: &profession_counts,
            },
        ],
    )?;

    let areas: Vec<(String, f64)> = stats
        .area_salaries
        .iter()
        .map(|area| (area.area_name.clone(), area.mean_salary as f64))
        .collect();
    horizontal_bars(
        &mut svg,
        Panel::quadrant(0, 1),
        "Уровень зарплат по городам",
        &areas,
    )?;

    let shares: Vec<(String, f64)> = stats
        .area_shares
        .iter()
        .map(|area| (area.area_name.clone(), area.share))
        .collect();
    pie(
        &mut svg,
        Panel::quadrant(1, 1),
        "Доля вакансий по городам",
        &with_other_bucket(&shares),
    )?;

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn title(svg: &mut String, panel: Panel, text: &str) -> fmt::Result {
    writeln!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"20\" text-anchor=\"middle\">{}</text>",
        panel.center_x(),
        panel.y + 28.0,
        escape_html(text)
    )
}

fn max_value<'v>(values: impl IntoIterator<Item = &'v f64>) -> f64 {
    values
        .into_iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(0.0_f64, f64::max)
        .max(1.0)
}

fn grouped_bars(
    svg: &mut String,
    panel: Panel,
    caption: &str,
    labels: &[String],
    series: [Series<'_>; 2],
) -> fmt::Result {
    title(svg, panel, caption)?;

    let left = panel.x + 80.0;
    let top = panel.y + 50.0;
    let width = panel.width - 110.0;
    let height = panel.height - 110.0;
    let bottom = top + height;
    let max = max_value(series.iter().flat_map(|s| s.values.iter()));

    for step in 0..=5 {
        let value = max * f64::from(step) / 5.0;
        let y = bottom - height * f64::from(step) / 5.0;
        writeln!(
            svg,
            "<line x1=\"{left:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#dddddd\"/>",
            left + width
        )?;
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{:.0}</text>",
            left - 6.0,
            y + 4.0,
            value
        )?;
    }

    if !labels.is_empty() {
        let group = width / labels.len() as f64;
        for (index, label) in labels.iter().enumerate() {
            let group_x = left + group * index as f64;
            for (offset, (entry, color)) in series.iter().zip(PALETTE).enumerate() {
                let value = entry.values.get(index).copied().unwrap_or(0.0);
                let bar_height = height * value / max;
                writeln!(
                    svg,
                    "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{color}\"/>",
                    group_x + group * (0.1 + 0.4 * offset as f64),
                    bottom - bar_height,
                    group * 0.4,
                    bar_height
                )?;
            }
            let label_x = group_x + group / 2.0;
            writeln!(
                svg,
                "<text x=\"{label_x:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" \
transform=\"rotate(-90 {label_x:.1} {:.1})\">{}</text>",
                bottom + 8.0,
                bottom + 8.0,
                escape_html(label)
            )?;
        }
    }

    writeln!(
        svg,
        "<line x1=\"{left:.1}\" y1=\"{bottom:.1}\" x2=\"{:.1}\" y2=\"{bottom:.1}\" stroke=\"#000000\"/>",
        left + width
    )?;

    for (index, (entry, color)) in series.iter().zip(PALETTE).enumerate() {
        let y = top + 8.0 + 18.0 * index as f64;
        writeln!(
            svg,
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{color}\"/>",
            left + 10.0,
            y - 10.0
        )?;
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\">{}</text>",
            left + 28.0,
            escape_html(&entry.label)
        )?;
    }
    Ok(())
}

fn horizontal_bars(
    svg: &mut String,
    panel: Panel,
    caption: &str,
    bars: &[(String, f64)],
) -> fmt::Result {
    title(svg, panel, caption)?;

    let left = panel.x + 170.0;
    let top = panel.y + 50.0;
    let width = panel.width - 200.0;
    let height = panel.height - 80.0;
    let max = max_value(bars.iter().map(|(_, value)| value));

    for step in 0..=5 {
        let x = left + width * f64::from(step) / 5.0;
        writeln!(
            svg,
            "<line x1=\"{x:.1}\" y1=\"{top:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#dddddd\"/>",
            top + height
        )?;
        writeln!(
            svg,
            "<text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{:.0}</text>",
            top + height + 16.0,
            max * f64::from(step) / 5.0
        )?;
    }

    if bars.is_empty() {
        return Ok(());
    }

    let row = height / bars.len() as f64;
    for (index, (label, value)) in bars.iter().enumerate() {
        let y = top + row * index as f64;
        writeln!(
            svg,
            "<rect x=\"{left:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            y + row * 0.2,
            width * value / max,
            row * 0.6,
            PALETTE[0]
        )?;
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>",
            left - 6.0,
            y + row * 0.5 + 4.0,
            escape_html(label)
        )?;
    }
    Ok(())
}

fn pie(svg: &mut String, panel: Panel, caption: &str, slices: &[(String, f64)]) -> fmt::Result {
    title(svg, panel, caption)?;

    let total: f64 = slices
        .iter()
        .map(|(_, share)| share.max(0.0))
        .sum();
    if total <= 0.0 {
        return Ok(());
    }

    let cx = panel.center_x();
    let cy = panel.y + panel.height / 2.0 + 15.0;
    let radius = (panel.width.min(panel.height) / 2.0 - 70.0).max(10.0);

    let mut start = -PI / 2.0;
    for (index, (label, share)) in slices.iter().enumerate() {
        let fraction = share.max(0.0) / total;
        if fraction <= 0.0 {
            continue;
        }
        let color = PALETTE[index % PALETTE.len()];
        let sweep = fraction * 2.0 * PI;
        let end = start + sweep;

        if fraction >= 1.0 - 1e-9 {
            writeln!(
                svg,
                "<circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{radius:.1}\" fill=\"{color}\"/>"
            )?;
        } else {
            let large_arc = u8::from(sweep > PI);
            writeln!(
                svg,
                "<path d=\"M {cx:.1} {cy:.1} L {:.1} {:.1} A {radius:.1} {radius:.1} 0 {large_arc} 1 {:.1} {:.1} Z\" fill=\"{color}\" stroke=\"#ffffff\"/>",
                cx + radius * start.cos(),
                cy + radius * start.sin(),
                cx + radius * end.cos(),
                cy + radius * end.sin()
            )?;
        }

        let middle = start + sweep / 2.0;
        let anchor = if middle.cos() >= 0.0 { "start" } else { "end" };
        writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"{anchor}\">{}</text>",
            cx + radius * 1.12 * middle.cos(),
            cy + radius * 1.12 * middle.sin() + 3.0,
            escape_html(label)
        )?;
        start = end;
    }
    Ok(())
}
