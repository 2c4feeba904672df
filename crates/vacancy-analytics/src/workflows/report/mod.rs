//! Renders vacancy statistics as sheets, an HTML document and an SVG chart.

mod chart;
mod document;
pub mod tables;

pub use chart::render_svg;
pub use document::render_html;
pub use tables::{cities_sheet, format_percent, transpose, with_other_bucket, years_sheet, Sheet};

use crate::workflows::stats::VacancyStatistics;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DOCUMENT_FILE: &str = "report.html";
pub const CHART_FILE: &str = "graph.svg";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Files produced by [`write_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub document: PathBuf,
    pub chart: PathBuf,
}

/// Writes the HTML document and the chart it references into `output_dir`.
pub fn write_document(
    stats: &VacancyStatistics,
    output_dir: &Path,
) -> Result<DocumentPaths, ReportError> {
    fs::create_dir_all(output_dir)?;

    let chart = output_dir.join(CHART_FILE);
    fs::write(&chart, render_svg(stats)?)?;

    let document = output_dir.join(DOCUMENT_FILE);
    let html = render_html(
        &stats.profession,
        &years_sheet(stats),
        &cities_sheet(stats),
        CHART_FILE,
    )?;
    fs::write(&document, html)?;

    info!(
        document = %document.display(),
        chart = %chart.display(),
        "vacancy document written"
    );
    Ok(DocumentPaths { document, chart })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_document_and_chart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stats = VacancyStatistics {
            profession: "Аналитик".to_string(),
            ..VacancyStatistics::default()
        };

        let paths = write_document(&stats, &dir.path().join("out")).expect("write");
        let html = fs::read_to_string(&paths.document).expect("html");
        assert!(html.contains(CHART_FILE));
        assert!(paths.chart.exists());
    }
}
