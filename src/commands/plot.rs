use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::chart::{self, ChartConfig};
use crate::classify::ValueClassifier;
use crate::cli::DEFAULT_OUTPUT_DIR;
use crate::extract::TableExtractor;
use crate::fetch::PageFetcher;
use crate::model::{NumericColumn, PlotReport};
use crate::naming::derive_filename;
use crate::select::{ColumnSelector, DEFAULT_MIN_NUMERIC_RATIO, TracingObserver};
use crate::util::{now_utc_string, sha256_hex, write_bytes};

pub const X_AXIS_LABEL: &str = "Record Number";

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub min_numeric_ratio: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            width: chart::DEFAULT_WIDTH,
            height: chart::DEFAULT_HEIGHT,
            title: None,
            min_numeric_ratio: DEFAULT_MIN_NUMERIC_RATIO,
        }
    }
}

pub fn run(url: &str, options: &PlotOptions) -> Result<PlotReport> {
    let html = PageFetcher::new()?.fetch(url)?;
    plot_page(url, &html, options)
}

pub fn plot_page(url: &str, html: &str, options: &PlotOptions) -> Result<PlotReport> {
    let tables = TableExtractor::new()?.extract_tables(html);

    let selector =
        ColumnSelector::new(ValueClassifier::new()?).with_min_ratio(options.min_numeric_ratio);
    info!(
        tables = tables.len(),
        min_ratio = selector.min_ratio(),
        "selecting numeric column"
    );
    let selection = selector.select_from_tables(&tables, &mut TracingObserver)?;

    let config = chart_config(&selection.column, options);
    let png = chart::render_line_chart(&selection.column, &config)
        .with_context(|| format!("failed to render chart for {}", selection.column.column_name))?;

    let output_path = options.output_dir.join(derive_filename(url));
    write_bytes(&output_path, &png)?;
    info!(
        path = %output_path.display(),
        bytes = png.len(),
        "wrote chart"
    );

    Ok(PlotReport {
        url: url.trim().to_string(),
        generated_at: now_utc_string(),
        page_sha256: sha256_hex(html.as_bytes()),
        table_count: tables.len(),
        table_index: selection.table_index,
        column: selection.column,
        output_path: output_path.display().to_string(),
        width: config.width,
        height: config.height,
    })
}

fn chart_config(column: &NumericColumn, options: &PlotOptions) -> ChartConfig {
    ChartConfig {
        width: options.width,
        height: options.height,
        title: options
            .title
            .clone()
            .unwrap_or_else(|| format!("{} - Wikipedia Data", column.column_name)),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: column.column_name.clone(),
    }
}
