use std::path::PathBuf;

use clap::Parser;

use crate::chart::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::select::DEFAULT_MIN_NUMERIC_RATIO;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser, Debug)]
#[command(
    name = "wikichart",
    version,
    about = "Plot the first numeric column of a Wikipedia table as a line chart"
)]
pub struct Cli {
    /// Wikipedia page URL. Prompts on stdin when omitted.
    pub url: Option<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Chart title. Defaults to "<column> - Wikipedia Data".
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MIN_NUMERIC_RATIO)]
    pub min_numeric_ratio: f64,

    /// Print the run report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
