use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tickerboard_market::series::DEFAULT_RANGE_DAYS;
use tickerboard_market::DateRange;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, value_enum, default_value_t = TraceLevel::Info, global = true)]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the symbols and print the summary table.
    Table {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Fetch the symbols and draw the dual-axis price/volume chart.
    Chart {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Where to write the SVG.
        #[arg(long, short, default_value = "chart.svg")]
        out: PathBuf,

        /// Print the chart data and options as JSON instead of drawing.
        #[arg(long)]
        json: bool,

        /// Use the dark theme.
        #[arg(long)]
        dark: bool,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 720)]
        height: u32,
    },

    /// Interactive dashboard: add and remove symbols, change the range,
    /// toggle the theme, export the chart.
    Session {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct RangeArgs {
    /// First day to include (YYYY-MM-DD); defaults to 30 days before `--end`.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl RangeArgs {
    pub fn resolve(&self) -> DateRange {
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        match self.start {
            Some(start) => DateRange::new(start, end),
            None => DateRange::ending(end, DEFAULT_RANGE_DAYS),
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
