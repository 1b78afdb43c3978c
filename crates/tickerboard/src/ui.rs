use crate::controller::AddOutcome;
use crate::state::AppState;
use anyhow::Result;
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use tickerboard_chart::SummaryRow;

pub fn single_pb(length: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [ {bar:50} ] {pos}/{len} {msg} {spinner}")?
            .progress_chars("#|-"),
    );
    Ok(pb)
}

const HEADERS: [&str; 5] = ["Symbol", "Latest Price", "Change", "Change %", "Volume"];
const WIDTHS: [usize; 5] = [8, 14, 10, 10, 16];

fn cell(text: &str, i: usize) -> String {
    if i == 0 {
        format!("{text:<width$}", width = WIDTHS[i])
    } else {
        format!("{text:>width$}", width = WIDTHS[i])
    }
}

// pad before colouring; escape codes would throw the widths off
fn tint(text: String, gain: Option<bool>) -> ColoredString {
    match gain {
        Some(true) => text.green(),
        Some(false) => text.red(),
        None => text.normal(),
    }
}

fn row_line(row: &SummaryRow) -> String {
    let gain = row.is_gain();
    [
        cell(&row.symbol, 0).bold(),
        cell(&row.price_text(), 1).normal(),
        tint(cell(&row.change_text(), 2), gain),
        tint(cell(&row.change_percent_text(), 3), gain),
        cell(&row.volume_text(), 4).normal(),
    ]
    .iter()
    .map(|c| c.to_string())
    .collect::<Vec<_>>()
    .join(" ")
}

/// The summary table as printable lines: header, one line per tracked
/// symbol, then one line per symbol whose fetch failed.
pub fn table_lines(state: &AppState) -> Vec<String> {
    let header = HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| cell(h, i))
        .collect::<Vec<_>>()
        .join(" ");
    let rule = "-".repeat(header.len());

    let mut lines = vec![header.bold().to_string(), rule];
    lines.extend(state.rows().iter().map(row_line));
    lines.extend(state.failures.iter().map(|f| {
        format!("{} {}", cell(&f.symbol, 0).bold(), format!("error: {}", f.reason).red())
    }));

    if state.tracked.is_empty() && state.failures.is_empty() {
        lines.push("(no symbols tracked)".dimmed().to_string());
    }
    lines
}

pub fn print_table(state: &AppState) {
    println!();
    println!(
        "{} {}  {}",
        "Range:".bold(),
        state.range,
        state.theme.to_string().dimmed()
    );
    for line in table_lines(state) {
        println!("{line}");
    }
    println!();
}

pub fn outcome_message(outcome: &AddOutcome) -> String {
    match outcome {
        AddOutcome::Added { symbol, records } => {
            format!("{symbol}: {records} days")
        }
        AddOutcome::Duplicate(symbol) => format!("{symbol}: already tracked"),
        AddOutcome::Empty => "empty symbol ignored".to_string(),
        AddOutcome::Failed { symbol, reason } => format!("{symbol}: {reason}"),
    }
}

pub fn print_outcome(outcome: &AddOutcome) {
    let message = outcome_message(outcome);
    match outcome {
        AddOutcome::Added { .. } => println!("{} {message}", "+".green()),
        AddOutcome::Failed { .. } => println!("{} {message}", "x".red()),
        _ => println!("{} {message}", "~".yellow()),
    }
}
