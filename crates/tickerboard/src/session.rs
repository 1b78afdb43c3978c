use crate::controller::{AddRequest, Controller, PendingFetch};
use crate::export;
use crate::ui;
use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use tickerboard_chart::render::DEFAULT_SIZE;
use tickerboard_market::{DailySource, DateRange};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

const HELP: &str = "\
commands:
  add SYM [SYM ...]     fetch and track symbols over the current range
  remove SYM            stop tracking a symbol (alias: rm)
  range START END       set the range (YYYY-MM-DD) for symbols added next
  theme                 toggle light/dark
  table                 print the summary table (alias: show)
  chart FILE            draw the chart to an SVG file
  export FILE           write chart data and options as JSON
  help                  this text
  quit                  leave (alias: exit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<String>),
    Remove(String),
    Range(DateRange),
    Theme,
    Table,
    Chart(PathBuf),
    Export(PathBuf),
    Help,
    Quit,
}

fn date_arg(word: Option<&str>, which: &str) -> Result<NaiveDate, String> {
    let word = word.ok_or_else(|| format!("missing {which} date"))?;
    NaiveDate::parse_from_str(word, "%Y-%m-%d")
        .map_err(|e| format!("bad {which} date {word:?}: {e}"))
}

fn path_arg(word: Option<&str>, command: &str) -> Result<PathBuf, String> {
    word.map(PathBuf::from)
        .ok_or_else(|| format!("usage: {command} FILE"))
}

/// Parse one line of session input. Blank lines parse to `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "add" => {
            let symbols: Vec<String> = words.map(str::to_string).collect();
            if symbols.is_empty() {
                return Err("usage: add SYM [SYM ...]".to_string());
            }
            Command::Add(symbols)
        }
        "remove" | "rm" => match words.next() {
            Some(symbol) => Command::Remove(symbol.to_string()),
            None => return Err("usage: remove SYM".to_string()),
        },
        "range" => {
            let start = date_arg(words.next(), "start")?;
            let end = date_arg(words.next(), "end")?;
            Command::Range(DateRange::new(start, end))
        }
        "theme" => Command::Theme,
        "table" | "show" => Command::Table,
        "chart" => Command::Chart(path_arg(words.next(), "chart")?),
        "export" => Command::Export(path_arg(words.next(), "export")?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; try `help`")),
    };
    Ok(Some(command))
}

fn prompt() {
    print!("{} ", ">".cyan().bold());
    let _ = std::io::stdout().flush();
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<S: DailySource + 'static>(controller: &mut Controller<S>) -> Result<()> {
    println!("{HELP}");
    ui::print_table(controller.state());
    drive(controller, BufReader::new(tokio::io::stdin()).lines()).await
}

/// The session loop over any line source.
///
/// Fetches started by `add` are kept in flight here while further lines are
/// read and handled, and each one is folded into the state as it lands.
/// At end of input the loop waits for what is still in flight; `quit`
/// drops it.
pub async fn drive<S, R>(controller: &mut Controller<S>, mut lines: Lines<R>) -> Result<()>
where
    S: DailySource + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut in_flight: FuturesUnordered<PendingFetch> = FuturesUnordered::new();
    let mut reading = true;
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                let Some(line) = line? else {
                    reading = false;
                    continue;
                };
                if handle(controller, &line, &mut in_flight).await == Flow::Quit {
                    break;
                }
                prompt();
            }

            Some((symbol, result)) = in_flight.next(), if !in_flight.is_empty() => {
                let outcome = controller.finish_add(symbol, result);
                println!();
                ui::print_outcome(&outcome);
                ui::print_table(controller.state());
                prompt();
            }

            else => break,
        }
    }

    if !in_flight.is_empty() {
        debug!("Leaving session with {} fetches in flight", in_flight.len());
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn handle<S: DailySource + 'static>(
    controller: &mut Controller<S>,
    line: &str,
    in_flight: &mut FuturesUnordered<PendingFetch>,
) -> Flow {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(message) => {
            println!("{}", message.yellow());
            return Flow::Continue;
        }
    };
    debug!("Session command: {command:?}");

    match command {
        Command::Add(symbols) => {
            for input in &symbols {
                match controller.begin_add(input) {
                    AddRequest::Fetch { symbol, fetch } => {
                        println!("fetching {symbol} ...");
                        in_flight.push(fetch);
                    }
                    AddRequest::Settled(outcome) => ui::print_outcome(&outcome),
                }
            }
        }
        Command::Remove(symbol) => {
            if !controller.remove(&symbol) {
                println!("{}", format!("{symbol} is not tracked").yellow());
            }
            ui::print_table(controller.state());
        }
        Command::Range(range) => {
            controller.set_range(range);
            println!("range set to {range}; applies to symbols added from now on");
        }
        Command::Theme => {
            let theme = controller.toggle_theme();
            println!("switched to {theme}");
        }
        Command::Table => {
            ui::print_table(controller.state());
            if controller.in_flight() > 0 {
                println!("{} still fetching", controller.in_flight());
            }
        }
        Command::Chart(path) => match export::write_svg(controller.state(), &path, DEFAULT_SIZE) {
            Ok(()) => println!("chart written to {}", path.display()),
            Err(e) => warn!("Chart not written: {e}"),
        },
        Command::Export(path) => match export::write_json(controller.state(), &path).await {
            Ok(()) => println!("chart data written to {}", path.display()),
            Err(e) => warn!("Export failed: {e}"),
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}
