use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use controller::{AddOutcome, Controller};
use dotenv::dotenv;
use state::AppState;
use tickerboard_chart::Theme;
use tickerboard_market::{AlphaVantage, ApiConfig, DateRange};
use tracing::{debug, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod controller;
mod export;
mod session;
mod state;
#[cfg(test)]
mod stub;
mod ui;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

fn build_controller(range: DateRange, theme: Theme) -> Result<Controller<AlphaVantage>> {
    let config = ApiConfig::from_env()?;
    debug!("Endpoint settings: {config:?}");
    let max_in_flight = config.max_in_flight;
    let source = AlphaVantage::new(config)?;
    Ok(Controller::new(source, AppState::new(range, theme), max_in_flight))
}

/// Fetch every symbol behind a progress bar.
async fn track_all(controller: &mut Controller<AlphaVantage>, symbols: &[String]) -> Result<()> {
    let pb = ui::single_pb(symbols.len() as u64)?;
    let mut failed = 0;
    controller
        .add_many(symbols, |outcome| {
            if matches!(outcome, AddOutcome::Failed { .. }) {
                failed += 1;
            }
            pb.set_message(ui::outcome_message(outcome));
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    if failed > 0 {
        info!("{failed} of {} symbols failed to fetch", symbols.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::Trace => Level::TRACE,
        TraceLevel::Debug => Level::DEBUG,
        TraceLevel::Info => Level::INFO,
        TraceLevel::Warn => Level::WARN,
        TraceLevel::Error => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    // cli framework:
    // "> tickerboard <COMMAND>"
    match &cli.command {
        // "> tickerboard table AAPL MSFT [--start DATE] [--end DATE]"
        // fetch, then print the summary table
        Table { symbols, range } => {
            let mut controller = build_controller(range.resolve(), Theme::default())?;
            track_all(&mut controller, symbols).await?;
            ui::print_table(controller.state());
        }

        // "> tickerboard chart AAPL MSFT [--out FILE] [--json] [--dark]"
        // fetch, then draw the chart (or dump it as JSON)
        Chart {
            symbols,
            range,
            out,
            json,
            dark,
            width,
            height,
        } => {
            let theme = if *dark { Theme::Dark } else { Theme::Light };
            let mut controller = build_controller(range.resolve(), theme)?;
            track_all(&mut controller, symbols).await?;

            if *json {
                println!("{}", export::chart_json(controller.state())?);
            } else {
                export::write_svg(controller.state(), out, (*width, *height))?;
                ui::print_table(controller.state());
                println!("chart written to {}", out.display());
            }
        }

        // "> tickerboard session [--start DATE] [--end DATE]"
        // interactive dashboard over stdin
        Session { range } => {
            let mut controller = build_controller(range.resolve(), Theme::default())?;
            session::run(&mut controller).await?;
        }
    }

    Ok(())
}
