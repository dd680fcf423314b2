use std::path::PathBuf;

use clap::Parser;
use fern::colors::Color;
use gptp_sim::{
    config::Config,
    simulation::{SimSink, Simulation},
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file describing the link and its two nodes
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// Simulated seconds, overriding the configuration
    #[clap(long, short = 's')]
    seconds: Option<u64>,

    #[clap(long, short = 'l', default_value = "info")]
    log_level: log::LevelFilter,
}

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    let colors = fern::colors::ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::BrightGreen)
        .debug(Color::BrightBlue)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(error) = setup_logger(args.log_level) {
        eprintln!("Could not set up logging: {}", error);
        std::process::exit(1);
    }

    let mut config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(error) => {
                log::error!("Could not load {}: {}", path.display(), error);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(seconds) = args.seconds {
        config.duration = seconds;
    }

    let sinks: Vec<SimSink> = config.nodes.iter().map(|_| SimSink::default()).collect();
    let mut simulation = Simulation::new(&config, &sinks);

    for second in 1..=config.duration {
        simulation.run_until(second * 1_000_000_000);
        for (index, report) in simulation.report().iter().enumerate() {
            log::info!("t={}s node {}: {}", second, index, report);
        }
    }

    for (index, (report, sink)) in simulation.report().iter().zip(&sinks).enumerate() {
        println!(
            "node {}: {} discontinuities={:?}",
            index,
            report,
            sink.notifications()
        );
    }
}
