use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use slide_sequencer::config::Configuration;
use slide_sequencer::events::{AddressedCommand, CarouselCommand, SlideShown};
use slide_sequencer::tasks::autoplay;
use slide_sequencer::{SequencerError, simulate};

#[derive(Debug, Parser)]
#[command(
    name = "slide-sequencer",
    version,
    about = "Timer-driven carousel sequencer"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Print each carousel's positions over N simulated intervals and exit
    #[arg(long = "dry-run", value_name = "TICKS")]
    dry_run: Option<usize>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive(format!("slide_sequencer={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        dry_run,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    if let Some(ticks) = dry_run {
        run_dry_run(&cfg, ticks);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let (shown_tx, mut shown_rx) = mpsc::channel::<SlideShown>(64); // Carousels -> stdout
    let mut routes: HashMap<String, mpsc::Sender<CarouselCommand>> = HashMap::new();
    let mut tasks = JoinSet::new();

    for options in cfg.carousels.iter().cloned() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<CarouselCommand>(16); // Stdin -> Carousel
        routes.insert(options.name.clone(), cmd_tx);
        let shown_tx = shown_tx.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let name = options.name.clone();
            autoplay::run(options, cmd_rx, shown_tx, cancel)
                .await
                .with_context(|| format!("carousel task '{name}' failed"))
        });
    }
    drop(shown_tx);

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    // Stdin commands until EOF; a plain thread so shutdown never waits on a blocked read
    {
        let cancel = cancel.clone();
        std::thread::spawn(move || {
            read_commands(io::stdin().lock(), &routes);
            tracing::info!("stdin closed; initiating shutdown");
            cancel.cancel();
        });
    }

    let printer = tokio::spawn(async move {
        while let Some(SlideShown {
            carousel, index, ..
        }) = shown_rx.recv().await
        {
            println!("{carousel} {index}");
        }
    });

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }
    if let Err(e) = printer.await {
        tracing::error!("printer join error: {e}");
    }

    Ok(())
}

fn read_commands(input: impl BufRead, routes: &HashMap<String, mpsc::Sender<CarouselCommand>>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("stdin watcher failed: {err}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let routed = line
            .parse::<AddressedCommand>()
            .and_then(|AddressedCommand { carousel, command }| {
                let tx = routes
                    .get(&carousel)
                    .ok_or(SequencerError::UnknownCarousel(carousel))?;
                Ok((tx, command))
            });
        match routed {
            Ok((tx, command)) => {
                if tx.blocking_send(command).is_err() {
                    tracing::warn!("carousel no longer accepting commands");
                }
            }
            Err(err) => tracing::warn!("{err}"),
        }
    }
}

fn run_dry_run(cfg: &Configuration, ticks: usize) {
    println!("# carousel dry run\n# ticks: {ticks}\n");
    for options in &cfg.carousels {
        let positions = simulate(options, ticks);
        let rendered: Vec<String> = positions.iter().map(ToString::to_string).collect();
        println!(
            "{} ({} slides, every {}, auto-play {}): {}",
            options.name,
            options.slide_count,
            humantime::format_duration(options.interval),
            if options.auto_play { "on" } else { "off" },
            rendered.join(" -> ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn route(
        routes: &mut HashMap<String, mpsc::Sender<CarouselCommand>>,
        name: &str,
    ) -> mpsc::Receiver<CarouselCommand> {
        let (tx, rx) = mpsc::channel(8);
        routes.insert(name.to_string(), tx);
        rx
    }

    fn drain(rx: &mut mpsc::Receiver<CarouselCommand>) -> Vec<CarouselCommand> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn routes_valid_lines_and_skips_the_rest() {
        let mut routes = HashMap::new();
        let mut deck = route(&mut routes, "deck");
        let mut hero = route(&mut routes, "hero");

        let input = "deck next\n\nghost next\ndeck fly\nhero jump 2\ndeck jump\ndeck toggle\n";
        read_commands(Cursor::new(input), &routes);

        assert_eq!(
            drain(&mut deck),
            vec![CarouselCommand::Next, CarouselCommand::TogglePlay]
        );
        assert_eq!(drain(&mut hero), vec![CarouselCommand::JumpTo(2)]);
    }

    #[test]
    fn closed_carousel_does_not_stop_routing() {
        let mut routes = HashMap::new();
        drop(route(&mut routes, "gone"));
        let mut deck = route(&mut routes, "deck");

        read_commands(Cursor::new("gone next\ndeck prev\n"), &routes);

        assert_eq!(drain(&mut deck), vec![CarouselCommand::Prev]);
    }
}
