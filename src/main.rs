//! Ring Toss Host Simulator
//!
//! Runs the controller loop on a desktop: stdin lines stand in for the
//! sensor line and the control surface, snapshots print as JSON on stdout.
//! Logs go to stderr.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ring_toss::{
    control::command::CommandParseError,
    core::{clock::elapsed, hash::revision_tag},
    game::events::GameEvent,
    parse_line, replay_trace, tick, Clock, Console, Level, Request, RigConfig, SensorTrace,
    Snapshot, Tick, TICK_RATE_HZ, VERSION,
};

#[derive(Parser)]
#[command(name = "ring-toss", version, about = "Ring toss elimination controller simulator")]
struct Args {
    /// Rig configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "ring_toss=trace" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Loop period in milliseconds
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    tick_ms: u32,

    /// Write a sensor trace to this file on exit
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,

    /// Replay a recorded trace headless and print the final snapshot
    #[arg(long)]
    replay: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref())?;

    info!("Ring Toss Controller v{}", VERSION);

    let config = match &args.config {
        Some(path) => RigConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RigConfig::default(),
    };
    debug!("Config: {:?}", config);

    match &args.replay {
        Some(path) => replay(path, &config),
        None => run(&args, &config).await,
    }
}

fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log filter {:?}", directive))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Headless replay of a recorded trace.
fn replay(path: &Path, config: &RigConfig) -> Result<()> {
    let trace = SensorTrace::load(path)
        .with_context(|| format!("Failed to load trace {}", path.display()))?;
    info!(
        "Replaying {} ({} pin changes, {} commands, ticks {}..={})",
        path.display(),
        trace.deltas().len(),
        trace.commands().len(),
        trace.start_tick,
        trace.end_tick
    );
    info!("Trace fingerprint: {}", hex::encode(trace.fingerprint()));

    let (console, events) = replay_trace(&trace, config);
    log_events(&events);
    info!("Replay produced {} events", events.len());

    print_snapshot(&console, trace.end_tick)
}

/// Interactive loop: one tick per period, at most one request per tick.
async fn run(args: &Args, config: &RigConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<Request>(64);
    tokio::spawn(read_stdin(tx));

    let active_low = config.sensor.active_low;
    let mut pin_high = Level::Released.pin_for(active_low);
    let mut clock = Clock::default();
    let mut console = Console::new(config, clock.now(), pin_high);
    let mut trace = args
        .record
        .as_ref()
        .map(|_| SensorTrace::new(pin_high, clock.now(), args.tick_ms));
    let mut pause: Option<(Tick, u32)> = None;

    let mut interval = tokio::time::interval(Duration::from_millis(u64::from(args.tick_ms)));
    info!(
        "Loop running every {} ms (timings assume {} Hz); type `start 2` to begin",
        args.tick_ms, TICK_RATE_HZ
    );

    loop {
        interval.tick().await;
        let now = clock.now();

        if let Some(trace) = trace.as_mut() {
            trace.record_pin(now, pin_high);
        }

        let result = tick(&mut console, now, pin_high, config);
        log_events(&result.events);
        if let Some(winner) = result.winner {
            info!(
                "Match over: {} wins. Send `reset` or `start` for another",
                console.game.name_of(winner)
            );
        }

        if let Some((since, ms)) = pause {
            if elapsed(since, now) < ms {
                clock.advance(args.tick_ms);
                continue;
            }
            pause = None;
        }

        let request = match rx.try_recv() {
            Ok(request) => request,
            Err(TryRecvError::Empty) => {
                clock.advance(args.tick_ms);
                continue;
            }
            Err(TryRecvError::Disconnected) => {
                info!("Input closed");
                break;
            }
        };

        match request {
            Request::Pin { pressed } => {
                let level = if pressed { Level::Pressed } else { Level::Released };
                pin_high = level.pin_for(active_low);
                debug!("Pin {:?} at tick {}", level, now);
            }
            Request::Control(command) => {
                info!("Applying {}", command.name());
                if let Some(trace) = trace.as_mut() {
                    trace.record_command(now, command.clone());
                }
                let events = console.apply(&command, now, config);
                log_events(&events);
            }
            Request::Wait { ms } => pause = Some((now, ms)),
            Request::Snapshot => print_snapshot(&console, now)?,
            Request::Quit => break,
        }

        clock.advance(args.tick_ms);
    }

    if let (Some(path), Some(trace)) = (&args.record, &trace) {
        trace
            .save(path)
            .with_context(|| format!("Failed to write trace {}", path.display()))?;
        info!(
            "Trace written to {} ({} pin changes, fingerprint {})",
            path.display(),
            trace.deltas().len(),
            revision_tag(&trace.fingerprint())
        );
    }

    print_snapshot(&console, clock.now())
}

/// Forward parsed stdin lines to the loop.
async fn read_stdin(tx: mpsc::Sender<Request>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                Ok(request) => {
                    if tx.send(request).await.is_err() {
                        break;
                    }
                }
                Err(CommandParseError::Empty) => {}
                Err(e) => warn!("Ignoring input: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        if event.is_terminal() {
            info!(seat = ?event.player(), "[{}] {:?}", event.tick, event.data);
        } else {
            debug!(seat = ?event.player(), "[{}] {:?}", event.tick, event.data);
        }
    }
}

fn print_snapshot(console: &Console, now: Tick) -> Result<()> {
    let snapshot = Snapshot::capture(&console.game, now);
    println!("{}", snapshot.to_json_pretty()?);
    Ok(())
}
