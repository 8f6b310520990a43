//! Live countdown in the terminal.
//!
//! Keys (followed by Enter): `p` pause/resume, `s` skip, `r` reset,
//! `?` status, `q` quit. Ctrl-C also quits. With `--json` every event is printed as
//! one JSON line instead.

use std::io::Write;
use std::sync::Arc;

use clap::Args;
use rounds_core::format::{format_clock, format_total};
use rounds_core::{
    Config, CuePlayer, Database, Event, Preset, PresetLibrary, SilentPlayer, TerminalBell,
    TimerEngine, TimerRunner,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

#[derive(Args)]
pub struct RunArgs {
    /// Preset id to run (defaults to the active preset)
    #[arg(long)]
    preset: Option<i64>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Disable sound cues
    #[arg(long)]
    quiet: bool,
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let lib = PresetLibrary::open(Database::open()?)?;
    let preset = match args.preset {
        Some(id) => lib
            .get(id)
            .cloned()
            .ok_or_else(|| format!("preset {id} not found"))?,
        None => lib.active().clone(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(countdown(preset, &args, config));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn countdown(
    preset: Preset,
    args: &RunArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let player: Arc<dyn CuePlayer> = if args.quiet || !config.sound.enabled {
        Arc::new(SilentPlayer)
    } else {
        Arc::new(TerminalBell::new(config.sound.terminal_bell))
    };
    let mut runner = TimerRunner::new(TimerEngine::new(preset.timings()), player)
        .with_tick_interval(config.tick_interval());
    let mut events = runner.subscribe();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut finished = false;

    tracing::info!(preset = %preset.name, id = preset.id, "countdown started");
    if !args.json {
        println!(
            "{}: {} x {} / rest {} / prep {}  (total {})",
            preset.name,
            preset.rounds,
            format_clock(preset.round_length_secs),
            format_clock(preset.rest_secs),
            format_clock(preset.prep_secs),
            format_total(preset.total_secs()),
        );
        println!("p = pause/resume, s = skip, r = reset, ? = status, q = quit");
    }

    runner.start();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    render(&event, preset.rounds, args.json)?;
                    if event.is_finished() {
                        finished = true;
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "display fell behind the timer");
                }
                Err(RecvError::Closed) => break,
            },
            line = stdin.next_line(), if stdin_open => match line? {
                Some(input) => match input.trim() {
                    "p" => {
                        runner.toggle();
                    }
                    "s" => {
                        runner.skip();
                    }
                    "r" => {
                        runner.reset();
                    }
                    "?" => render(&runner.snapshot(), preset.rounds, args.json)?,
                    "q" => break,
                    "" => {}
                    other => eprintln!("unknown command '{other}' (p, s, r, ?, q)"),
                },
                None => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    runner.stop();
    if !finished {
        tracing::info!("countdown abandoned");
        if !args.json {
            println!();
            println!("Stopped.");
        }
    }
    Ok(())
}

fn render(event: &Event, rounds: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    match event {
        Event::TimerStarted {
            phase,
            round,
            remaining_secs,
            ..
        }
        | Event::Ticked {
            phase,
            round,
            remaining_secs,
            ..
        } => {
            write!(
                out,
                "\r  {:<8} round {round}/{rounds}  {}   ",
                phase.label(),
                format_clock(*remaining_secs)
            )?;
        }
        Event::PhaseStarted { phase, round, .. } => {
            writeln!(out)?;
            writeln!(out, "{} (round {round}/{rounds})", phase.label())?;
        }
        Event::TimerPaused { remaining_secs, .. } => {
            writeln!(out)?;
            writeln!(out, "Paused at {} (p to resume)", format_clock(*remaining_secs))?;
        }
        Event::TimerResumed { .. } => writeln!(out, "Resumed")?,
        Event::TimerSkipped { from, to, .. } => {
            writeln!(out)?;
            writeln!(out, "Skipped {from} -> {to}")?;
        }
        Event::TimerReset { .. } => {
            writeln!(out)?;
            writeln!(out, "Reset (p to start)")?;
        }
        Event::TimerFinished {
            rounds, total_secs, ..
        } => {
            writeln!(out)?;
            writeln!(out, "Finished! {rounds} rounds in {}", format_total(*total_secs))?;
        }
        Event::StateSnapshot {
            state,
            phase,
            round,
            remaining_secs,
            elapsed_secs,
            total_secs,
            progress_pct,
            ..
        } => {
            writeln!(out)?;
            writeln!(
                out,
                "{state:?}: {} round {round}/{rounds}, {} left in phase, {} of {} done ({progress_pct:.0}%)",
                phase.label(),
                format_clock(*remaining_secs),
                format_total(*elapsed_secs),
                format_total(*total_secs),
            )?;
        }
        Event::CueTriggered { .. } => {}
    }
    out.flush()?;
    Ok(())
}
