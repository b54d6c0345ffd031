use arcstep::control::{ControlCommand, SOCKET_PATH};
use arcstep::days::{LeaveDays, MAX_TOTAL_DAYS};
use arcstep::gauge::{Gauge, GaugeInputs};
use arcstep::reveal::{ManualClock, RevealAction, RevealTiming};
use arcstep::svg;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "arcstep", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the gauge as SVG, as it looks some time after its inputs were set
    Render {
        #[arg(short, long)]
        total: u32,
        #[arg(short, long)]
        left: u32,
        /// Days driving the reveal animation (defaults to --left)
        #[arg(short, long)]
        completed: Option<u32>,
        /// Milliseconds since the inputs changed (defaults to the settled state)
        #[arg(long)]
        at: Option<u64>,
    },
    /// Print when each reveal action fires
    Timeline {
        #[arg(short, long)]
        total: u32,
        #[arg(short, long)]
        completed: u32,
    },
    /// Set days left on the running widget
    Left { days: u32 },
    /// Set total days on the running widget
    Total { days: u32 },
    /// Replay the reveal animation on the running widget
    Replay,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            total,
            left,
            completed,
            at,
        } => render(total, left, completed, at),
        Commands::Timeline { total, completed } => {
            timeline(total, completed);
            Ok(())
        }
        Commands::Left { days } => send_command(ControlCommand::SetDaysLeft(days)),
        Commands::Total { days } => send_command(ControlCommand::SetTotalDays(days)),
        Commands::Replay => send_command(ControlCommand::Replay),
    }
}

fn render(total: u32, left: u32, completed: Option<u32>, at: Option<u64>) -> anyhow::Result<()> {
    if !(1..=MAX_TOTAL_DAYS).contains(&total) {
        anyhow::bail!("--total must be between 1 and {}", MAX_TOTAL_DAYS);
    }
    let days = LeaveDays::new(total, left);
    let completed = completed.unwrap_or(days.left()).min(days.total());
    let inputs = GaugeInputs::new(
        days.total() as usize,
        days.left() as usize,
        completed as usize,
    );

    let timing = RevealTiming::default();
    let mut clock = ManualClock::new();
    let mut gauge = Gauge::new(timing);
    gauge.set_inputs(&mut clock, inputs);

    let settled = timing.reveal_delay(inputs.total_steps);
    let until = at.map_or(settled, Duration::from_millis);
    for ticket in clock.advance_to(until) {
        gauge.fire(ticket);
    }

    let mut stdout = std::io::stdout().lock();
    let document = svg::render(&gauge.scene())?;
    stdout.write_all(document.as_bytes())?;
    Ok(())
}

fn timeline(total: u32, completed: u32) {
    let days = LeaveDays::new(total, completed);
    let plan = RevealTiming::default().plan(days.left() as usize, days.total() as usize);

    for (delay, action) in plan {
        match action {
            RevealAction::SetProgress(p) => println!("{:>6}ms  arc fills to {:.1}%", delay.as_millis(), p),
            RevealAction::RevealStep(i) => println!("{:>6}ms  step {} flips", delay.as_millis(), i + 1),
        }
    }
}

fn send_command(cmd: ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to sickleave at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    log::debug!("Sent '{}'", cmd);
    Ok(())
}
