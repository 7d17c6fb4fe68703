//! Instant virtual-clock run, for checking a configuration or inspecting
//! the event trace without waiting the full minute.

use clap::Args;
use reveal_core::config::RevealConfig;
use reveal_core::simulation::{simulate, SimulationOptions};
use reveal_core::Winner;

#[derive(Args)]
pub struct SimulateArgs {
    /// Override the configured winner ("menina"/"girl" or "menino"/"boy")
    #[arg(long)]
    winner: Option<String>,
    /// Virtual tick quantum in milliseconds
    #[arg(long, default_value = "50")]
    tick_ms: u64,
    /// Simulate a mobile session (unlock probes, haptics)
    #[arg(long)]
    mobile: bool,
    /// Script this many autoplay rejections on the celebration track
    #[arg(long, default_value = "0")]
    reject_celebration: u32,
    /// Press the manual-play control as soon as it appears
    #[arg(long)]
    press_fallback: bool,
    /// Print every event instead of just the summary
    #[arg(long)]
    trace: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RevealConfig::load()?;
    if let Some(w) = &args.winner {
        config.winner = match w.to_ascii_lowercase().as_str() {
            "menina" | "girl" => Winner::Girl,
            "menino" | "boy" => Winner::Boy,
            other => return Err(format!("unknown winner: {other}").into()),
        };
    }
    config.validate()?;

    let run = simulate(
        config,
        SimulationOptions {
            tick_ms: args.tick_ms,
            mobile: args.mobile,
            reject_celebration: args.reject_celebration,
            press_fallback: args.press_fallback,
            ..SimulationOptions::default()
        },
    );

    if args.trace {
        for event in &run.events {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    let summary = serde_json::json!({
        "final_phase": run.final_phase.to_string(),
        "duration_ms": run.duration_ms,
        "events": run.events.len(),
        "haptic_pulses": run.haptic_pulses.len(),
        "celebration_playing": run.celebration_playing,
        "fallback_shown": run.fallback_shown,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
