//! Real-time headless run: the experience plays out on the wall clock with
//! the null media backend, streaming every event to stdout as JSON lines.

use std::time::{Duration, Instant};

use clap::Args;
use reveal_core::audio::{AlwaysUnlocked, AudioUnlockStrategy, MobileUnlock, NullBackend};
use reveal_core::config::RevealConfig;
use reveal_core::haptics::NullHaptics;
use reveal_core::share::ClipboardOnlyTarget;
use reveal_core::{Experience, ExperienceDeps, Winner};

#[derive(Args)]
pub struct RunArgs {
    /// Override the configured winner ("menina"/"girl" or "menino"/"boy")
    #[arg(long)]
    winner: Option<String>,
    /// Tick interval in milliseconds
    #[arg(long, default_value = "50")]
    tick_ms: u64,
    /// Run as a mobile session (gesture-gated unlock, mobile volumes)
    #[arg(long)]
    mobile: bool,
    /// Extra time to run after the celebration music starts, in milliseconds
    #[arg(long, default_value = "5000")]
    settle_ms: u64,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RevealConfig::load()?;
    if let Some(w) = &args.winner {
        config.winner = match w.to_ascii_lowercase().as_str() {
            "menina" | "girl" => Winner::Girl,
            "menino" | "boy" => Winner::Boy,
            other => return Err(format!("unknown winner: {other}").into()),
        };
    }
    config.validate()?;

    let horizon = config.timing.total_until_celebration_ms()
        + config.timing.celebration_settle_ms
        + args.settle_ms;

    let unlock: Box<dyn AudioUnlockStrategy> = if args.mobile {
        Box::new(MobileUnlock::new())
    } else {
        Box::new(AlwaysUnlocked)
    };
    let mut exp = Experience::new(
        config,
        ExperienceDeps {
            backend: Box::new(NullBackend),
            unlock,
            haptics: Box::new(NullHaptics),
            share: Box::new(ClipboardOnlyTarget::new()),
            is_mobile: args.mobile,
        },
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let epoch = Instant::now();
        exp.start(0);
        emit(&mut exp)?;

        let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
        loop {
            interval.tick().await;
            let now_ms = epoch.elapsed().as_millis() as u64;
            exp.tick_at(now_ms);
            emit(&mut exp)?;
            if now_ms >= horizon {
                break;
            }
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

fn emit(exp: &mut Experience) -> Result<(), Box<dyn std::error::Error>> {
    for event in exp.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
