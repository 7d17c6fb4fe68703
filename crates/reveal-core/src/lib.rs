//! # Reveal Core Library
//!
//! Core logic for a timed gender-reveal experience. A ~53 second scripted
//! sequence raises tension through countdown, mystery, buildup, and duel
//! phases before announcing the result, with synchronized music, synthetic
//! audio cues, and haptic feedback. All operations are available through a
//! standalone CLI binary; UI shells are thin layers over this same library.
//!
//! ## Architecture
//!
//! - **Phase Controller**: A wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick_at()` for progress; phases
//!   advance strictly forward on a declarative timeline
//! - **Audio Coordinator**: The single writer of playback state, fed by
//!   `AudioIntent` messages; handles autoplay policy, fades, retries, and
//!   the manual-play fallback
//! - **Experience**: The orchestrator wiring both machines together with
//!   haptics and sharing behind platform capability traits
//! - **Simulation**: Deterministic virtual-clock runs of the full sequence
//!
//! ## Key Components
//!
//! - [`PhaseController`]: Phase state machine and timeline
//! - [`AudioCoordinator`]: Playback, synthetic cues, unlock handling
//! - [`Experience`]: Top-level facade driven by gestures and ticks
//! - [`RevealConfig`]: TOML-backed configuration

pub mod audio;
pub mod config;
pub mod error;
pub mod events;
pub mod experience;
pub mod haptics;
pub mod phase;
pub mod session;
pub mod share;
pub mod simulation;

pub use audio::{AudioCoordinator, AudioIntent, MediaBackend, ToneEngine, TrackId};
pub use config::{RevealConfig, Winner};
pub use error::{AudioError, ConfigError, CoreError};
pub use events::Event;
pub use experience::{Experience, ExperienceDeps};
pub use phase::{DuelStage, Phase, PhaseContent, PhaseController};
pub use session::ExperienceSession;
pub use share::{SharePayload, ShareOutcome, ShareTarget};
pub use simulation::{simulate, SimulationOptions, SimulationRun};
