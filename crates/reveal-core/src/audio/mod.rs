//! Audio subsystem: track playback, synthetic cues, and autoplay-policy
//! handling behind the [`AudioIntent`] command interface.

pub mod backend;
pub mod coordinator;
pub mod synth;
pub mod track;
pub mod unlock;

pub use backend::{MediaBackend, NullBackend, PlayRejection, ScriptedBackend};
pub use coordinator::{AudioCoordinator, AudioIntent};
pub use synth::{ContextState, ToneEngine, Waveform};
pub use track::{AudioTrack, TrackId};
pub use unlock::{
    detect_mobile, AlwaysUnlocked, AudioUnlockStrategy, GestureTarget, MobileUnlock,
};
