//! Result sharing from the celebration screen.
//!
//! Platforms with a native share sheet get the structured payload; everywhere
//! else the share text is copied to the clipboard. Both outcomes count as a
//! successful share.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Winner;
use crate::error::{CoreError, Result};

/// What gets handed to the share sheet (or, flattened, to the clipboard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_reveal(winner: Winner, url: &str) -> Self {
        let title = "Chá Revelação".to_string();
        let text = match winner {
            Winner::Girl => "É MENINA! 🎀 Acabei de descobrir no chá revelação!".to_string(),
            Winner::Boy => "É MENINO! 💙 Acabei de descobrir no chá revelação!".to_string(),
        };
        Self {
            title,
            text,
            url: url.to_string(),
        }
    }

    /// Single-string form for clipboard fallback.
    pub fn as_clipboard_text(&self) -> String {
        format!("{} {}", self.text, self.url)
    }
}

/// How a share request was ultimately fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    Native,
    CopiedToClipboard,
}

impl ShareOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareOutcome::Native => "native",
            ShareOutcome::CopiedToClipboard => "clipboard",
        }
    }
}

/// Platform seam for the share sheet and clipboard.
pub trait ShareTarget: Send {
    /// Present the native share sheet. Err means unsupported or dismissed
    /// by the platform; user cancellation is not an error at this level.
    fn share_native(&mut self, payload: &SharePayload) -> Result<()>;

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
}

/// Try the native sheet first, fall back to the clipboard.
pub fn share_or_copy(target: &mut dyn ShareTarget, payload: &SharePayload) -> Result<ShareOutcome> {
    match target.share_native(payload) {
        Ok(()) => Ok(ShareOutcome::Native),
        Err(e) => {
            debug!(error = %e, "native share unavailable, copying instead");
            target
                .copy_to_clipboard(&payload.as_clipboard_text())
                .map(|()| ShareOutcome::CopiedToClipboard)
        }
    }
}

/// In-memory target for headless runs and tests. Native sharing is
/// unsupported; copies land in `clipboard`.
#[derive(Debug, Default)]
pub struct ClipboardOnlyTarget {
    pub clipboard: Option<String>,
}

impl ClipboardOnlyTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareTarget for ClipboardOnlyTarget {
    fn share_native(&mut self, _payload: &SharePayload) -> Result<()> {
        Err(CoreError::Share("native share sheet unavailable".into()))
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_text_matches_winner() {
        let girl = SharePayload::for_reveal(Winner::Girl, "https://example.test/reveal");
        assert!(girl.text.contains("MENINA"));
        let boy = SharePayload::for_reveal(Winner::Boy, "https://example.test/reveal");
        assert!(boy.text.contains("MENINO"));
    }

    #[test]
    fn clipboard_fallback_when_native_unsupported() {
        let mut target = ClipboardOnlyTarget::new();
        let payload = SharePayload::for_reveal(Winner::Boy, "https://example.test/reveal");
        let outcome = share_or_copy(&mut target, &payload).unwrap();
        assert_eq!(outcome, ShareOutcome::CopiedToClipboard);
        let copied = target.clipboard.unwrap();
        assert!(copied.contains("MENINO"));
        assert!(copied.ends_with("https://example.test/reveal"));
    }

    struct SheetTarget;
    impl ShareTarget for SheetTarget {
        fn share_native(&mut self, _payload: &SharePayload) -> Result<()> {
            Ok(())
        }
        fn copy_to_clipboard(&mut self, _text: &str) -> Result<()> {
            panic!("clipboard must not be touched when the sheet works");
        }
    }

    #[test]
    fn native_sheet_wins_when_available() {
        let payload = SharePayload::for_reveal(Winner::Girl, "https://example.test/reveal");
        assert_eq!(
            share_or_copy(&mut SheetTarget, &payload).unwrap(),
            ShareOutcome::Native
        );
    }
}
