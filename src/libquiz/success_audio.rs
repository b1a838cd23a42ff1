//! The "well done" clip played when a correct answer has no Latin text to
//! speak. Loaded once per process and embedded in every exported page.

use crate::libquiz::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUCCESS_AUDIO_FILE: &str = "success_audio.mp3";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessAudio {
    encoded: String,
}

impl SuccessAudio {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        info!("[Audio] Loaded success audio from {:?} ({} bytes)", path, bytes.len());
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        SuccessAudio {
            encoded: BASE64.encode(bytes),
        }
    }

    /// Base64 payload, empty when no clip could be loaded.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// Picks the clip location: an explicit path wins, then the file next to the
/// executable, then the working directory.
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SUCCESS_AUDIO_FILE)));
    match beside_exe {
        Some(path) if path.exists() => path,
        _ => {
            debug!("[Audio] No clip beside the executable, using working directory");
            PathBuf::from(SUCCESS_AUDIO_FILE)
        }
    }
}
