//! Audio recordings and their alignment with blocks.

use crate::domain::{AlignmentId, BlockId, PageId, RecordingId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions accepted for recordings, lowercase.
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "webm"];

/// A recording's metadata failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct InvalidRecording {
    pub field: &'static str,
    pub message: String,
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// True when `file_name` carries one of [`AUDIO_EXTENSIONS`].
pub fn is_audio_file(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type implied by the file extension.
pub fn mime_type_for(file_name: &str) -> Option<&'static str> {
    match extension(file_name)?.as_str() {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}

/// Milliseconds between two instants, when the end is known.
pub fn duration_between(started: DateTime<Utc>, ended: Option<DateTime<Utc>>) -> Option<i64> {
    ended.map(|end| (end - started).num_milliseconds())
}

/// A stored audio recording.
///
/// The audio bytes live at `file_path`; only metadata is kept here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    pub id: RecordingId,
    pub file_name: String,
    pub file_path: PathBuf,
    pub mime_type: Option<String>,
    pub page_id: Option<PageId>,
    pub context_block: Option<BlockId>,
    pub mic_device: Option<String>,
    pub system_device: Option<String>,
    pub quality: Option<String>,
    pub started: DateTime<Utc>,
    pub ended: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub size_bytes: Option<i64>,
    pub created: DateTime<Utc>,
}

/// Metadata for a recording about to be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecording {
    pub file_name: String,
    pub file_path: PathBuf,
    pub mime_type: Option<String>,
    pub page_id: Option<PageId>,
    pub context_block: Option<BlockId>,
    pub mic_device: Option<String>,
    pub system_device: Option<String>,
    pub quality: Option<String>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub size_bytes: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl NewRecording {
    /// Starts a recording at `file_path`; the file name is taken from the path.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            mime_type: mime_type_for(&file_name).map(str::to_string),
            file_name,
            file_path,
            page_id: None,
            context_block: None,
            mic_device: None,
            system_device: None,
            quality: None,
            started: None,
            ended: None,
            duration_ms: None,
            size_bytes: None,
        }
    }

    pub fn mime_type(mut self, mime_type: Option<impl Into<String>>) -> Self {
        if let Some(mime) = non_blank(mime_type.map(Into::into)) {
            self.mime_type = Some(mime);
        }
        self
    }

    pub fn page(mut self, page_id: Option<PageId>) -> Self {
        self.page_id = page_id;
        self
    }

    /// Sets the block that was being edited when recording began.
    pub fn context_block(mut self, block: Option<BlockId>) -> Self {
        self.context_block = block;
        self
    }

    /// Sets the microphone and system-audio device names.
    pub fn devices(mut self, mic: Option<String>, system: Option<String>) -> Self {
        self.mic_device = non_blank(mic);
        self.system_device = non_blank(system);
        self
    }

    pub fn quality(mut self, quality: Option<String>) -> Self {
        self.quality = non_blank(quality);
        self
    }

    /// Sets start and end; a missing start defaults to registration time.
    pub fn span(mut self, started: Option<DateTime<Utc>>, ended: Option<DateTime<Utc>>) -> Self {
        self.started = started;
        self.ended = ended;
        self
    }

    /// Overrides the duration otherwise derived from the span.
    pub fn duration_ms(mut self, duration_ms: Option<i64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn size_bytes(mut self, size_bytes: Option<i64>) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Checks the file name and the numeric fields.
    pub fn validate(&self) -> Result<(), InvalidRecording> {
        if self.file_name.trim().is_empty() {
            return Err(InvalidRecording {
                field: "file_name",
                message: "recording needs a file name".to_string(),
            });
        }
        if !is_audio_file(&self.file_name) {
            return Err(InvalidRecording {
                field: "file_name",
                message: format!(
                    "'{}' is not an audio file (expected one of: {})",
                    self.file_name,
                    AUDIO_EXTENSIONS.join(", ")
                ),
            });
        }
        if let (Some(start), Some(end)) = (self.started, self.ended)
            && end < start
        {
            return Err(InvalidRecording {
                field: "ended",
                message: "recording ends before it starts".to_string(),
            });
        }
        check_non_negative("duration_ms", self.duration_ms)?;
        check_non_negative("size_bytes", self.size_bytes)?;
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: Option<i64>) -> Result<(), InvalidRecording> {
    match value {
        Some(v) if v < 0 => Err(InvalidRecording {
            field,
            message: format!("must not be negative, got {v}"),
        }),
        _ => Ok(()),
    }
}

/// Changes to a recording's metadata. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPatch {
    pub page_id: Option<Option<PageId>>,
    pub context_block: Option<Option<BlockId>>,
    pub ended: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub mic_device: Option<String>,
    pub system_device: Option<String>,
    pub quality: Option<String>,
}

impl RecordingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch, re-deriving the duration when only the end moved.
    pub fn apply(&self, recording: &Recording) -> Result<Recording, InvalidRecording> {
        let mut next = recording.clone();
        if let Some(page) = &self.page_id {
            next.page_id = page.clone();
        }
        if let Some(block) = &self.context_block {
            next.context_block = block.clone();
        }
        if let Some(ended) = self.ended {
            if ended < next.started {
                return Err(InvalidRecording {
                    field: "ended",
                    message: "recording ends before it starts".to_string(),
                });
            }
            next.ended = Some(ended);
            next.duration_ms = duration_between(next.started, next.ended);
        }
        if let Some(duration) = self.duration_ms {
            check_non_negative("duration_ms", Some(duration))?;
            next.duration_ms = Some(duration);
        }
        if let Some(mic) = &self.mic_device {
            next.mic_device = non_blank(Some(mic.clone()));
        }
        if let Some(system) = &self.system_device {
            next.system_device = non_blank(Some(system.clone()));
        }
        if let Some(quality) = &self.quality {
            next.quality = non_blank(Some(quality.clone()));
        }
        Ok(next)
    }
}

/// A point in a recording where a block was written.
///
/// One entry exists per (recording, block) pair. `authored_at` is the
/// wall-clock time of the first alignment and survives re-alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentEntry {
    pub id: AlignmentId,
    pub recording_id: RecordingId,
    pub block_id: BlockId,
    pub offset_ms: i64,
    pub content: Option<String>,
    pub authored_at: DateTime<Utc>,
}
