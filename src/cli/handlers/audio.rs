//! Recording and alignment command handlers.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::warn;

use super::resolve::{parse_id, require_block, require_page};
use crate::cli::output::{OutputFormat, RecordingView, format_offset, print_json};
use crate::cli::{AudioAddArgs, AudioCommand, AudioUpdateArgs};
use crate::domain::{AlignmentEntry, AlignmentId, NewRecording, Recording, RecordingId, RecordingPatch};
use crate::store::{AudioRepository, SqliteStore};

pub fn handle_audio(command: &AudioCommand, store: &mut SqliteStore) -> Result<()> {
    match command {
        AudioCommand::Add(args) => {
            let new = build_recording(store, args)?;
            let recording = store
                .create_recording(new)
                .with_context(|| format!("failed to register {}", args.path.display()))?;
            match args.format {
                OutputFormat::Human => println!(
                    "Registered recording {} ({})",
                    recording.id, recording.file_name
                ),
                OutputFormat::Json => print_json(&recording)?,
            }
            Ok(())
        }
        AudioCommand::Ls(args) => {
            let page = match &args.page {
                Some(page) => Some(require_page(store, page)?),
                None => None,
            };
            let recordings = store
                .list_recordings(page.as_ref().map(|p| p.id()))
                .with_context(|| "failed to list recordings")?;
            match args.format {
                OutputFormat::Human => {
                    if recordings.is_empty() {
                        println!("No recordings found.");
                    } else {
                        for recording in &recordings {
                            print_recording_row(recording);
                        }
                        println!();
                        println!("{} recording(s)", recordings.len());
                    }
                }
                OutputFormat::Json => print_json(&recordings)?,
            }
            Ok(())
        }
        AudioCommand::Show(args) => {
            let id: RecordingId = parse_id(&args.recording, "recording")?;
            let Some(recording) = store.get_recording(&id)? else {
                bail!("recording not found: {}", id);
            };
            let alignments = store.alignments_for_recording(&id)?;
            match args.format {
                OutputFormat::Human => {
                    print_recording(&recording);
                    if !alignments.is_empty() {
                        println!();
                        print_marks(&alignments);
                    }
                }
                OutputFormat::Json => print_json(RecordingView {
                    recording: &recording,
                    alignments: &alignments,
                })?,
            }
            Ok(())
        }
        AudioCommand::Update(args) => {
            let id: RecordingId = parse_id(&args.recording, "recording")?;
            let patch = build_patch(store, args)?;
            if patch.is_empty() {
                bail!("nothing to change");
            }
            let recording = store
                .update_recording(&id, &patch)
                .with_context(|| format!("failed to update recording {}", id))?;
            match args.format {
                OutputFormat::Human => println!("Updated recording {}", recording.id),
                OutputFormat::Json => print_json(&recording)?,
            }
            Ok(())
        }
        AudioCommand::Rm(args) => {
            let id: RecordingId = parse_id(&args.recording, "recording")?;
            let recording = store
                .delete_recording(&id)
                .with_context(|| format!("failed to delete recording {}", id))?;
            println!("Deleted recording {}", recording.id);
            if !args.keep_file {
                remove_audio_file(&recording.file_path);
            }
            Ok(())
        }
        AudioCommand::Align(args) => {
            let id: RecordingId = parse_id(&args.recording, "recording")?;
            let block = require_block(store, &args.block)?;
            let entry = store
                .align(&id, block.id(), args.offset_ms, args.content.as_deref())
                .with_context(|| format!("failed to align block {}", block.id()))?;
            match args.format {
                OutputFormat::Human => println!(
                    "Aligned {} at {} ({})",
                    block.id(),
                    format_offset(entry.offset_ms),
                    entry.id
                ),
                OutputFormat::Json => print_json(&entry)?,
            }
            Ok(())
        }
        AudioCommand::Marks(args) => {
            let id: RecordingId = parse_id(&args.recording, "recording")?;
            let alignments = store.alignments_for_recording(&id)?;
            match args.format {
                OutputFormat::Human => {
                    if alignments.is_empty() {
                        println!("No alignment marks.");
                    } else {
                        print_marks(&alignments);
                    }
                }
                OutputFormat::Json => print_json(&alignments)?,
            }
            Ok(())
        }
        AudioCommand::Unalign(args) => {
            let id: AlignmentId = parse_id(&args.alignment, "alignment")?;
            store
                .delete_alignment(&id)
                .with_context(|| format!("failed to remove alignment {}", id))?;
            println!("Removed alignment {}", id);
            Ok(())
        }
    }
}

fn build_recording(store: &SqliteStore, args: &AudioAddArgs) -> Result<NewRecording> {
    let page = match &args.page {
        Some(page) => Some(require_page(store, page)?.id().clone()),
        None => None,
    };
    let block = match &args.block {
        Some(block) => Some(require_block(store, block)?.id().clone()),
        None => None,
    };
    let size_bytes = args.size_bytes.or_else(|| {
        std::fs::metadata(&args.path)
            .ok()
            .and_then(|m| i64::try_from(m.len()).ok())
    });

    Ok(NewRecording::new(&args.path)
        .page(page)
        .context_block(block)
        .devices(args.mic.clone(), args.system.clone())
        .quality(args.quality.clone())
        .span(args.started, args.ended)
        .duration_ms(args.duration_ms)
        .size_bytes(size_bytes))
}

fn build_patch(store: &SqliteStore, args: &AudioUpdateArgs) -> Result<RecordingPatch> {
    let page_id = if args.clear_page {
        Some(None)
    } else {
        match &args.page {
            Some(page) => Some(Some(require_page(store, page)?.id().clone())),
            None => None,
        }
    };
    let context_block = if args.clear_block {
        Some(None)
    } else {
        match &args.block {
            Some(block) => Some(Some(require_block(store, block)?.id().clone())),
            None => None,
        }
    };
    Ok(RecordingPatch {
        page_id,
        context_block,
        ended: args.ended,
        duration_ms: args.duration_ms,
        mic_device: args.mic.clone(),
        system_device: args.system.clone(),
        quality: args.quality.clone(),
    })
}

/// Deletes the audio file of a removed recording. A missing file is fine.
fn remove_audio_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => println!("  removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove audio file"),
    }
}

fn print_recording_row(recording: &Recording) {
    let duration = recording
        .duration_ms
        .map_or_else(|| "-".to_string(), format_offset);
    println!(
        "{}  {:<24}  {:>12}  {}",
        recording.id,
        recording.file_name,
        duration,
        recording.started.format("%Y-%m-%d %H:%M")
    );
}

fn print_recording(recording: &Recording) {
    println!("id:       {}", recording.id);
    println!("file:     {}", recording.file_path.display());
    if let Some(mime) = &recording.mime_type {
        println!("type:     {}", mime);
    }
    if let Some(page) = &recording.page_id {
        println!("page:     {}", page);
    }
    if let Some(block) = &recording.context_block {
        println!("block:    {}", block);
    }
    println!("started:  {}", recording.started.format("%Y-%m-%d %H:%M:%S"));
    if let Some(ended) = recording.ended {
        println!("ended:    {}", ended.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(duration) = recording.duration_ms {
        println!("duration: {}", format_offset(duration));
    }
    if let Some(mic) = &recording.mic_device {
        println!("mic:      {}", mic);
    }
    if let Some(system) = &recording.system_device {
        println!("system:   {}", system);
    }
    if let Some(quality) = &recording.quality {
        println!("quality:  {}", quality);
    }
}

fn print_marks(alignments: &[AlignmentEntry]) {
    for entry in alignments {
        let content = entry.content.as_deref().unwrap_or("");
        println!(
            "{:>12}  {}  {}  [{}]",
            format_offset(entry.offset_ms),
            entry.block_id,
            super::truncate_str(content, 40),
            entry.id
        );
    }
}
