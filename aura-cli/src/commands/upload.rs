//! Upload command - simulated image upload into a slot

use std::path::Path;

use anyhow::{Context, Result};
use aura_core::services::{ImageSlot, UploadSource, UploadState};

use super::edit::open_admin;
use super::{get_context, runtime};
use crate::output::{self, percent_bar};

pub fn run(slot_id: &str, file: &Path) -> Result<()> {
    let source = UploadSource::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let ctx = get_context("upload")?;
    open_admin(&ctx)?;
    let editor = ctx.admin_editor().context("Admin view unavailable")?;

    let slot = ImageSlot::resolve(slot_id, &editor.content()).with_context(|| {
        format!(
            "Unknown slot '{}'. Use hero, about_img or a record id from 'aura edit list <section>'",
            slot_id
        )
    })?;

    let bar = percent_bar(&format!("Uploading {}", source.file_name));
    let completed = runtime()?.block_on(async {
        let mut state = editor.upload_image(slot, source);
        loop {
            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                    let current = *state.borrow_and_update();
                    if let Some(percent) = current.percent() {
                        bar.set_position(percent as u64);
                    }
                    if current == UploadState::Complete {
                        return true;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    editor.cancel_upload(slot_id);
                    return false;
                }
            }
        }
    });

    if completed {
        bar.finish();
        output::success(&format!("Stored image in {}", slot_id));
    } else {
        bar.abandon();
        output::warning("Upload cancelled.");
    }
    Ok(())
}
