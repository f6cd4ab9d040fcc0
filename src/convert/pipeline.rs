/// The conversion run: destination consent, then one image at a time
///
/// Each image goes through decode, resize, encode and write in order and
/// the next image does not start until the current one has been written
/// (or skipped). A decode or write failure aborts the remainder of the
/// run; files written before the failure are left in place.
use std::fmt;
use std::path::Path;

use rfd::AsyncFileDialog;
use thiserror::Error;
use tokio::task;
use tracing::{debug, info};

use super::{codec, naming, WEBP_QUALITY};

/// Snapshot of one pending image handed to a conversion run.
///
/// The run works on copies of the source bytes so the collection can keep
/// changing while a run is in flight.
#[derive(Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Counters for a completed run, used for diagnostics only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Files written to the destination directory
    pub written: usize,
    /// Images whose encode produced no data (skipped silently)
    pub skipped: usize,
}

/// Everything that can abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The user dismissed the destination folder picker
    #[error("no destination folder was selected")]
    DirectoryCancelled,

    /// An image's bytes could not be decoded
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        source: image::ImageError,
    },

    /// Writing an output file failed
    #[error("failed to write {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },

    /// The blocking worker died before returning a result
    #[error("background task failed: {0}")]
    Task(String),
}

/// Run a full conversion: ask for a destination folder, then convert
/// every image into it.
///
/// Cancelling the folder picker aborts the run before anything is
/// decoded or written.
pub async fn run(images: Vec<SourceImage>, target_width: u32) -> Result<RunSummary, ConvertError> {
    let folder = AsyncFileDialog::new()
        .set_title("Choose where to save the converted images")
        .pick_folder()
        .await
        .ok_or(ConvertError::DirectoryCancelled)?;

    info!(
        "converting {} images at width {} into {}",
        images.len(),
        target_width,
        folder.path().display()
    );

    convert_batch(images, target_width, folder.path()).await
}

/// Convert a batch of images into an already chosen destination directory.
pub async fn convert_batch(
    images: Vec<SourceImage>,
    target_width: u32,
    dest_dir: &Path,
) -> Result<RunSummary, ConvertError> {
    let mut summary = RunSummary::default();

    for source in images {
        let file_name = source.file_name.clone();

        // Decode, resize and encode are CPU-bound, so they run on a
        // blocking worker instead of the async executor.
        let encoded = task::spawn_blocking(move || encode_source(&source, target_width))
            .await
            .map_err(|e| ConvertError::Task(e.to_string()))??;

        let Some(data) = encoded else {
            debug!("encoder produced no data for {file_name}, skipping");
            summary.skipped += 1;
            continue;
        };

        let output_name = naming::derive_output_name(&file_name);
        let output_path = dest_dir.join(&output_name);

        // Unconditional overwrite: an existing file of the same name is
        // replaced without confirmation.
        tokio::fs::write(&output_path, &data)
            .await
            .map_err(|e| ConvertError::Write {
                name: output_name.clone(),
                source: e,
            })?;

        debug!("wrote {} ({} bytes)", output_path.display(), data.len());
        summary.written += 1;
    }

    info!(
        "run finished: {} written, {} skipped",
        summary.written, summary.skipped
    );
    Ok(summary)
}

/// Blocking part of the per-image work: decode, compute the output size,
/// rasterize and encode. Returns `Ok(None)` when there is nothing to
/// write for this image.
fn encode_source(
    source: &SourceImage,
    target_width: u32,
) -> Result<Option<Vec<u8>>, ConvertError> {
    let decoded = codec::decode(&source.data).map_err(|e| ConvertError::Decode {
        name: source.file_name.clone(),
        source: e,
    })?;

    let (out_width, out_height) =
        codec::output_dimensions(target_width, decoded.width(), decoded.height());

    // A zero target width degenerates to a zero-area surface. Nothing can
    // be encoded from it, so the image is skipped like any other empty
    // encode result.
    if out_width == 0 || out_height == 0 {
        return Ok(None);
    }

    let surface = codec::rasterize(&decoded, out_width, out_height);
    Ok(codec::encode_webp(&surface, WEBP_QUALITY))
}
