//! # Portable Image Encoding
//!
//! Photos are stored on a unit as self-contained `data:` URLs
//! (`data:image/jpeg;base64,...`) so a record can be embedded in a report
//! without keeping file handles around. Encoding is lossless: [`decode`]
//! returns exactly the bytes that went into [`encode`].
//!
//! ## Batch uploads
//!
//! [`encode_batch`] runs one task per file. A file that fails to read does not
//! affect the others, and results come back in the order the files were
//! selected, not the order the reads finished.
//!
//! ```no_run
//! use hvac_report::encoder::{self, BatchUpload};
//! use hvac_report::unit::UnitDraft;
//!
//! # async fn example(draft: &mut UnitDraft) {
//! let files = vec!["front.jpg".into(), "nameplate.jpg".into()];
//! let outcomes = encoder::encode_batch(files.clone()).await;
//! let upload = BatchUpload::from_outcomes(&files, outcomes);
//! draft.append_images(upload.images);
//! for failure in &upload.failures {
//!     eprintln!("{}", failure);
//! }
//! # }
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::ReportError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Encode bytes with an explicit mime type.
pub fn encode_with_mime(bytes: &[u8], mime: &str) -> String {
    format!("{}{}{}{}", DATA_PREFIX, mime, BASE64_MARKER, B64.encode(bytes))
}

/// Encode bytes, sniffing the mime type from the image header.
pub fn encode(bytes: &[u8]) -> String {
    encode_with_mime(bytes, sniff_mime(bytes).unwrap_or(FALLBACK_MIME))
}

/// Recover the original bytes from a portable string.
pub fn decode(portable: &str) -> Result<Vec<u8>, ReportError> {
    let (_, payload) = split_data_url(portable)?;
    B64.decode(payload.as_bytes())
        .map_err(|e| ReportError::Encode(format!("Invalid base64 payload: {}", e)))
}

/// Mime type declared by a portable string.
pub fn mime_of(portable: &str) -> Result<&str, ReportError> {
    split_data_url(portable).map(|(mime, _)| mime)
}

fn split_data_url(portable: &str) -> Result<(&str, &str), ReportError> {
    let rest = portable
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| ReportError::Encode("Not a data URL".to_string()))?;
    rest.split_once(BASE64_MARKER)
        .ok_or_else(|| ReportError::Encode("Data URL is not base64 encoded".to_string()))
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Read a file and encode it.
///
/// The mime type comes from the file contents, or from the extension when the
/// contents are not a recognised image format.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<String, ReportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ReportError::Encode(format!("Failed to read {}: {}", path.display(), e)))?;

    let mime = match sniff_mime(&bytes) {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };

    debug!("Encoded {} ({} bytes, {})", path.display(), bytes.len(), mime);
    Ok(encode_with_mime(&bytes, &mime))
}

/// Encode every file concurrently, one independent task each.
///
/// The returned vector lines up with `paths`: entry `i` is the outcome for
/// `paths[i]`.
pub async fn encode_batch(paths: Vec<PathBuf>) -> Vec<Result<String, ReportError>> {
    let mut slots: Vec<Option<Result<String, ReportError>>> =
        std::iter::repeat_with(|| None).take(paths.len()).collect();

    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        tasks.spawn(async move { (index, encode_file(&path).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            // A panicked task leaves its slot empty; reported below
            Err(e) => warn!("Encode task failed: {}", e),
        }
    }

    slots
        .into_iter()
        .zip(&paths)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| {
                Err(ReportError::Encode(format!(
                    "Encoding {} did not complete",
                    path.display()
                )))
            })
        })
        .collect()
}

/// A file from a batch that could not be encoded.
#[derive(Debug)]
pub struct EncodeFailure {
    /// Position of the file in the original selection
    pub index: usize,
    pub path: PathBuf,
    pub error: ReportError,
}

impl fmt::Display for EncodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} ({}): {}", self.index + 1, self.path.display(), self.error)
    }
}

/// Result of a batch upload split into what to append and what to report.
#[derive(Debug, Default)]
pub struct BatchUpload {
    /// Successfully encoded images, in selection order
    pub images: Vec<String>,
    pub failures: Vec<EncodeFailure>,
}

impl BatchUpload {
    pub fn from_outcomes(paths: &[PathBuf], outcomes: Vec<Result<String, ReportError>>) -> Self {
        let mut upload = Self::default();
        for (index, (path, outcome)) in paths.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(image) => upload.images.push(image),
                Err(error) => upload.failures.push(EncodeFailure {
                    index,
                    path: path.clone(),
                    error,
                }),
            }
        }
        upload
    }
}
