//! # Site Visit Input
//!
//! JSON description of a visit, used by the command-line front end to fill a
//! [`Session`].
//!
//! ```json
//! {
//!   "client": { "name": "Acme Foods", "address": "1 Main St" },
//!   "units": [
//!     {
//!       "location": "Rooftop 1",
//!       "model_number": "48TCED",
//!       "drive_type": "dd",
//!       "economizer": true,
//!       "filters": [{ "size": "20x20x1", "quantity": "2" }],
//!       "photos": ["photos/rtu1-front.jpg", "/abs/path/nameplate.jpg"]
//!     }
//!   ]
//! }
//! ```
//!
//! Relative photo paths resolve against the directory holding the input file.
//! A photo that cannot be read is skipped and reported; the rest of the unit's
//! photos are kept in order. A unit without a location stops the load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::encoder::{self, BatchUpload, EncodeFailure};
use crate::error::ReportError;
use crate::page::ReportConfig;
use crate::session::Session;
use crate::unit::{ClientInfo, DriveType, FilterEntry, FilterList, UnitDraft};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    #[serde(default)]
    pub client: ClientInfo,
    #[serde(default)]
    pub units: Vec<UnitInput>,
}

/// One unit as written in the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInput {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub area_served: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub drive_type: DriveType,
    #[serde(default)]
    pub economizer: bool,
    #[serde(default)]
    pub filters: Vec<FilterEntry>,
    /// Photo files, relative to the input file or absolute
    #[serde(default)]
    pub photos: Vec<PathBuf>,
}

/// A session built from an input file, plus the photos that were skipped.
#[derive(Debug)]
pub struct LoadedSession {
    pub session: Session,
    pub failures: Vec<EncodeFailure>,
}

impl ReportInput {
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Encode every unit's photos and commit the units into a new session.
    pub async fn into_session(
        self,
        base_dir: &Path,
        config: ReportConfig,
    ) -> Result<LoadedSession, ReportError> {
        let mut session = Session::new(config);
        session.set_client(self.client);
        let mut failures = Vec::new();

        for (n, unit) in self.units.into_iter().enumerate() {
            if unit.location.trim().is_empty() {
                return Err(ReportError::Validation(format!(
                    "Unit {}: Please provide a location for the unit.",
                    n + 1
                )));
            }

            let paths: Vec<PathBuf> = unit.photos.iter().map(|p| base_dir.join(p)).collect();
            let outcomes = encoder::encode_batch(paths.clone()).await;
            let upload = BatchUpload::from_outcomes(&paths, outcomes);
            for failure in &upload.failures {
                warn!("Unit {}: skipping {}", unit.location, failure);
            }

            let mut draft = UnitDraft::new();
            draft.location = unit.location;
            draft.area_served = unit.area_served;
            draft.model_number = unit.model_number;
            draft.serial_number = unit.serial_number;
            draft.drive_type = unit.drive_type;
            draft.economizer = unit.economizer;
            draft.filters = FilterList::from(unit.filters);
            draft.append_images(upload.images);

            session.add_unit(draft)?;
            failures.extend(upload.failures);
        }

        info!(
            "Loaded {} unit(s), {} photo(s) skipped",
            session.units().len(),
            failures.len()
        );
        Ok(LoadedSession { session, failures })
    }
}

/// Directory relative photo paths in `input_path` resolve against.
pub fn base_dir(input_path: &Path) -> &Path {
    match input_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
