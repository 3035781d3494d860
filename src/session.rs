//! # Session
//!
//! The working state of one site visit: client details, the inspected units
//! and the export pipeline that turns them into a report.
//!
//! ## Export
//!
//! Exports never see a half-edited session. [`Session::begin_export`] clones
//! the state into an [`ExportJob`] and claims the session's export flag; the
//! job then runs independently of any further edits.
//!
//! ```text
//! snapshot ─► assemble ─► render ─► paginate ─► serialize ─► ExportArtifact
//!            (document)  (surface)  (PageSet)   (PDF bytes)
//! ```
//!
//! Only one export may be in flight per session. The flag is released when the
//! job is dropped, whether it finished, failed, or panicked.
//!
//! ```no_run
//! use hvac_report::Session;
//! use hvac_report::pdf::PdfWriter;
//! use hvac_report::render::RasterRenderer;
//!
//! # fn example(session: &Session) -> Result<(), hvac_report::ReportError> {
//! let date = chrono::Local::now().date_naive();
//! let artifact = session.export(date, &RasterRenderer::default(), &PdfWriter::default())?;
//! std::fs::write(&artifact.file_name, &artifact.bytes)?;
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::document::{self, ReportDocument};
use crate::error::ReportError;
use crate::page::ReportConfig;
use crate::paginate::Paginator;
use crate::pdf::PageSerializer;
use crate::render::SurfaceRenderer;
use crate::unit::{ClientInfo, UnitCollection, UnitDraft, UnitId, UnitRecord};

/// Client details plus units; everything an export reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub client: ClientInfo,
    pub units: UnitCollection,
}

/// Explicit session context. Nothing here is global.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    config: ReportConfig,
    exporting: Arc<AtomicBool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl Session {
    pub fn new(config: ReportConfig) -> Self {
        Self::with_state(SessionState::default(), config)
    }

    pub fn with_state(state: SessionState, config: ReportConfig) -> Self {
        Self {
            state,
            config,
            exporting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    // ========================================================================
    // CLIENT
    // ========================================================================

    pub fn client(&self) -> &ClientInfo {
        &self.state.client
    }

    pub fn client_mut(&mut self) -> &mut ClientInfo {
        &mut self.state.client
    }

    pub fn set_client(&mut self, client: ClientInfo) {
        self.state.client = client;
    }

    // ========================================================================
    // UNITS
    // ========================================================================

    pub fn units(&self) -> &UnitCollection {
        &self.state.units
    }

    /// Commit a new-unit draft and append it.
    pub fn add_unit(&mut self, draft: UnitDraft) -> Result<UnitId, ReportError> {
        let record = draft.commit()?;
        let id = record.id;
        self.state.units.add(record)?;
        debug!("Added unit {}", id);
        Ok(id)
    }

    /// Commit an edit draft over the record it was taken from.
    ///
    /// Fails with [`ReportError::NotFound`] if that record was deleted in the
    /// meantime; the collection is left untouched.
    pub fn update_unit(&mut self, draft: UnitDraft) -> Result<UnitId, ReportError> {
        let id = draft.id().ok_or_else(|| {
            ReportError::Validation("Draft is not editing an existing unit".to_string())
        })?;
        let record = draft.commit()?;
        self.state.units.update(id, record)?;
        debug!("Updated unit {}", id);
        Ok(id)
    }

    pub fn delete_unit(&mut self, id: UnitId) -> Option<UnitRecord> {
        let removed = self.state.units.delete(id);
        if removed.is_some() {
            debug!("Deleted unit {}", id);
        }
        removed
    }

    /// Editable copy of the unit stored under `id`.
    pub fn edit_draft(&self, id: UnitId) -> Result<UnitDraft, ReportError> {
        self.state
            .units
            .get(id)
            .map(UnitRecord::edit)
            .ok_or(ReportError::NotFound(id))
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Snapshot the session and claim the export flag.
    pub fn begin_export(&self, date: NaiveDate) -> Result<ExportJob, ReportError> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReportError::ExportInProgress)?;

        Ok(ExportJob {
            snapshot: self.state.clone(),
            date,
            config: self.config,
            _guard: ExportGuard(Arc::clone(&self.exporting)),
        })
    }

    /// Run a full export on the calling thread.
    pub fn export<R, S>(
        &self,
        date: NaiveDate,
        renderer: &R,
        serializer: &S,
    ) -> Result<ExportArtifact, ReportError>
    where
        R: SurfaceRenderer + ?Sized,
        S: PageSerializer + ?Sized,
    {
        self.begin_export(date)?.run(renderer, serializer)
    }

    /// Run a full export on tokio's blocking pool.
    pub async fn export_async<R, S>(
        &self,
        date: NaiveDate,
        renderer: Arc<R>,
        serializer: Arc<S>,
    ) -> Result<ExportArtifact, ReportError>
    where
        R: SurfaceRenderer + Send + Sync + 'static,
        S: PageSerializer + Send + Sync + 'static,
    {
        let job = self.begin_export(date)?;
        tokio::task::spawn_blocking(move || job.run(renderer.as_ref(), serializer.as_ref()))
            .await
            .map_err(|e| ReportError::Export(format!("Export task failed: {}", e)))?
    }
}

/// Clears the export flag when dropped.
#[derive(Debug)]
struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A claimed export over a point-in-time copy of the session.
#[derive(Debug)]
pub struct ExportJob {
    snapshot: SessionState,
    date: NaiveDate,
    config: ReportConfig,
    _guard: ExportGuard,
}

impl ExportJob {
    /// Assemble, render, paginate and serialize the snapshot.
    pub fn run<R, S>(self, renderer: &R, serializer: &S) -> Result<ExportArtifact, ReportError>
    where
        R: SurfaceRenderer + ?Sized,
        S: PageSerializer + ?Sized,
    {
        let document = document::assemble(&self.snapshot.client, &self.snapshot.units, self.date);
        let surface = renderer.render(&document)?;
        let pages = Paginator::for_config(&self.config)?.paginate(&surface)?;
        let bytes = serializer.serialize(&pages)?;

        info!(
            "Exported {} unit(s) into {} page(s), {} bytes",
            document.sections.len(),
            pages.len(),
            bytes.len()
        );

        Ok(ExportArtifact {
            file_name: self.config.file_name.to_string(),
            page_count: pages.len(),
            bytes,
            document,
        })
    }
}

/// The finished report.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// The document the bytes were produced from
    pub document: ReportDocument,
}
