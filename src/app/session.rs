//! Window-independent page state: selection, request lifecycle, results,
//! alerts and the copied marker.

use crate::constants::COPIED_FLASH;
use crate::error::GenerateError;
use crate::media::SelectedFile;
use crate::types::{CopyTarget, GenerationResult, Language, RequestPhase};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Identifies one generation request so late completions can be told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

/// Everything a background task needs to run one request
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: RequestId,
    pub file: SelectedFile,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Network failure, error status, or the server reported a failure
    Unreachable,
    /// The server answered with something that is not a caption result
    InvalidResponse,
}

/// A blocking error dialog waiting to be dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub detail: String,
}

#[derive(Default)]
pub struct Session {
    selected: Option<SelectedFile>,
    language: Language,
    phase: RequestPhase,
    result: Option<GenerationResult>,
    result_is_stale: bool,
    alert: Option<Alert>,
    copied: Option<(CopyTarget, Instant)>,
    dragging: bool,
    next_id: u64,
    in_flight: Option<RequestId>,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RequestPhase::Loading
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// True when the shown result predates a request that failed
    pub fn result_is_stale(&self) -> bool {
        self.result_is_stale
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn can_generate(&self) -> bool {
        self.selected.is_some() && !self.is_loading()
    }

    /// Replace the selection. Clears results and invalidates any request
    /// still running for the previous file.
    pub fn select(&mut self, file: SelectedFile) {
        info!(name = %file.name, path = ?file.path, mime = %file.mime, kind = ?file.kind, bytes = file.bytes.len(), "File selected");
        if let Some(id) = self.in_flight.take() {
            debug!(?id, "Dropping in-flight request for previous file");
        }
        self.selected = Some(file);
        self.result = None;
        self.result_is_stale = false;
        self.alert = None;
        self.copied = None;
        self.phase = RequestPhase::Idle;
    }

    /// Start a request for the current selection. No-op (None) without a
    /// file or while another request is loading.
    pub fn begin_request(&mut self) -> Option<PendingRequest> {
        if self.is_loading() {
            return None;
        }
        let file = self.selected.clone()?;
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.in_flight = Some(id);
        self.phase = RequestPhase::Loading;
        self.alert = None;
        Some(PendingRequest {
            id,
            file,
            language: self.language,
        })
    }

    /// Apply a completed request. Returns false if `id` is no longer the
    /// request being waited on.
    pub fn finish_request(
        &mut self,
        id: RequestId,
        outcome: Result<GenerationResult, GenerateError>,
    ) -> bool {
        if self.in_flight != Some(id) {
            debug!(?id, "Ignoring completion of superseded request");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                info!(captions = result.captions.len(), "Captions generated");
                self.result = Some(result);
                self.result_is_stale = false;
                self.copied = None;
                self.phase = RequestPhase::Succeeded;
            }
            Err(e) => {
                error!(error = %e, "Generation request failed");
                let kind = if e.is_invalid_response() {
                    AlertKind::InvalidResponse
                } else {
                    AlertKind::Unreachable
                };
                self.alert = Some(Alert {
                    kind,
                    detail: e.to_string(),
                });
                self.result_is_stale = self.result.is_some();
                self.phase = RequestPhase::Failed;
            }
        }
        true
    }

    /// Abandon the in-flight request, if any
    pub fn cancel_request(&mut self) -> Option<RequestId> {
        let id = self.in_flight.take()?;
        info!(?id, "Generation request cancelled");
        self.phase = if self.result.is_some() {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Idle
        };
        Some(id)
    }

    pub fn mark_copied(&mut self, target: CopyTarget, now: Instant) {
        self.copied = Some((target, now));
    }

    /// Currently flagged target, if its display window is still open
    pub fn copied(&self, now: Instant) -> Option<CopyTarget> {
        self.copied
            .filter(|(_, at)| now.saturating_duration_since(*at) < COPIED_FLASH)
            .map(|(target, _)| target)
    }

    /// Time until the copied marker reverts, for repaint scheduling
    pub fn copied_remaining(&self, now: Instant) -> Option<Duration> {
        let (_, at) = self.copied?;
        COPIED_FLASH
            .checked_sub(now.saturating_duration_since(at))
            .filter(|d| !d.is_zero())
    }
}
