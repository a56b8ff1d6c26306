use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use harvest_core::ReportRecord;
use crate::persist::PersistError;

/// Failure classes for listing-page retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Error fetching one listing page. Fatal for the whole session: skipping
/// a page could let the stop rule see discontiguous dates and silently
/// under-report a day's listings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Error downloading an attachment. Row-local: logged and absorbed, the
/// record is kept without its artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid attachment url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Error rendering a first-page preview. Independent of the download; a
/// failed render leaves the stored document and the record intact.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("renderer exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("renderer produced no output at {0}")]
    MissingOutput(PathBuf),
    #[error(transparent)]
    OutputDir(#[from] PersistError),
}

/// Side artifacts of harvesting one record's attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedArtifact {
    pub document_path: PathBuf,
    /// `None` when the first-page render failed.
    pub image_path: Option<PathBuf>,
}

/// Result of offering one record to the attachment harvester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// The row carried no attachment link; nothing was fetched.
    Absent,
    Harvested(HarvestedArtifact),
}

/// Ordered output of one harvest run. Record order is discovery order,
/// newest page and row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSessionResult {
    pub records: Vec<ReportRecord>,
    pub pages_fetched: u32,
    pub attachments_downloaded: u32,
    pub render_failures: u32,
}
