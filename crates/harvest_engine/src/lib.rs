//! Harvest engine: listing retrieval, attachment capture and durable
//! output for the report pipeline.
mod attachment;
mod decode;
mod export;
mod fetch;
mod filename;
mod listing;
mod persist;
mod render;
mod session;
mod types;

pub use attachment::{normalize_attachment_url, ArtifactDirs, AttachmentHarvester};
pub use decode::decode_listing_body;
pub use export::{write_report_csv, ExportError};
pub use fetch::{FetchSettings, HttpListingFetcher, ListingFetcher, BROWSER_USER_AGENT};
pub use filename::artifact_stem;
pub use listing::{parse_listing, TableSelectors};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use render::{PageRenderer, PdftoppmRenderer};
pub use session::{HarvestSession, SessionSettings};
pub use types::{
    DownloadError, FailureKind, FetchError, HarvestOutcome, HarvestSessionResult,
    HarvestedArtifact, RenderError,
};
