use std::path::PathBuf;

use harvest_core::ReportRecord;
use harvest_logging::{harvest_debug, harvest_warn};

use crate::filename::artifact_stem;
use crate::persist::AtomicFileWriter;
use crate::render::PageRenderer;
use crate::types::{DownloadError, HarvestOutcome, HarvestedArtifact};

/// Protocol-relative links (`//host/path`) are what the portal usually
/// puts in attachment cells; default them to https.
pub fn normalize_attachment_url(href: &str) -> String {
    match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_string(),
    }
}

/// On-disk layout for harvested attachments.
#[derive(Debug, Clone)]
pub struct ArtifactDirs {
    pub documents: PathBuf,
    pub images: PathBuf,
}

impl Default for ArtifactDirs {
    fn default() -> Self {
        Self {
            documents: PathBuf::from("report_pdf"),
            images: PathBuf::from("first_page"),
        }
    }
}

/// Downloads a record's attachment and renders a first-page preview.
pub struct AttachmentHarvester<R> {
    client: reqwest::Client,
    dirs: ArtifactDirs,
    renderer: R,
}

impl<R: PageRenderer> AttachmentHarvester<R> {
    /// `client` should be the listing fetcher's client so both sides
    /// present the same browser identity.
    pub fn new(client: reqwest::Client, dirs: ArtifactDirs, renderer: R) -> Self {
        Self {
            client,
            dirs,
            renderer,
        }
    }

    /// Harvests one record's attachment, if any.
    ///
    /// A record without a link returns `Absent` without touching the
    /// network. Download errors are row-local; the caller logs them and
    /// keeps the record. A failed render does not invalidate the stored
    /// document.
    pub async fn harvest(&self, record: &ReportRecord) -> Result<HarvestOutcome, DownloadError> {
        let Some(raw_url) = record.attachment_url.as_deref() else {
            return Ok(HarvestOutcome::Absent);
        };

        let url = normalize_attachment_url(raw_url);
        let parsed = url::Url::parse(&url).map_err(|err| DownloadError::InvalidUrl {
            url: url.clone(),
            message: err.to_string(),
        })?;

        let bytes = self.download(parsed).await?;
        let stem = artifact_stem(&record.stock_name, &record.title);
        let writer = AtomicFileWriter::new(self.dirs.documents.clone());
        let document_path = writer.write(&format!("{stem}.pdf"), &bytes)?;
        harvest_debug!("stored attachment at {:?}", document_path);

        let image_path = match self
            .renderer
            .render_first_page(&document_path, &self.dirs.images, &stem)
            .await
        {
            Ok(path) => Some(path),
            Err(err) => {
                harvest_warn!("first-page render failed for {:?}: {}", document_path, err);
                None
            }
        };

        Ok(HarvestOutcome::Harvested(HarvestedArtifact {
            document_path,
            image_path,
        }))
    }

    async fn download(&self, url: url::Url) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DownloadError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| DownloadError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
