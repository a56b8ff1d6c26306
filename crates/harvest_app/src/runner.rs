use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;

use harvest_engine::{
    write_report_csv, ArtifactDirs, AttachmentHarvester, FetchSettings, HarvestSession,
    HttpListingFetcher, PdftoppmRenderer, SessionSettings,
};
use harvest_logging::harvest_info;

/// One end-to-end harvest execution, as seen by the scheduler.
#[async_trait]
pub trait SessionRunner: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;
}

/// Production runner: fetch today's listings, harvest attachments and
/// write the CSV for the run.
pub struct HarvestRunner {
    pub fetch: FetchSettings,
    pub session: SessionSettings,
    pub dirs: ArtifactDirs,
    pub output_dir: PathBuf,
    /// Directory holding the poppler binaries when not on PATH.
    pub poppler_path: Option<PathBuf>,
}

impl Default for HarvestRunner {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            session: SessionSettings::default(),
            dirs: ArtifactDirs::default(),
            output_dir: PathBuf::from("."),
            poppler_path: None,
        }
    }
}

#[async_trait]
impl SessionRunner for HarvestRunner {
    async fn run(&self) -> anyhow::Result<()> {
        let target = Local::now().date_naive();
        let fetcher = HttpListingFetcher::new(self.fetch.clone())?;
        let renderer = PdftoppmRenderer::new(self.poppler_path.clone());
        let harvester = AttachmentHarvester::new(fetcher.client(), self.dirs.clone(), renderer);
        let session = HarvestSession::new(&fetcher, &harvester, self.session.clone());

        let result = session.run(target).await?;
        let csv_path = write_report_csv(&self.output_dir, target, &result.records)?;
        harvest_info!(
            "harvested {} records over {} pages ({} attachments, {} render failures); wrote {:?}",
            result.records.len(),
            result.pages_fetched,
            result.attachments_downloaded,
            result.render_failures,
            csv_path
        );
        Ok(())
    }
}
