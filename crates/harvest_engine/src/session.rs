use std::time::Duration;

use chrono::NaiveDate;

use harvest_core::{classify_row, ReportRecord, RowDisposition};
use harvest_logging::{harvest_info, harvest_warn};

use crate::attachment::AttachmentHarvester;
use crate::fetch::ListingFetcher;
use crate::render::PageRenderer;
use crate::types::{FetchError, HarvestOutcome, HarvestSessionResult};

/// Pacing and paging policy for one harvest session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Fixed delay between listing pages. This is a politeness rate limit
    /// against the portal, not an artifact to parallelize away.
    pub inter_page_delay: Duration,
    /// Hard upper bound on pages per run; the stop rule normally fires
    /// long before this.
    pub max_pages: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inter_page_delay: Duration::from_secs(1),
            max_pages: 200,
        }
    }
}

/// One fetch-filter-harvest pass over the listing.
pub struct HarvestSession<'a, F, R> {
    fetcher: &'a F,
    harvester: &'a AttachmentHarvester<R>,
    settings: SessionSettings,
}

impl<'a, F: ListingFetcher, R: PageRenderer> HarvestSession<'a, F, R> {
    pub fn new(
        fetcher: &'a F,
        harvester: &'a AttachmentHarvester<R>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            fetcher,
            harvester,
            settings,
        }
    }

    /// Walks listing pages newest-first, harvesting rows dated `target`.
    ///
    /// Pages and attachments are processed strictly sequentially. A page
    /// fetch error fails the whole session (fail closed): skipping a page
    /// could let the stop rule see discontiguous dates and silently
    /// under-report the day.
    pub async fn run(&self, target: NaiveDate) -> Result<HarvestSessionResult, FetchError> {
        let mut result = HarvestSessionResult::default();
        let mut page = 1u32;

        loop {
            let rows = self.fetcher.fetch(page).await?;
            result.pages_fetched += 1;
            if rows.is_empty() {
                harvest_info!("page {} empty; listing exhausted", page);
                break;
            }

            let mut stop = false;
            for row in &rows {
                match classify_row(&row.date_text, target) {
                    RowDisposition::Keep => {
                        let record = ReportRecord::from_row(row, target);
                        self.harvest_attachment(&record, &mut result).await;
                        result.records.push(record);
                    }
                    RowDisposition::StopSession => {
                        // Rows already kept from this page stay in.
                        stop = true;
                        break;
                    }
                    RowDisposition::Ignore => {}
                }
            }
            if stop {
                harvest_info!(
                    "stop rule hit on page {}; {} records collected",
                    page,
                    result.records.len()
                );
                break;
            }

            page += 1;
            if page > self.settings.max_pages {
                harvest_warn!("page cap {} reached; ending session", self.settings.max_pages);
                break;
            }
            tokio::time::sleep(self.settings.inter_page_delay).await;
        }

        Ok(result)
    }

    async fn harvest_attachment(
        &self,
        record: &ReportRecord,
        result: &mut HarvestSessionResult,
    ) {
        match self.harvester.harvest(record).await {
            Ok(HarvestOutcome::Absent) => {}
            Ok(HarvestOutcome::Harvested(artifact)) => {
                result.attachments_downloaded += 1;
                if artifact.image_path.is_none() {
                    result.render_failures += 1;
                }
            }
            Err(err) => {
                // Row-local failure: the record is kept without its artifact.
                harvest_warn!("attachment harvest failed for '{}': {}", record.title, err);
            }
        }
    }
}
