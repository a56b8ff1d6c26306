use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use harvest_core::RawListingRow;
use harvest_engine::{
    ArtifactDirs, AttachmentHarvester, FailureKind, FetchError, HarvestSession, ListingFetcher,
    PageRenderer, RenderError, SessionSettings,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
}

fn listing_row(stock: &str, title: &str, date: &str, attachment: Option<&str>) -> RawListingRow {
    RawListingRow {
        stock_name: stock.to_string(),
        title: title.to_string(),
        company: "증권사".to_string(),
        attachment_url: attachment.map(str::to_string),
        date_text: date.to_string(),
        views_text: "10".to_string(),
    }
}

/// Serves a canned page script and counts fetches.
struct ScriptedFetcher {
    pages: Vec<Vec<RawListingRow>>,
    calls: AtomicU32,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Vec<RawListingRow>>) -> Self {
        Self {
            pages,
            calls: AtomicU32::new(0),
        }
    }

    fn fetch_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingFetcher for ScriptedFetcher {
    async fn fetch(&self, page: u32) -> Result<Vec<RawListingRow>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }
}

/// Fails every page fetch.
struct BrokenFetcher;

#[async_trait]
impl ListingFetcher for BrokenFetcher {
    async fn fetch(&self, _page: u32) -> Result<Vec<RawListingRow>, FetchError> {
        Err(FetchError {
            kind: FailureKind::Network,
            message: "connection reset".to_string(),
        })
    }
}

/// Renderer that must never be reached.
struct PanicRenderer;

#[async_trait]
impl PageRenderer for PanicRenderer {
    async fn render_first_page(
        &self,
        _document: &Path,
        _image_dir: &Path,
        _stem: &str,
    ) -> Result<PathBuf, RenderError> {
        panic!("render_first_page called for a row without an attachment");
    }
}

/// Renderer that always fails, leaving the document in place.
struct FailingRenderer;

#[async_trait]
impl PageRenderer for FailingRenderer {
    async fn render_first_page(
        &self,
        _document: &Path,
        image_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, RenderError> {
        Err(RenderError::MissingOutput(
            image_dir.join(stem).with_extension("jpg"),
        ))
    }
}

fn fast_settings() -> SessionSettings {
    SessionSettings {
        inter_page_delay: Duration::ZERO,
        ..SessionSettings::default()
    }
}

fn dirs_in(temp: &TempDir) -> ArtifactDirs {
    ArtifactDirs {
        documents: temp.path().join("report_pdf"),
        images: temp.path().join("first_page"),
    }
}

#[tokio::test]
async fn stop_rule_ends_session_without_fetching_further_pages() {
    let fetcher = ScriptedFetcher::new(vec![
        vec![
            listing_row("종목A", "리포트1", "24.03.21", None),
            listing_row("종목B", "리포트2", "24.03.21", None),
        ],
        vec![
            listing_row("종목C", "리포트3", "24.03.21", None),
            listing_row("종목D", "어제자", "24.03.20", None),
        ],
        // Page 3 exists but must never be requested.
        vec![listing_row("종목E", "리포트4", "24.03.21", None)],
    ]);
    let temp = TempDir::new().unwrap();
    let harvester =
        AttachmentHarvester::new(reqwest::Client::new(), dirs_in(&temp), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");

    assert_eq!(fetcher.fetch_count(), 2);
    let names: Vec<&str> = result
        .records
        .iter()
        .map(|r| r.stock_name.as_str())
        .collect();
    assert_eq!(names, vec!["종목A", "종목B", "종목C"]);
}

#[tokio::test]
async fn empty_first_page_completes_with_no_records() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let temp = TempDir::new().unwrap();
    let harvester =
        AttachmentHarvester::new(reqwest::Client::new(), dirs_in(&temp), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");
    assert_eq!(fetcher.fetch_count(), 1);
    assert!(result.records.is_empty());
    assert_eq!(result.pages_fetched, 1);
}

#[tokio::test]
async fn exhausted_listing_ends_after_the_empty_page() {
    let fetcher = ScriptedFetcher::new(vec![vec![listing_row(
        "종목A",
        "리포트",
        "24.03.21",
        None,
    )]]);
    let temp = TempDir::new().unwrap();
    let harvester =
        AttachmentHarvester::new(reqwest::Client::new(), dirs_in(&temp), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");
    // Page 1 had data, page 2 came back empty.
    assert_eq!(fetcher.fetch_count(), 2);
    assert_eq!(result.records.len(), 1);
}

#[tokio::test]
async fn future_dated_rows_are_skipped_without_stopping() {
    let fetcher = ScriptedFetcher::new(vec![vec![
        listing_row("내일자", "클록 스큐", "24.03.22", None),
        listing_row("오늘자", "정상", "24.03.21", None),
    ]]);
    let temp = TempDir::new().unwrap();
    let harvester =
        AttachmentHarvester::new(reqwest::Client::new(), dirs_in(&temp), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].stock_name, "오늘자");
}

#[tokio::test]
async fn page_fetch_failure_fails_the_session() {
    let temp = TempDir::new().unwrap();
    let fetcher = BrokenFetcher;
    let harvester =
        AttachmentHarvester::new(reqwest::Client::new(), dirs_in(&temp), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let err = session.run(today()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn rows_without_attachments_never_touch_the_network() {
    // No mocks mounted: any request against this server would 404, and
    // the PanicRenderer would abort on any render attempt.
    let server = MockServer::start().await;
    let client = reqwest::Client::new();
    let temp = TempDir::new().unwrap();
    let harvester = AttachmentHarvester::new(client, dirs_in(&temp), PanicRenderer);
    let fetcher = ScriptedFetcher::new(vec![vec![listing_row(
        "무첨부",
        "링크 없음",
        "24.03.21",
        None,
    )]]);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].attachment_url, None);
    assert_eq!(result.attachments_downloaded, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn render_failure_keeps_document_and_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/1.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 fake".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/report/1.pdf", server.uri());
    let fetcher = ScriptedFetcher::new(vec![vec![listing_row(
        "삼성전자",
        "업황 점검",
        "24.03.21",
        Some(&url),
    )]]);
    let temp = TempDir::new().unwrap();
    let dirs = dirs_in(&temp);
    let harvester = AttachmentHarvester::new(reqwest::Client::new(), dirs.clone(), FailingRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");

    assert_eq!(result.attachments_downloaded, 1);
    assert_eq!(result.render_failures, 1);
    assert!(dirs.documents.join("삼성전자_업황 점검.pdf").exists());
    assert!(!dirs.images.join("삼성전자_업황 점검.jpg").exists());
    assert_eq!(result.records[0].attachment_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn download_failure_keeps_the_record_without_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/report/missing.pdf", server.uri());
    let fetcher = ScriptedFetcher::new(vec![vec![listing_row(
        "카카오",
        "삭제된 첨부",
        "24.03.21",
        Some(&url),
    )]]);
    let temp = TempDir::new().unwrap();
    let dirs = dirs_in(&temp);
    let harvester = AttachmentHarvester::new(reqwest::Client::new(), dirs.clone(), PanicRenderer);
    let session = HarvestSession::new(&fetcher, &harvester, fast_settings());

    let result = session.run(today()).await.expect("session ok");

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.attachments_downloaded, 0);
    assert!(!dirs.documents.join("카카오_삭제된 첨부.pdf").exists());
}
