//! Remote character lookup, dispatched off the UI thread.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::character::Kanji;
use crate::error::LookupError;
use crate::metadata::RemoteKanji;
use crate::runtime::AppEvent;
use crate::session::Generation;

pub const DEFAULT_LOOKUP_URL: &str = "https://kanjiapi.dev/v1/kanji";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Blocking lookup of readings and gloss for one character.
pub trait KanjiLookup: Send + Sync + 'static {
    fn fetch(&self, kanji: Kanji) -> Result<RemoteKanji, LookupError>;
}

/// kanjiapi.dev client.
pub struct KanjiApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl KanjiApiClient {
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let base = if base_url.is_empty() {
            DEFAULT_LOOKUP_URL
        } else {
            base_url
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, kanji: Kanji) -> String {
        format!("{}/{}", self.base_url, kanji)
    }
}

impl KanjiLookup for KanjiApiClient {
    #[instrument(skip(self))]
    fn fetch(&self, kanji: Kanji) -> Result<RemoteKanji, LookupError> {
        let response = self.client.get(self.url_for(kanji)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Lookup used in offline mode: always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl KanjiLookup for OfflineLookup {
    fn fetch(&self, _kanji: Kanji) -> Result<RemoteKanji, LookupError> {
        Err(LookupError::Disabled)
    }
}

/// Identifies which load a lookup was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: Generation,
    pub kanji: Kanji,
}

/// A finished lookup travelling back to the UI thread.
#[derive(Debug)]
pub struct MetadataResponse {
    pub ticket: LookupTicket,
    pub result: Result<RemoteKanji, LookupError>,
}

/// Fire-and-forget request side of the metadata lookup.
pub trait MetadataSource {
    fn request(&mut self, ticket: LookupTicket);
}

/// Runs each lookup on its own thread and posts the result as an [`AppEvent`].
pub struct BackgroundLookup<L: KanjiLookup> {
    lookup: Arc<L>,
    tx: Sender<AppEvent>,
}

impl<L: KanjiLookup> BackgroundLookup<L> {
    pub fn new(lookup: L, tx: Sender<AppEvent>) -> Self {
        Self {
            lookup: Arc::new(lookup),
            tx,
        }
    }
}

impl<L: KanjiLookup> MetadataSource for BackgroundLookup<L> {
    fn request(&mut self, ticket: LookupTicket) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = lookup.fetch(ticket.kanji);
            if let Err(e) = &result {
                warn!("lookup for {} failed: {e}", ticket.kanji);
            }
            if tx
                .send(AppEvent::Metadata(MetadataResponse { ticket, result }))
                .is_err()
            {
                debug!("event loop gone, dropping lookup for {}", ticket.kanji);
            }
        });
    }
}
