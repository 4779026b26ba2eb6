//! Screen controller: connectivity check, background fetch, list updates.
//!
//! # States
//!
//! ```text
//! Init → CheckingConnectivity → NoConnection
//!                             → Loading → Populated | Empty | Error
//! ```
//!
//! `Error` is kept apart from `Empty` for logging and tests only. Both
//! render the same "No articles found." message.
//!
//! # Restarts
//!
//! Starting a load while another is in flight aborts the older task. Each
//! load is tagged with a generation number and a completion carrying an
//! older generation is dropped, so a slow response can never overwrite a
//! newer list.

use crate::connectivity::ConnectivityProbe;
use crate::error::FetchError;
use crate::opener::{OpenError, UrlOpener};
use crate::pipeline::{FetchOutcome, fetch_articles};
use crate::presentation::ArticleList;
use crate::request::{SearchOptions, build_request_url, redact_api_key};
use reqwest::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";
pub const NO_ARTICLES_MESSAGE: &str = "No articles found.";
pub const LOADING_MESSAGE: &str = "Loading…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Init,
    CheckingConnectivity,
    NoConnection,
    Loading,
    Populated,
    Empty,
    Error,
}

/// A pipeline run that has been spawned but not yet delivered.
#[derive(Debug)]
struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
    done: oneshot::Receiver<FetchOutcome>,
}

/// Owns the article list and drives it through a load.
pub struct ScreenController {
    client: Client,
    base_url: String,
    options: SearchOptions,
    probe: Box<dyn ConnectivityProbe>,
    opener: Box<dyn UrlOpener>,
    list: ArticleList,
    state: ScreenState,
    loading: bool,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl ScreenController {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        options: SearchOptions,
        probe: Box<dyn ConnectivityProbe>,
        opener: Box<dyn UrlOpener>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            options,
            probe,
            opener,
            list: ArticleList::new(),
            state: ScreenState::Init,
            loading: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn list(&self) -> &ArticleList {
        &self.list
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Start a load. Must be called from within a tokio runtime.
    ///
    /// Any load still in flight is aborted first. When the probe reports no
    /// network the screen goes straight to [`ScreenState::NoConnection`] and
    /// nothing is fetched.
    #[instrument(level = "info", skip_all, fields(topic = %self.options.topic))]
    pub fn load(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;

        self.state = ScreenState::CheckingConnectivity;
        if !self.probe.is_connected() {
            warn!("No network connection; skipping fetch");
            self.loading = false;
            self.list.clear();
            self.list.set_empty_message(NO_CONNECTION_MESSAGE);
            self.state = ScreenState::NoConnection;
            return;
        }

        let url = match build_request_url(&self.base_url, &self.options) {
            Ok(url) => url,
            Err(e) => {
                error!(base_url = %self.base_url, error = %e, "Could not build search URL");
                self.complete(generation, FetchOutcome::Failure(e));
                return;
            }
        };
        info!(url = %redact_api_key(&url), generation, "Loading articles");

        self.loading = true;
        self.state = ScreenState::Loading;

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        let handle = tokio::spawn(async move {
            let outcome = fetch_articles(&client, url.as_str()).await;
            // The receiver is gone if this load was superseded.
            let _ = tx.send(outcome);
        });

        self.in_flight = Some(InFlight {
            generation,
            handle,
            done: rx,
        });
    }

    /// Wait for the current load (if any) to deliver, then apply it.
    pub async fn wait(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        match in_flight.done.await {
            Ok(outcome) => {
                self.complete(in_flight.generation, outcome);
            }
            Err(_) => {
                // Sender dropped without a value: the task panicked or was aborted.
                error!(generation = in_flight.generation, "Fetch task ended without a result");
                self.complete(
                    in_flight.generation,
                    FetchOutcome::Failure(FetchError::Network("fetch task aborted".to_string())),
                );
            }
        }
    }

    /// Apply a finished load. Returns `false` if it belongs to an older load
    /// and was discarded.
    ///
    /// Always hides the loading indicator and sets the empty-state message
    /// before swapping in the new list.
    pub(crate) fn complete(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Discarding stale fetch result");
            return false;
        }

        self.loading = false;
        self.list.set_empty_message(NO_ARTICLES_MESSAGE);

        self.state = match &outcome {
            FetchOutcome::Success(articles) if !articles.is_empty() => ScreenState::Populated,
            FetchOutcome::Success(_) | FetchOutcome::Empty => ScreenState::Empty,
            FetchOutcome::Failure(e) => {
                error!(error = %e, "Load failed; showing empty state");
                ScreenState::Error
            }
        };
        self.list.replace(outcome.into_articles());
        info!(state = ?self.state, count = self.list.len(), "Screen updated");
        true
    }

    /// Row selection: open the article on 1-based row `row` externally.
    ///
    /// Returns `false` if there is no such row or the opener failed; both
    /// cases are logged and otherwise ignored.
    pub fn open(&self, row: usize) -> bool {
        let Some(url) = self.list.select(row) else {
            warn!(row, rows = self.list.len(), "No article on that row");
            return false;
        };
        match self.opener.open(url) {
            Ok(()) => true,
            Err(OpenError::InvalidUrl(u)) => {
                warn!(row, url = %u, "Article has no openable link");
                false
            }
            Err(e) => {
                error!(row, %url, error = %e, "Could not open article");
                false
            }
        }
    }

    /// Full screen text: header, loading indicator, then rows or empty state.
    pub fn render(&self, width: usize) -> String {
        let mut out = format!(
            "Guardian search: \"{}\" ({})\n\n",
            self.options.topic, self.options.order_by
        );
        if self.is_loading() {
            out.push_str(LOADING_MESSAGE);
            out.push('\n');
            return out;
        }
        out.push_str(&self.list.render(width));
        out
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(generation = in_flight.generation, "Aborting in-flight fetch");
            in_flight.handle.abort();
        }
    }
}

impl Drop for ScreenController {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
