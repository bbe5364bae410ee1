//! Debounced search pipeline
//!
//! Each keystroke restarts a quiet-period timer. When the timer fires the query
//! is normalized and, if long enough, sent to the catalog. Requests are never
//! cancelled; a sequence number makes sure only the latest request commits.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::model::{normalize_query, AppModel, CatalogClient, SearchPhase, SearchResults};

/// Parts shared between the pipeline and its timer and request tasks
#[derive(Clone)]
struct Shared {
    catalog: Arc<dyn CatalogClient>,
    model: AppModel,
    min_query_len: usize,
    sequence: Arc<AtomicU64>,
}

impl Shared {
    /// Quiet period elapsed: issue a request or fall back to idle
    async fn fire(self, raw: String) {
        let Some(query) = normalize_query(&raw, self.min_query_len) else {
            tracing::debug!(query = %raw, "Search query too short, not sent");
            self.model.set_search_phase(SearchPhase::Idle).await;
            return;
        };

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.model
            .set_search_phase(SearchPhase::InFlight { query: query.clone(), seq })
            .await;

        // Detached so that restarting the timer never cancels a request
        tokio::spawn(self.request(query, seq));
    }

    async fn request(self, query: String, seq: u64) {
        crate::log_api_request!("search", query = %query, seq);
        let results = match self.catalog.search(&query).await {
            Ok(Some(results)) => results,
            Ok(None) => {
                tracing::debug!(query = %query, "Search returned no data");
                SearchResults::default()
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Search failed");
                SearchResults::default()
            }
        };

        let sequence = self.sequence.clone();
        let committed = self
            .model
            .commit_search_results(query.clone(), results, || sequence.load(Ordering::SeqCst) == seq)
            .await;
        if !committed {
            tracing::debug!(query = %query, seq, "Discarding stale search results");
            return;
        }

        if self.model.settle_search(seq).await {
            tracing::info!(query = %query, "Search settled");
        }
    }
}

pub struct SearchPipeline {
    shared: Shared,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl SearchPipeline {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        model: AppModel,
        debounce: Duration,
        min_query_len: usize,
    ) -> Self {
        Self {
            shared: Shared {
                catalog,
                model,
                min_query_len,
                sequence: Arc::new(AtomicU64::new(0)),
            },
            debounce,
            timer: None,
        }
    }

    fn cancel_timer(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    /// Record new query text and restart the quiet period
    pub async fn input(&mut self, raw: &str) {
        self.cancel_timer();
        self.shared
            .model
            .set_search_phase(SearchPhase::Debouncing { query: raw.to_string() })
            .await;

        let shared = self.shared.clone();
        let debounce = self.debounce;
        let raw = raw.to_string();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.fire(raw).await;
        }));
    }

    /// Skip the quiet period and search right away
    pub async fn submit(&mut self, raw: &str) {
        self.cancel_timer();
        self.shared.clone().fire(raw.to_string()).await;
    }

    /// Stop the pending timer. Requests already sent still complete.
    pub async fn dispose(&mut self) {
        if self.cancel_timer() {
            tracing::debug!("Pending search timer cancelled");
        }
        let model = &self.shared.model;
        if matches!(model.search_phase().await, SearchPhase::Debouncing { .. }) {
            model.set_search_phase(SearchPhase::Idle).await;
        }
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture;
    use crate::model::mock::{MockCatalog, Scripted};
    use crate::model::{ContentView, MemoryStore, ResultBucket, SearchHit, SearchResultSection};

    const DEBOUNCE: Duration = Duration::from_millis(800);

    fn results_with_song(title: &str) -> SearchResults {
        SearchResults {
            songs: ResultBucket {
                results: vec![SearchHit {
                    id: title.to_string(),
                    title: title.to_string(),
                    kind: "song".to_string(),
                    ..Default::default()
                }],
                position: 1,
            },
            ..Default::default()
        }
    }

    fn pipeline(catalog: Arc<MockCatalog>) -> (SearchPipeline, AppModel) {
        let model = AppModel::new(Arc::new(MemoryStore::new()));
        let pipeline = SearchPipeline::new(catalog, model.clone(), DEBOUNCE, 2);
        (pipeline, model)
    }

    /// Let the clock run and every woken task finish
    async fn wait(duration: Duration) {
        tokio::time::sleep(duration).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_is_never_sent() {
        let catalog = Arc::new(MockCatalog::new());
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.input("a").await;
        wait(DEBOUNCE * 2).await;

        assert!(catalog.calls().is_empty());
        assert_eq!(model.search_phase().await, SearchPhase::Idle);

        pipeline.input("  b   ").await;
        wait(DEBOUNCE * 2).await;
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_sent_once_after_quiet_period() {
        let catalog = Arc::new(MockCatalog::new().with_search(Scripted::Data(results_with_song("hit"))));
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.input("new value").await;
        assert!(matches!(model.search_phase().await, SearchPhase::Debouncing { .. }));

        wait(DEBOUNCE - Duration::from_millis(1)).await;
        assert!(catalog.calls().is_empty());

        wait(Duration::from_millis(2)).await;
        assert_eq!(catalog.calls(), vec!["search:new+value".to_string()]);

        let state = model.get_search_state().await;
        assert_eq!(state.query, "new+value");
        assert_eq!(state.results, results_with_song("hit"));
        assert_eq!(
            model.search_phase().await,
            SearchPhase::Settled { query: "new+value".to_string() }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_input_restarts_timer() {
        let catalog = Arc::new(MockCatalog::new());
        let (mut pipeline, _model) = pipeline(catalog.clone());

        pipeline.input("ab").await;
        wait(Duration::from_millis(500)).await;
        pipeline.input("abc").await;
        wait(Duration::from_millis(500)).await;
        // The first timer would have fired by now
        assert!(catalog.calls().is_empty());

        wait(Duration::from_millis(301)).await;
        assert_eq!(catalog.calls(), vec!["search:abc".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_settles_to_empty_and_logs_once() {
        let (logs, _guard) = capture::capture();
        let catalog = Arc::new(MockCatalog::new().with_search(Scripted::Fail));
        let (mut pipeline, model) = pipeline(catalog.clone());
        model
            .set_search_results("earlier".to_string(), results_with_song("old"))
            .await;

        pipeline.input("boom").await;
        wait(DEBOUNCE * 2).await;

        let state = model.get_search_state().await;
        assert_eq!(state.results, SearchResults::default());
        assert!(state.results.is_empty());
        assert_eq!(
            model.search_phase().await,
            SearchPhase::Settled { query: "boom".to_string() }
        );
        let errors: Vec<_> = logs
            .events()
            .into_iter()
            .filter(|e| e.level == tracing::Level::ERROR)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].fields.contains("catalog returned HTTP 503"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_data_settles_to_empty() {
        let catalog = Arc::new(MockCatalog::new().with_search(Scripted::Empty));
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.submit("nothing here").await;
        wait(Duration::from_millis(1)).await;

        assert_eq!(catalog.calls(), vec!["search:nothing+here".to_string()]);
        assert!(model.get_search_state().await.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_timer() {
        let catalog = Arc::new(MockCatalog::new());
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.input("later").await;
        wait(Duration::from_millis(100)).await;
        pipeline.dispose().await;
        wait(DEBOUNCE * 3).await;

        assert!(catalog.calls().is_empty());
        assert_eq!(model.search_phase().await, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_lets_inflight_request_finish() {
        let catalog = Arc::new(MockCatalog::new().with_search_for(
            "slow",
            Duration::from_millis(500),
            Scripted::Data(results_with_song("slow")),
        ));
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.submit("slow").await;
        wait(Duration::from_millis(10)).await;
        pipeline.dispose().await;
        wait(Duration::from_millis(600)).await;

        assert_eq!(model.get_search_state().await.results, results_with_song("slow"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_query_wins_over_slower_earlier_response() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_search_for(
                    "slow+one",
                    Duration::from_millis(1000),
                    Scripted::Data(results_with_song("slow")),
                )
                .with_search_for(
                    "fast",
                    Duration::from_millis(10),
                    Scripted::Data(results_with_song("fast")),
                ),
        );
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.submit("slow one").await;
        pipeline.submit("fast").await;
        wait(Duration::from_millis(2000)).await;

        // Both requests ran to completion
        assert_eq!(catalog.calls_to("search").len(), 2);
        let state = model.get_search_state().await;
        assert_eq!(state.query, "fast");
        assert_eq!(state.results, results_with_song("fast"));
        assert_eq!(
            model.search_phase().await,
            SearchPhase::Settled { query: "fast".to_string() }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_does_not_cancel_inflight_request() {
        let catalog = Arc::new(MockCatalog::new().with_search_for(
            "first",
            Duration::from_millis(300),
            Scripted::Data(results_with_song("first")),
        ));
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.submit("first").await;
        pipeline.input("second").await;
        wait(Duration::from_millis(400)).await;

        let state = model.get_search_state().await;
        assert_eq!(state.query, "first");
        assert!(matches!(model.search_phase().await, SearchPhase::Debouncing { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_leaves_current_page_alone() {
        let catalog = Arc::new(MockCatalog::new().with_search(Scripted::Data(results_with_song("hit"))));
        let (mut pipeline, model) = pipeline(catalog.clone());

        pipeline.input("jazz").await;
        model.push_view(ContentView::LibraryAlbums).await;
        model.push_view(ContentView::Queue).await;
        wait(Duration::from_millis(900)).await;

        assert_eq!(model.get_search_state().await.results, results_with_song("hit"));
        let content = model.get_content_state().await;
        assert_eq!(content.view, ContentView::Queue);
        assert_eq!(content.navigation_stack.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_results_page_is_refreshed() {
        let catalog = Arc::new(MockCatalog::new().with_search(Scripted::Data(results_with_song("hit"))));
        let (mut pipeline, model) = pipeline(catalog.clone());
        model.show_search_results().await;

        pipeline.submit("jazz").await;
        wait(Duration::from_millis(1)).await;

        assert_eq!(model.current_search_section().await, Some(SearchResultSection::Songs));
    }
}
