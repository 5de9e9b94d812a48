use chrono::Utc;
use jobscout_protocol::{dedup_records, JobRecord, SearchParams};
use jobscout_store::{QueryCache, SharedJobStore};
use jobscout_sources::Dispatcher;
use jobscout_vector_index::{index_text_for, Embedder, IndexMetadata, VectorIndex};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

/// One queued background refresh.
#[derive(Debug, Clone)]
pub struct RefreshJob {
    pub params: SearchParams,
}

/// Supervised background refresh queue.
///
/// A bounded channel feeds a fixed set of worker tasks; each job fans out
/// to every routed source, deduplicates the batch, upserts store and vector
/// index, and advances the cache timestamp. Failures are logged and leave
/// the cache entry unrefreshed; the next request simply re-evaluates
/// staleness. Duplicate triggers for one fingerprint are tolerated because
/// upserts are idempotent.
pub struct RefreshWorker {
    tx: mpsc::Sender<RefreshJob>,
    handles: Vec<JoinHandle<()>>,
}

impl RefreshWorker {
    pub fn spawn(
        dispatcher: Arc<Dispatcher>,
        store: SharedJobStore,
        cache: Arc<RwLock<QueryCache>>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        queue_depth: usize,
        workers: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<RefreshJob>(queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers.max(1))
            .map(|worker_id| {
                let rx = Arc::clone(&rx);
                let dispatcher = Arc::clone(&dispatcher);
                let store = Arc::clone(&store);
                let cache = Arc::clone(&cache);
                let index = Arc::clone(&index);
                let embedder = Arc::clone(&embedder);

                tokio::spawn(async move {
                    loop {
                        let job = { rx.lock().await.recv().await };
                        let Some(job) = job else {
                            log::debug!("Refresh worker {worker_id} stopping");
                            break;
                        };
                        run_refresh(&dispatcher, &store, &cache, index.as_ref(), embedder.as_ref(), job)
                            .await;
                    }
                })
            })
            .collect();

        Self { tx, handles }
    }

    /// Enqueue a refresh without blocking the read path. A full queue drops
    /// the trigger; the next stale request re-triggers.
    pub fn trigger(&self, job: RefreshJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Refresh queue full, dropping trigger: {err}");
                false
            }
        }
    }

    /// Drain queued refreshes and stop the workers.
    pub async fn shutdown(self) {
        drop(self.tx);
        for handle in self.handles {
            if let Err(err) = handle.await {
                log::error!("Refresh worker ended abnormally: {err}");
            }
        }
    }
}

/// Execute one refresh end to end. Never returns an error: every failure is
/// logged here because the request that triggered us has already returned.
async fn run_refresh(
    dispatcher: &Dispatcher,
    store: &SharedJobStore,
    cache: &RwLock<QueryCache>,
    index: &dyn VectorIndex,
    embedder: &dyn Embedder,
    job: RefreshJob,
) {
    let params = job.params;
    let term = params.search_term();
    let location = params.locations.first().cloned().unwrap_or_default();
    log::info!("Background refresh started: '{}' in {}", term, params.country);

    let raw = dispatcher
        .dispatch(&term, &location, params.page, &params.country)
        .await;
    if raw.is_empty() {
        log::info!("Background refresh for '{}': no jobs found", term);
        return;
    }

    let records: Vec<JobRecord> = raw
        .into_iter()
        .map(|r| JobRecord::from_normalized(r, &params.country))
        .collect();
    let batch = dedup_records(records);

    {
        let mut guard = store.write().await;
        guard.upsert_batch(batch.clone());
        if let Err(err) = guard.save().await {
            log::error!("Persisting refreshed records failed: {err}");
        }
    }

    let mut indexed = 0usize;
    for record in &batch {
        let embedding = match embedder.embed(&index_text_for(record)).await {
            Ok(vector) => vector,
            Err(err) => {
                log::warn!("Embedding failed for {}: {err}", record.id);
                continue;
            }
        };
        match index
            .upsert(&record.id, embedding, IndexMetadata::from_job(record))
            .await
        {
            Ok(()) => indexed += 1,
            Err(err) => log::warn!("Index upsert failed for {}: {err}", record.id),
        }
    }

    {
        let fingerprint = params.fingerprint();
        let mut guard = cache.write().await;
        guard.mark_refreshed(&fingerprint, &params, Utc::now());
        if let Err(err) = guard.save().await {
            log::error!("Persisting cache entry failed: {err}");
        }
    }

    log::info!(
        "Background refresh complete: {} records stored, {} indexed",
        batch.len(),
        indexed
    );
}
