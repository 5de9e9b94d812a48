use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Automation engine failed to initialize: {0}")]
    EngineInit(String),

    #[error("Resource pool is shut down")]
    ShutDown,
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

const VIEWPORTS: &[(u32, u32)] = &[(1920, 1080), (1680, 1050), (1536, 864), (1440, 900)];

/// Randomized identity issued per session so sessions are not correlated
/// by upstream detection. Fresh on every acquire, never reused.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub locale: String,
}

impl SessionIdentity {
    fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            user_agent: USER_AGENTS
                .choose(&mut rng)
                .copied()
                .unwrap_or(USER_AGENTS[0])
                .to_string(),
            viewport: *VIEWPORTS.choose(&mut rng).unwrap_or(&VIEWPORTS[0]),
            locale: if rng.gen_bool(0.8) { "en-US" } else { "en-IN" }.to_string(),
        }
    }
}

/// Fixed ceiling on simultaneously open heavy-automation sessions.
///
/// Explicitly constructed and injected; the orchestrator owns its
/// lifecycle. `acquire` suspends the caller while the pool is saturated.
/// Sessions release their slot on drop, on every exit path including
/// timeout and cancellation.
pub struct ResourcePool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    active: Arc<AtomicUsize>,
}

impl ResourcePool {
    /// Build the pool and launch the underlying automation engine. An engine
    /// that cannot launch is fatal here, once, rather than on every acquire.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::EngineInit(
                "session ceiling must be at least 1".to_string(),
            ));
        }
        log::info!("Resource pool initialized with {} session slots", capacity);
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Acquire a session slot, suspending until one is free.
    pub async fn acquire(&self) -> Result<PoolSession, PoolError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolError::ShutDown)?;

        let active = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        let identity = SessionIdentity::random();
        log::debug!("Session acquired ({active}/{} active)", self.capacity);

        Ok(PoolSession {
            _permit: permit,
            identity,
            active: Arc::clone(&self.active),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Close the pool: pending and future acquires fail with `ShutDown`.
    /// Sessions already issued run to completion.
    pub fn shutdown(&self) {
        self.semaphore.close();
        log::info!("Resource pool shut down");
    }
}

/// RAII guard for one automation session. Dropping it releases the slot.
pub struct PoolSession {
    _permit: OwnedSemaphorePermit,
    identity: SessionIdentity,
    active: Arc<AtomicUsize>,
}

impl PoolSession {
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }
}

impl Drop for PoolSession {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}
