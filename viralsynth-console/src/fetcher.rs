//! Collection fetcher
//!
//! Per-view read path: one network call per distinct [`QueryDescriptor`],
//! concurrent identical loads share that call, and a response is applied
//! only if its request is still the newest one for the view.
//!
//! The bookkeeping lives in [`FetchSlot`], a plain state machine with no
//! I/O, so the ordering rules are testable without a backend.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use viralsynth_common::{FetchError, QueryDescriptor};

use crate::client::BackendClient;

/// Outcome of one network call, shareable across joined callers
pub type FetchOutcome<T> = Result<Arc<Vec<T>>, FetchError>;

/// What the presentation layer sees for a view
#[derive(Debug)]
pub enum FetchState<T> {
    Loading,
    Failed(FetchError),
    Ready(Arc<Vec<T>>),
}

// Manual impl: `T` itself does not need to be Clone behind the Arc
impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        match self {
            FetchState::Loading => FetchState::Loading,
            FetchState::Failed(e) => FetchState::Failed(e.clone()),
            FetchState::Ready(data) => FetchState::Ready(Arc::clone(data)),
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&Arc<Vec<T>>> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Identity of one issued request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub descriptor: QueryDescriptor,
    pub generation: u64,
}

/// Per-view fetch bookkeeping
#[derive(Debug)]
pub struct FetchSlot<T> {
    current: Option<QueryDescriptor>,
    generation: u64,
    state: FetchState<T>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self {
            current: None,
            generation: 0,
            state: FetchState::Loading,
        }
    }

    /// Register intent to show `descriptor`
    ///
    /// Returns a ticket when a request has to be issued: the descriptor
    /// changed, or `force` asks for an explicit re-fetch. An unchanged
    /// descriptor returns `None` and keeps the current state.
    pub fn begin(&mut self, descriptor: &QueryDescriptor, force: bool) -> Option<FetchTicket> {
        if !force && self.current.as_ref() == Some(descriptor) {
            return None;
        }

        self.generation += 1;
        self.current = Some(descriptor.clone());
        self.state = FetchState::Loading;

        Some(FetchTicket {
            descriptor: descriptor.clone(),
            generation: self.generation,
        })
    }

    /// Apply the outcome of `ticket`'s request
    ///
    /// Returns `false` (and changes nothing) when a newer request has been
    /// issued since; superseded responses are dropped, never applied.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: FetchOutcome<T>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                endpoint = %ticket.descriptor.endpoint,
                stale = ticket.generation,
                current = self.generation,
                "Discarding superseded response"
            );
            return false;
        }

        self.state = match outcome {
            Ok(data) => FetchState::Ready(data),
            Err(e) => FetchState::Failed(e),
        };
        true
    }

    pub fn current(&self) -> Option<&QueryDescriptor> {
        self.current.as_ref()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;
type InFlight<T> = Arc<Mutex<HashMap<QueryDescriptor, (u64, SharedFetch<T>)>>>;

/// Fetcher for one view over one backend collection
///
/// An issued request is driven to completion on its own task, so a caller
/// that goes away mid-load never leaves the view stuck in `Loading`.
pub struct CollectionFetcher<T> {
    client: BackendClient,
    slot: Arc<RwLock<FetchSlot<T>>>,
    in_flight: InFlight<T>,
    next_call_id: AtomicU64,
}

impl<T> CollectionFetcher<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            slot: Arc::new(RwLock::new(FetchSlot::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_call_id: AtomicU64::new(0),
        }
    }

    /// Show `descriptor`, fetching only if it differs from the current one
    pub async fn load(&self, descriptor: QueryDescriptor) -> FetchState<T> {
        self.run(descriptor, false).await
    }

    /// Show `descriptor`, fetching even if it is already current
    pub async fn reload(&self, descriptor: QueryDescriptor) -> FetchState<T> {
        self.run(descriptor, true).await
    }

    /// Re-issue the current descriptor (retry, or reapplied identical filters)
    ///
    /// Returns `None` when nothing has been loaded yet.
    pub async fn refresh(&self) -> Option<FetchState<T>> {
        let descriptor = self.slot.read().await.current().cloned()?;
        Some(self.run(descriptor, true).await)
    }

    /// Current descriptor and state, without touching the network
    pub async fn snapshot(&self) -> Option<(QueryDescriptor, FetchState<T>)> {
        let slot = self.slot.read().await;
        slot.current()
            .cloned()
            .map(|descriptor| (descriptor, slot.state().clone()))
    }

    async fn run(&self, descriptor: QueryDescriptor, force: bool) -> FetchState<T> {
        // The slot lock is held until the call is registered in `in_flight`,
        // so a `Loading` slot always has a request to join.
        let pending = {
            let mut slot = self.slot.write().await;
            let mut ticket = slot.begin(&descriptor, force);

            let mut joined = None;
            if ticket.is_none() {
                joined = self
                    .in_flight
                    .lock()
                    .await
                    .get(&descriptor)
                    .map(|(_, call)| call.clone().boxed());
                // Loading with nothing in flight: the issuing caller was dropped
                // before its request started
                if joined.is_none() && slot.state().is_loading() {
                    ticket = slot.begin(&descriptor, true);
                }
            }

            match ticket {
                Some(ticket) => {
                    let (call_id, call) = self.join_or_start(&descriptor).await;
                    Some(self.spawn_completion(ticket, call_id, call))
                }
                None => joined,
            }
        };

        let outcome = match pending {
            Some(pending) => Some(pending.await),
            None => None,
        };

        // A newer descriptor owns the slot now; never hand back its data
        let slot = self.slot.read().await;
        if slot.current() != Some(&descriptor) {
            return FetchState::Loading;
        }
        match outcome {
            Some(Ok(data)) => FetchState::Ready(data),
            Some(Err(e)) => FetchState::Failed(e),
            None => slot.state().clone(),
        }
    }

    /// Await `call` on a detached task that applies the outcome to the slot
    fn spawn_completion(
        &self,
        ticket: FetchTicket,
        call_id: u64,
        call: SharedFetch<T>,
    ) -> BoxFuture<'static, FetchOutcome<T>> {
        let slot = Arc::clone(&self.slot);
        let in_flight = Arc::clone(&self.in_flight);

        let handle = tokio::spawn(async move {
            let outcome = call.await;
            slot.write().await.complete(&ticket, outcome.clone());
            let mut in_flight = in_flight.lock().await;
            if matches!(in_flight.get(&ticket.descriptor), Some((id, _)) if *id == call_id) {
                in_flight.remove(&ticket.descriptor);
            }
            outcome
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "Fetch task ended abnormally");
                Err(FetchError::Transport(e.to_string()))
            })
        }
        .boxed()
    }

    /// Shared future for `descriptor`, starting a network call only if none is in flight
    async fn join_or_start(&self, descriptor: &QueryDescriptor) -> (u64, SharedFetch<T>) {
        let mut in_flight = self.in_flight.lock().await;

        if let Some((call_id, call)) = in_flight.get(descriptor) {
            debug!(endpoint = %descriptor.endpoint, "Joining in-flight request");
            return (*call_id, call.clone());
        }

        let call_id = self.next_call_id.fetch_add(1, Ordering::Relaxed);
        let client = self.client.clone();
        let owned = descriptor.clone();
        let call = async move {
            let result = client.fetch_collection::<T>(&owned).await.map(Arc::new);
            match &result {
                Ok(items) => info!(endpoint = %owned.endpoint, count = items.len(), "Collection loaded"),
                Err(e) => info!(endpoint = %owned.endpoint, error = %e, "Collection load failed"),
            }
            result
        }
        .boxed()
        .shared();

        in_flight.insert(descriptor.clone(), (call_id, call.clone()));
        (call_id, call)
    }
}
