//! Single-flight cancellable fetch.
//!
//! A [`Fetcher`] owns at most one outstanding request. Issuing a new one
//! (via [`set_url`](Fetcher::set_url) or [`refetch`](Fetcher::refetch))
//! aborts the previous request before starting; its completion, if it still
//! arrives, is recognized by generation and discarded. That is the whole
//! race-avoidance story: last writer wins by cancellation, not by
//! comparing timestamps.
//!
//! Transports run wherever they like (the bundled [`HttpTransport`] spawns
//! a worker thread per request) and report back through a completion
//! channel; [`pump`](Fetcher::pump) drains it on the reactive thread, which
//! is the only place state changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;

use picot_core::{Dispose, Signal, current_scope, signal};
use serde_json::Value;

use crate::error::FetchError;

pub type RequestId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Cloneable view of a request's abort flag. Transports should poll it at
/// convenient points and give up early when it trips.
#[derive(Clone)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Completion {
    generation: RequestId,
    result: Result<Value, FetchError>,
}

/// Everything a transport needs to serve one request.
pub struct TransportRequest {
    pub url: String,
    abort: AbortSignal,
    generation: RequestId,
    done: Sender<Completion>,
}

impl TransportRequest {
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    /// Reports the outcome. The owning fetcher may have moved on; a stale
    /// or unwanted completion is simply dropped on the other side.
    pub fn complete(self, result: Result<Value, FetchError>) {
        let _ = self.done.send(Completion {
            generation: self.generation,
            result,
        });
    }
}

pub trait Transport {
    fn start(&self, request: TransportRequest);
}

struct Inflight {
    generation: RequestId,
    abort: Arc<AtomicBool>,
}

struct FetchState {
    transport: Rc<dyn Transport>,
    url: RefCell<Option<String>>,
    data: Signal<Option<Value>>,
    status: Signal<FetchStatus>,
    error: Signal<Option<FetchError>>,
    inflight: RefCell<Option<Inflight>>,
    generation: Cell<RequestId>,
    completions: Receiver<Completion>,
    completion_tx: Sender<Completion>,
}

/// Owner-scoped fetch state machine: `Idle → Loading → (Success | Error)`.
#[derive(Clone)]
pub struct Fetcher {
    state: Rc<FetchState>,
}

impl Fetcher {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_transport(Rc::new(transport))
    }

    pub fn with_transport(transport: Rc<dyn Transport>) -> Self {
        let (tx, rx) = channel();
        let fetcher = Self {
            state: Rc::new(FetchState {
                transport,
                url: RefCell::new(None),
                data: signal(None),
                status: signal(FetchStatus::Idle),
                error: signal(None),
                inflight: RefCell::new(None),
                generation: Cell::new(0),
                completions: rx,
                completion_tx: tx,
            }),
        };

        if let Some(scope) = current_scope() {
            let state = fetcher.state.clone();
            scope.add_disposer(Dispose::new(move || abort_inflight(&state)));
        }
        fetcher
    }

    pub fn data(&self) -> Signal<Option<Value>> {
        self.state.data.clone()
    }

    pub fn status(&self) -> Signal<FetchStatus> {
        self.state.status.clone()
    }

    pub fn error(&self) -> Signal<Option<FetchError>> {
        self.state.error.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.status.get() == FetchStatus::Loading
    }

    pub fn url(&self) -> Option<String> {
        self.state.url.borrow().clone()
    }

    /// Points the fetcher at a new url.
    ///
    /// A different url cancels outstanding work and starts a fresh cycle;
    /// `None` cancels and parks the fetcher at `Idle`. Setting the url it
    /// already has is a no-op (use [`refetch`](Fetcher::refetch) to re-run).
    pub fn set_url(&self, url: Option<String>) {
        if *self.state.url.borrow() == url {
            return;
        }
        *self.state.url.borrow_mut() = url.clone();
        match url {
            Some(_) => {
                self.issue();
            }
            None => {
                abort_inflight(&self.state);
            }
        }
    }

    /// Re-runs the fetch cycle for the current url. Returns the generation
    /// of the issued request, or `None` when there is no url to fetch.
    pub fn refetch(&self) -> Option<RequestId> {
        if self.state.url.borrow().is_none() {
            return None;
        }
        Some(self.issue())
    }

    /// Aborts outstanding work without issuing anything new. Not an error:
    /// `error` is left untouched, `loading` clears.
    pub fn cancel(&self) {
        abort_inflight(&self.state);
    }

    /// Drains completions on the reactive thread and applies the one that
    /// belongs to the current request, if any. Everything stale or aborted
    /// is discarded.
    pub fn pump(&self) {
        while let Ok(completion) = self.state.completions.try_recv() {
            self.apply(completion);
        }
    }

    fn issue(&self) -> RequestId {
        // superseding keeps the fetcher visibly busy; status subscribers
        // must not see an Idle blip between back-to-back requests
        abort_and_forget(&self.state);

        let url = self
            .state
            .url
            .borrow()
            .clone()
            .unwrap_or_default();
        let generation = self.state.generation.get() + 1;
        self.state.generation.set(generation);

        let abort = Arc::new(AtomicBool::new(false));
        *self.state.inflight.borrow_mut() = Some(Inflight {
            generation,
            abort: abort.clone(),
        });
        self.state.status.set(FetchStatus::Loading);
        self.state.error.set(None);

        log::debug!("fetch #{generation}: GET {url}");
        self.state.transport.start(TransportRequest {
            url,
            abort: AbortSignal(abort),
            generation,
            done: self.state.completion_tx.clone(),
        });
        generation
    }

    fn apply(&self, completion: Completion) {
        let current = self
            .state
            .inflight
            .borrow()
            .as_ref()
            .map(|i| (i.generation, i.abort.load(Ordering::SeqCst)));
        let Some((generation, aborted)) = current else {
            // nothing outstanding: a late completion from a cancelled cycle
            return;
        };
        if completion.generation != generation {
            log::debug!(
                "fetch #{}: superseded by #{generation}, discarding",
                completion.generation
            );
            return;
        }
        self.state.inflight.borrow_mut().take();

        if aborted || matches!(completion.result, Err(FetchError::Aborted)) {
            // cancellation is a control action, not a failure
            if self.state.status.get() == FetchStatus::Loading {
                self.state.status.set(FetchStatus::Idle);
            }
            return;
        }
        match completion.result {
            Ok(value) => {
                self.state.data.set(Some(value));
                self.state.error.set(None);
                self.state.status.set(FetchStatus::Success);
            }
            Err(err) => {
                log::debug!("fetch #{generation}: {err}");
                self.state.error.set(Some(err));
                self.state.status.set(FetchStatus::Error);
            }
        }
    }
}

/// Flags and forgets the outstanding request without touching status.
fn abort_and_forget(state: &FetchState) -> bool {
    match state.inflight.borrow_mut().take() {
        Some(inflight) => {
            inflight.abort.store(true, Ordering::SeqCst);
            true
        }
        None => false,
    }
}

/// A fresh cancellation: abort and settle back at `Idle`.
fn abort_inflight(state: &FetchState) {
    if abort_and_forget(state) && state.status.get() == FetchStatus::Loading {
        state.status.set(FetchStatus::Idle);
    }
}

/// Blocking-reqwest transport; each request runs on its own worker thread.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn start(&self, request: TransportRequest) {
        let client = self.client.clone();
        std::thread::spawn(move || {
            if request.abort_signal().aborted() {
                request.complete(Err(FetchError::Aborted));
                return;
            }
            let outcome = perform(&client, &request.url);
            request.complete(outcome);
        });
    }
}

fn perform(client: &reqwest::blocking::Client, url: &str) -> Result<Value, FetchError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            code: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        });
    }
    response
        .json::<Value>()
        .map_err(|e| FetchError::Decode(e.to_string()))
}
