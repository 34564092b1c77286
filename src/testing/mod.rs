//! In-memory fakes for the DOM and platform ports, used by unit tests.

mod dom;

pub use dom::{FakeDom, NodeId};

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::{ApiError, StorageError};
use crate::net::api::TaskApi;
use crate::net::types::ActionResponse;
use crate::platform::{Browser, PreferenceStore, Scheduler};

// =============================================================
// Storage
// =============================================================

/// Store that serves seeded values but rejects every write, like
/// `localStorage` over quota or in some private browsing modes.
#[derive(Default)]
pub struct FailingStore {
    values: Vec<(String, String)>,
    writes: Cell<usize>,
}

impl FailingStore {
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
            writes: Cell::new(0),
        }
    }

    /// Writes attempted so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl PreferenceStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        Err(StorageError::Write { key: key.to_owned(), reason: "QuotaExceededError".to_owned() })
    }
}

// =============================================================
// Browser
// =============================================================

pub struct FakeBrowser {
    path: RefCell<String>,
    cookies: RefCell<String>,
    width: Cell<f64>,
    reloads: Cell<usize>,
    alerts: RefCell<Vec<String>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

impl FakeBrowser {
    pub fn new(path: &str) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            path: RefCell::new(path.to_owned()),
            cookies: RefCell::new(String::new()),
            width: Cell::new(1280.0),
            reloads: Cell::new(0),
            alerts: RefCell::new(Vec::new()),
            pool: RefCell::new(pool),
            spawner,
        }
    }

    pub fn set_cookies(&self, cookies: &str) {
        *self.cookies.borrow_mut() = cookies.to_owned();
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }

    pub fn reloads(&self) -> usize {
        self.reloads.get()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    /// Drive spawned tasks until none can make progress.
    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl Browser for FakeBrowser {
    fn pathname(&self) -> String {
        self.path.borrow().clone()
    }

    fn cookies(&self) -> String {
        self.cookies.borrow().clone()
    }

    fn viewport_width(&self) -> f64 {
        self.width.get()
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(err) = self.spawner.spawn_local(task) {
            panic!("fake spawner rejected task: {err}");
        }
    }
}

// =============================================================
// Scheduler (virtual time)
// =============================================================

type Tick = Rc<RefCell<Box<dyn FnMut()>>>;

struct FakeTimer {
    id: u64,
    period: Duration,
    elapsed: Duration,
    tick: Tick,
}

#[derive(Default)]
struct Timers {
    next_id: u64,
    active: Vec<FakeTimer>,
}

#[derive(Clone, Default)]
pub struct FakeScheduler {
    timers: Rc<RefCell<Timers>>,
}

pub struct FakeTimerHandle {
    id: u64,
    timers: Rc<RefCell<Timers>>,
}

impl Drop for FakeTimerHandle {
    fn drop(&mut self) {
        self.timers.borrow_mut().active.retain(|t| t.id != self.id);
    }
}

impl FakeScheduler {
    pub fn active_count(&self) -> usize {
        self.timers.borrow().active.len()
    }

    pub fn periods(&self) -> Vec<Duration> {
        self.timers.borrow().active.iter().map(|t| t.period).collect()
    }

    /// Advance virtual time, firing every due tick.
    pub fn advance(&self, dt: Duration) {
        let due: Vec<(Tick, u128)> = {
            let mut timers = self.timers.borrow_mut();
            timers
                .active
                .iter_mut()
                .map(|timer| {
                    timer.elapsed += dt;
                    let fires = timer.elapsed.as_nanos() / timer.period.as_nanos();
                    let consumed = timer.period.as_nanos() * fires;
                    timer.elapsed = Duration::from_nanos(
                        u64::try_from(timer.elapsed.as_nanos() - consumed).unwrap_or_default(),
                    );
                    (Rc::clone(&timer.tick), fires)
                })
                .collect()
        };
        for (tick, fires) in due {
            for _ in 0..fires {
                let mut tick = tick.borrow_mut();
                (*tick)();
            }
        }
    }
}

impl Scheduler for FakeScheduler {
    type Handle = FakeTimerHandle;

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> FakeTimerHandle {
        let mut timers = self.timers.borrow_mut();
        timers.next_id += 1;
        let id = timers.next_id;
        timers.active.push(FakeTimer { id, period, elapsed: Duration::ZERO, tick: Rc::new(RefCell::new(tick)) });
        FakeTimerHandle { id, timers: Rc::clone(&self.timers) }
    }
}

// =============================================================
// Task API (gated responses)
// =============================================================

type Reply = oneshot::Sender<Result<ActionResponse, ApiError>>;

pub struct ApiCall {
    pub url: String,
    pub csrf_token: Option<String>,
    reply: Option<Reply>,
}

/// Each POST waits until the test resolves it with [`FakeApi::resolve`].
#[derive(Default)]
pub struct FakeApi {
    calls: RefCell<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn call(&self, index: usize) -> (String, Option<String>) {
        let calls = self.calls.borrow();
        let call = &calls[index];
        (call.url.clone(), call.csrf_token.clone())
    }

    pub fn resolve(&self, index: usize, result: Result<ActionResponse, ApiError>) {
        let reply = self.calls.borrow_mut()[index].reply.take();
        match reply {
            Some(tx) => {
                if tx.send(result).is_err() {
                    panic!("request {index} was abandoned");
                }
            }
            None => panic!("request {index} already resolved"),
        }
    }
}

impl TaskApi for FakeApi {
    fn post_action(&self, url: &str, csrf_token: Option<&str>) -> impl Future<Output = Result<ActionResponse, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.calls.borrow_mut().push(ApiCall {
            url: url.to_owned(),
            csrf_token: csrf_token.map(str::to_owned),
            reply: Some(tx),
        });
        async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Transport("request dropped".to_owned())),
            }
        }
    }
}
