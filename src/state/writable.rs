//! Observable snapshot container shared by every client store.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Listener<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

/// Handle returned by [`Writable::listen`], used to detach the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A snapshot waiting to be handed to the listeners registered when it was queued.
struct Delivery<T> {
    snapshot: Arc<T>,
    targets: Vec<(ListenerId, Listener<T>)>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<T>)>,
    pending: VecDeque<Delivery<T>>,
    delivering: bool,
}

impl<T> Registry<T> {
    fn is_registered(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Holds an immutable snapshot and publishes a fresh one on every mutation.
///
/// Async observers use [`subscribe`](Self::subscribe) or
/// [`stream`](Self::stream) and always see the latest snapshot. Synchronous
/// listeners registered with [`listen`](Self::listen) are called once with the
/// current snapshot and then once per committed change, in commit order.
///
/// Listeners run outside the commit lock and may call back into the store.
/// A change made from inside a listener is queued and delivered once the
/// running listener pass returns.
pub struct Writable<T> {
    sender: watch::Sender<Arc<T>>,
    registry: Mutex<Registry<T>>,
    commit_gate: Mutex<()>,
}

impl<T> Writable<T>
where
    T: Send + Sync + 'static,
{
    /// Create a store holding `initial`.
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(Arc::new(initial));
        Self {
            sender,
            registry: Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
                pending: VecDeque::new(),
                delivering: false,
            }),
            commit_gate: Mutex::new(()),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.sender.borrow())
    }

    /// Replace the snapshot with `value` and return it.
    pub fn set(&self, value: T) -> Arc<T> {
        self.update(move |_| value)
    }

    /// Derive the next snapshot from the current one and publish it.
    pub fn update<F>(&self, f: F) -> Arc<T>
    where
        F: FnOnce(&T) -> T,
    {
        self.commit_with(f, |_| ()).0
    }

    /// Like [`update`](Self::update), running `on_commit` with the new
    /// snapshot before any listener sees it.
    ///
    /// `f` and `on_commit` run under the commit lock and must not mutate this
    /// store.
    pub fn commit_with<F, C, R>(&self, f: F, on_commit: C) -> (Arc<T>, R)
    where
        F: FnOnce(&T) -> T,
        C: FnOnce(&Arc<T>) -> R,
    {
        let committed = {
            let _gate = lock(&self.commit_gate);
            let current = self.get();
            let next = Arc::new(f(current.as_ref()));
            self.sender.send_replace(Arc::clone(&next));
            let outcome = on_commit(&next);

            let mut registry = lock(&self.registry);
            let targets = registry.entries.clone();
            registry.pending.push_back(Delivery {
                snapshot: Arc::clone(&next),
                targets,
            });
            (next, outcome)
        };
        self.deliver();
        committed
    }

    /// Receiver that observes every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.sender.subscribe()
    }

    /// Stream yielding the current snapshot first, then each later one.
    pub fn stream(&self) -> WatchStream<Arc<T>> {
        WatchStream::new(self.subscribe())
    }

    /// Register a synchronous listener and call it with the current snapshot.
    ///
    /// When registered from inside another listener, the first call happens
    /// after that listener returns.
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let id = {
            let _gate = lock(&self.commit_gate);
            let listener: Listener<T> = Arc::new(listener);
            let mut registry = lock(&self.registry);
            let id = ListenerId(registry.next_id);
            registry.next_id += 1;
            registry.entries.push((id, Arc::clone(&listener)));
            registry.pending.push_back(Delivery {
                snapshot: self.get(),
                targets: vec![(id, listener)],
            });
            id
        };
        self.deliver();
        id
    }

    /// Detach a listener. Returns `false` when the id was not registered.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut registry = lock(&self.registry);
        let before = registry.entries.len();
        registry.entries.retain(|(entry, _)| *entry != id);
        registry.entries.len() != before
    }

    /// Drain queued deliveries unless another call is already draining them.
    fn deliver(&self) {
        {
            let mut registry = lock(&self.registry);
            if registry.delivering {
                return;
            }
            registry.delivering = true;
        }
        let _reset = DeliveryGuard(&self.registry);

        loop {
            let (snapshot, listeners) = {
                let mut registry = lock(&self.registry);
                let Some(Delivery { snapshot, targets }) = registry.pending.pop_front() else {
                    registry.delivering = false;
                    return;
                };
                let listeners: Vec<Listener<T>> = targets
                    .into_iter()
                    .filter(|(id, _)| registry.is_registered(*id))
                    .map(|(_, listener)| listener)
                    .collect();
                (snapshot, listeners)
            };
            for listener in listeners {
                listener(&snapshot);
            }
        }
    }
}

/// Releases the delivery flag when a listener panics mid-pass.
struct DeliveryGuard<'a, T>(&'a Mutex<Registry<T>>);

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        if thread::panicking() {
            lock(self.0).delivering = false;
        }
    }
}

impl<T> Default for Writable<T>
where
    T: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

fn lock<G>(mutex: &Mutex<G>) -> MutexGuard<'_, G> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
