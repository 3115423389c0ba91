use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

/// One-shot notifications fired on the 0↔1 edges of the shared counter.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SubsystemEvent {
    /// The first shared context came up.
    Initialized,
    /// The last shared context is going away.
    ShuttingDown,
}

type Listener = Arc<dyn Fn(SubsystemEvent) + Send + Sync>;

/// Proof of participation returned by [`SharedContextRegistry::acquire`].
///
/// Hand it back to [`SharedContextRegistry::release`] exactly once.
#[must_use = "a dropped token leaks a shared-context reference"]
#[derive(Debug)]
pub struct RegistryToken {
    shared: bool,
    opened_namespace: bool,
}

impl RegistryToken {
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// `true` for the acquisition that initialized the shared namespace.
    pub fn opened_namespace(&self) -> bool {
        self.opened_namespace
    }
}

/// Counts live shared contexts and fires the subsystem edges.
///
/// Counter updates are plain atomic increments/decrements. Only a caller
/// that moved the counter off or onto zero goes on to reconcile the flag
/// with the counter, via a compare-and-set, so exactly one caller observes
/// each edge even when widgets are torn down concurrently.
///
/// Edges are reported against the flag, not every zero crossing: a release
/// to zero that races an acquire from zero may coalesce into no events at
/// all, with the namespace staying initialized. Events always alternate,
/// starting with `Initialized`.
pub struct SharedContextRegistry {
    live: AtomicUsize,
    initialized: AtomicBool,
    // Held only across a 0↔1 reconciliation. A release to zero racing an
    // acquire from zero would otherwise leave the flag out of step with
    // the counter, or deliver the two edges out of order.
    edge: Mutex<()>,
    listeners: RwLock<Vec<Listener>>,
}

impl SharedContextRegistry {
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
            edge: Mutex::new(()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Registers a listener for subsystem edges. Listeners run synchronously
    /// on the thread that crossed the edge, in registration order. They must
    /// not call `acquire` or `release` on the same registry.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(SubsystemEvent) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn acquire(&self, shared: bool) -> RegistryToken {
        if !shared {
            return RegistryToken {
                shared: false,
                opened_namespace: false,
            };
        }

        let previous = self.live.fetch_add(1, Ordering::AcqRel);
        let opened_namespace =
            previous == 0 && self.reconcile() == Some(SubsystemEvent::Initialized);

        RegistryToken {
            shared: true,
            opened_namespace,
        }
    }

    pub fn release(&self, token: RegistryToken) {
        if !token.shared {
            return;
        }

        let previous = self.live.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "shared-context counter underflow");

        if previous == 1 {
            self.reconcile();
        }
    }

    pub fn live_shared_count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub fn is_namespace_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Brings the flag in line with the counter and fires the edge crossed,
    /// if any.
    fn reconcile(&self) -> Option<SubsystemEvent> {
        let _edge = self.edge.lock().unwrap_or_else(PoisonError::into_inner);

        let live = self.live.load(Ordering::Acquire) > 0;
        self.initialized
            .compare_exchange(!live, live, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        let event = if live {
            log::debug!("shared GL namespace initialized");
            SubsystemEvent::Initialized
        } else {
            log::debug!("shared GL namespace shutting down");
            SubsystemEvent::ShuttingDown
        };
        self.notify(event);
        Some(event)
    }

    fn notify(&self, event: SubsystemEvent) {
        // Snapshot so listeners may subscribe without deadlocking.
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for SharedContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedContextRegistry")
            .field("live", &self.live_shared_count())
            .field("initialized", &self.is_namespace_initialized())
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<Arc<SharedContextRegistry>> =
    LazyLock::new(|| Arc::new(SharedContextRegistry::new()));

/// The process-wide registry widgets use unless given another one.
pub fn global_registry() -> Arc<SharedContextRegistry> {
    Arc::clone(&GLOBAL)
}
