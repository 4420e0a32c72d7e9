//! Container conference: the fan-out/fan-in point of the system
//!
//! Producers `send` containers into a delivery buffer; a distribution loop
//! drains it with snapshot-then-clear. Containers arriving from remote
//! participants and containers produced locally are funneled through the
//! same receive path, so downstream consumers cannot tell them apart.

use std::sync::{Arc, Mutex};

use crate::data::{Container, Timestamp};

/// Subscribed consumer of distributed containers
pub trait ContainerListener: Send {
    /// Called once per distributed container
    fn next_container(&mut self, container: Container);
}

type SharedListener = Arc<Mutex<Box<dyn ContainerListener>>>;

#[derive(Default)]
struct Inner {
    delivery: Vec<Container>,
    snapshot_len: usize,
    listeners: Vec<SharedListener>,
}

/// A single logical bus for containers.
///
/// The delivery buffer is the one shared mutable resource of the core; all
/// access goes through an internal lock so `send` may be called from any
/// thread while a distribution loop drains. No backpressure is imposed: an
/// undrained buffer grows until the caller bounds it.
#[derive(Default)]
pub struct Conference {
    inner: Mutex<Inner>,
}

impl Conference {
    /// Create a conference with no listeners and an empty delivery buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a container for distribution.
    ///
    /// The sent timestamp is always assigned fresh here, overwriting any
    /// caller-supplied value; an unset sample timestamp is set equal to it.
    /// Never blocks beyond the internal lock and never fails short of
    /// allocation failure.
    pub fn send(&self, mut container: Container) {
        container.set_sent_timestamp(Timestamp::now());
        if container.sample_timestamp().is_zero() {
            container.set_sample_timestamp(container.sent_timestamp());
        }

        self.lock().delivery.push(container);
    }

    /// Snapshot copy of the current delivery buffer.
    ///
    /// A copy, not a live view: a concurrent `send` cannot corrupt an
    /// in-progress read. The snapshot extent is remembered so a following
    /// [`Conference::clear_list_of_containers`] removes exactly the
    /// containers that were handed out.
    #[must_use]
    pub fn list_of_containers(&self) -> Vec<Container> {
        let mut inner = self.lock();
        inner.snapshot_len = inner.delivery.len();
        inner.delivery.clone()
    }

    /// Remove the containers covered by the last snapshot.
    ///
    /// Containers sent after that snapshot stay queued for the next drain
    /// cycle, so every container appears in exactly one drained snapshot.
    pub fn clear_list_of_containers(&self) {
        let mut inner = self.lock();
        let covered = inner.snapshot_len;
        inner.delivery.drain(..covered);
        inner.snapshot_len = 0;
    }

    /// Subscribe a listener to distributed containers
    pub fn add_listener(&self, listener: Box<dyn ContainerListener>) {
        self.lock().listeners.push(Arc::new(Mutex::new(listener)));
    }

    /// Funnel a locally produced container through the same receive path
    /// used for remotely arriving containers.
    pub fn receive_from_local(&self, container: Container) {
        self.receive(container);
    }

    /// Distribute one arriving container to every listener.
    ///
    /// The subscriber set is snapshotted so callbacks run without the
    /// conference lock held; a listener may call back into the conference
    /// (for example to `send` a derived container).
    pub fn receive(&self, container: Container) {
        let listeners: Vec<SharedListener> = self.lock().listeners.clone();
        for listener in listeners {
            listener
                .lock()
                .expect("listener mutex poisoned")
                .next_container(container.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("conference mutex poisoned")
    }
}
