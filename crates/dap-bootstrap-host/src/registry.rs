//! Host-side registry of debug adapter factories.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, Weak},
};

use dap_bootstrap_core::{
    AdapterDescriptor, AdapterExecutable, DebugSession, DescriptorError, DescriptorFactory,
    SessionConfiguration, TrackerFactory,
};

use crate::SessionHandle;

/// Debug type matching every session, for tracker factories.
pub const ANY_DEBUG_TYPE: &str = "*";

/// Registry error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Descriptor factory already registered for debug type: {0}")]
    AlreadyRegistered(String),
    #[error("No debug adapter available for debug type: {0}")]
    NoAdapter(String),
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("Registry lock poisoned")]
    Poisoned,
}

type RegistrationId = u64;

#[derive(Default)]
struct Inner {
    next_id: RegistrationId,
    trackers: HashMap<String, Vec<(RegistrationId, Arc<dyn TrackerFactory>)>>,
    descriptors: HashMap<String, (RegistrationId, Arc<dyn DescriptorFactory>)>,
}

impl Inner {
    fn allocate_id(&mut self) -> RegistrationId {
        self.next_id += 1;
        self.next_id
    }

    fn tracker_factories(&self, debug_type: &str) -> Vec<Arc<dyn TrackerFactory>> {
        let exact = self.trackers.get(debug_type).into_iter().flatten();
        let any = self
            .trackers
            .get(ANY_DEBUG_TYPE)
            .filter(|_| debug_type != ANY_DEBUG_TYPE)
            .into_iter()
            .flatten();

        exact
            .chain(any)
            .map(|(_, factory)| Arc::clone(factory))
            .collect()
    }

    fn descriptor_factory(&self, debug_type: &str) -> Option<Arc<dyn DescriptorFactory>> {
        self.descriptors
            .get(debug_type)
            .map(|(_, factory)| Arc::clone(factory))
    }
}

/// Table of tracker and descriptor factories keyed by debug type.
///
/// Cloning yields another handle to the same table.
#[derive(Clone, Default)]
pub struct DebugRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl DebugRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tracker factory for `debug_type`.
    ///
    /// Any number of tracker factories may share a debug type. Use
    /// [`ANY_DEBUG_TYPE`] to track every session.
    ///
    /// # Errors
    /// Returns error if the registry lock is poisoned.
    pub fn register_tracker_factory(
        &self,
        debug_type: impl Into<String>,
        factory: Arc<dyn TrackerFactory>,
    ) -> Result<Registration, RegistryError> {
        let debug_type = debug_type.into();
        let mut inner = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        let id = inner.allocate_id();
        inner
            .trackers
            .entry(debug_type.clone())
            .or_default()
            .push((id, factory));

        tracing::debug!(%debug_type, id, "Registered debug adapter tracker factory");
        Ok(self.registration(RegistrationKind::Tracker, debug_type, id))
    }

    /// Register the descriptor factory for `debug_type`.
    ///
    /// # Errors
    /// Returns error if a descriptor factory is already registered for the
    /// debug type, or if the registry lock is poisoned.
    pub fn register_descriptor_factory(
        &self,
        debug_type: impl Into<String>,
        factory: Arc<dyn DescriptorFactory>,
    ) -> Result<Registration, RegistryError> {
        let debug_type = debug_type.into();
        let mut inner = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        if inner.descriptors.contains_key(&debug_type) {
            return Err(RegistryError::AlreadyRegistered(debug_type));
        }
        let id = inner.allocate_id();
        inner.descriptors.insert(debug_type.clone(), (id, factory));

        tracing::debug!(%debug_type, id, "Registered debug adapter descriptor factory");
        Ok(self.registration(RegistrationKind::Descriptor, debug_type, id))
    }

    fn registration(
        &self,
        kind: RegistrationKind,
        debug_type: String,
        id: RegistrationId,
    ) -> Registration {
        Registration {
            registry: Arc::downgrade(&self.inner),
            kind,
            debug_type,
            id,
            disposed: false,
        }
    }

    /// Start a debug session.
    ///
    /// The descriptor is resolved first, through the registered descriptor
    /// factory or else from `default_executable`. Trackers are created only
    /// once the session has an adapter.
    ///
    /// # Errors
    /// Returns error if no adapter can be resolved for the session.
    pub async fn start_session(
        &self,
        name: impl Into<String>,
        debug_type: impl Into<String>,
        configuration: SessionConfiguration,
        default_executable: Option<AdapterExecutable>,
    ) -> Result<SessionHandle, RegistryError> {
        let session = DebugSession::new(name, debug_type, configuration);

        let (descriptor_factory, tracker_factories) = {
            let inner = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
            (
                inner.descriptor_factory(&session.debug_type),
                inner.tracker_factories(&session.debug_type),
            )
        };

        let descriptor = match descriptor_factory {
            Some(factory) => factory.create_descriptor(&session, default_executable).await?,
            None => default_executable
                .map(AdapterDescriptor::Executable)
                .ok_or_else(|| RegistryError::NoAdapter(session.debug_type.clone()))?,
        };

        let trackers = tracker_factories
            .iter()
            .map(|factory| factory.create_tracker(&session))
            .collect();

        tracing::info!(
            session = %session.id,
            debug_type = %session.debug_type,
            %descriptor,
            "Debug session started"
        );
        Ok(SessionHandle::new(session, descriptor, trackers))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistrationKind {
    Tracker,
    Descriptor,
}

/// Handle to one factory registration.
///
/// Dropping the handle keeps the factory registered; call
/// [`Registration::dispose`] to remove it.
#[derive(Debug)]
pub struct Registration {
    registry: Weak<RwLock<Inner>>,
    kind: RegistrationKind,
    debug_type: String,
    id: RegistrationId,
    disposed: bool,
}

impl Registration {
    /// Debug type this registration is for.
    #[must_use]
    pub fn debug_type(&self) -> &str {
        &self.debug_type
    }

    /// Whether `dispose` has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Remove the factory from the registry.
    ///
    /// Descriptor factories get their `dispose` hook called. Disposing twice
    /// does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let removed_descriptor = {
            let Ok(mut guard) = registry.write() else {
                tracing::warn!(
                    debug_type = %self.debug_type,
                    "Registry lock poisoned, registration not removed"
                );
                return;
            };
            let inner = &mut *guard;

            match self.kind {
                RegistrationKind::Tracker => {
                    if let Some(entries) = inner.trackers.get_mut(&self.debug_type) {
                        entries.retain(|(id, _)| *id != self.id);
                        if entries.is_empty() {
                            inner.trackers.remove(&self.debug_type);
                        }
                    }
                    None
                }
                RegistrationKind::Descriptor => {
                    let owned = inner
                        .descriptors
                        .get(&self.debug_type)
                        .is_some_and(|(id, _)| *id == self.id);
                    if owned {
                        inner
                            .descriptors
                            .remove(&self.debug_type)
                            .map(|(_, factory)| factory)
                    } else {
                        None
                    }
                }
            }
        };

        if let Some(factory) = removed_descriptor {
            factory.dispose();
        }
        tracing::debug!(debug_type = %self.debug_type, kind = ?self.kind, "Registration disposed");
    }
}

/// Registrations made at activation, disposed together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    registrations: Vec<Registration>,
}

impl Subscriptions {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a registration.
    pub fn push(&mut self, registration: Registration) {
        self.registrations.push(registration);
    }

    /// Number of tracked registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no registrations are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Dispose every registration, most recent first.
    pub fn dispose_all(&mut self) {
        while let Some(mut registration) = self.registrations.pop() {
            registration.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use dap_bootstrap_core::{AdapterServer, DebugAdapterTracker};

    use super::*;

    struct NoopTracker;

    impl DebugAdapterTracker for NoopTracker {}

    #[derive(Default)]
    struct CountingTrackerFactory {
        created: AtomicUsize,
    }

    impl TrackerFactory for CountingTrackerFactory {
        fn create_tracker(&self, _session: &DebugSession) -> Box<dyn DebugAdapterTracker> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Box::new(NoopTracker)
        }
    }

    #[derive(Default)]
    struct FixedDescriptorFactory {
        disposed: AtomicUsize,
    }

    #[async_trait]
    impl DescriptorFactory for FixedDescriptorFactory {
        async fn create_descriptor(
            &self,
            _session: &DebugSession,
            _executable: Option<AdapterExecutable>,
        ) -> Result<AdapterDescriptor, DescriptorError> {
            Ok(AdapterServer::new(9000).into())
        }

        fn dispose(&self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_default_executable() {
        let registry = DebugRegistry::new();
        let executable = AdapterExecutable::new("adapter");

        let handle = registry
            .start_session(
                "s",
                "probe_rs",
                SessionConfiguration::launch(),
                Some(executable.clone()),
            )
            .await
            .unwrap();

        assert_eq!(handle.descriptor(), &AdapterDescriptor::Executable(executable));
        assert_eq!(handle.tracker_count(), 0);
    }

    #[tokio::test]
    async fn test_no_adapter() {
        let registry = DebugRegistry::new();
        let result = registry
            .start_session("s", "probe_rs", SessionConfiguration::launch(), None)
            .await;
        assert!(matches!(result, Err(RegistryError::NoAdapter(t)) if t == "probe_rs"));
    }

    #[tokio::test]
    async fn test_wildcard_and_exact_trackers() {
        let registry = DebugRegistry::new();
        let exact = Arc::new(CountingTrackerFactory::default());
        let any = Arc::new(CountingTrackerFactory::default());
        let other = Arc::new(CountingTrackerFactory::default());

        registry.register_tracker_factory("probe_rs", exact.clone()).unwrap();
        registry.register_tracker_factory(ANY_DEBUG_TYPE, any.clone()).unwrap();
        registry.register_tracker_factory("cppdbg", other.clone()).unwrap();

        let handle = registry
            .start_session(
                "s",
                "probe_rs",
                SessionConfiguration::launch(),
                Some(AdapterExecutable::new("a")),
            )
            .await
            .unwrap();

        assert_eq!(handle.tracker_count(), 2);
        assert_eq!(exact.created.load(Ordering::SeqCst), 1);
        assert_eq!(any.created.load(Ordering::SeqCst), 1);
        assert_eq!(other.created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_descriptor_factory() {
        let registry = DebugRegistry::new();
        registry
            .register_descriptor_factory("probe_rs", Arc::new(FixedDescriptorFactory::default()))
            .unwrap();

        let result = registry
            .register_descriptor_factory("probe_rs", Arc::new(FixedDescriptorFactory::default()));
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(t)) if t == "probe_rs"));
    }

    #[test]
    fn test_dispose_removes_and_calls_hook_once() {
        let registry = DebugRegistry::new();
        let factory = Arc::new(FixedDescriptorFactory::default());

        let mut registration = registry
            .register_descriptor_factory("probe_rs", factory.clone())
            .unwrap();
        registration.dispose();
        registration.dispose();

        assert!(registration.is_disposed());
        assert_eq!(factory.disposed.load(Ordering::SeqCst), 1);

        // The slot is free again.
        registry
            .register_descriptor_factory("probe_rs", Arc::new(FixedDescriptorFactory::default()))
            .unwrap();
    }

    #[tokio::test]
    async fn test_stale_registration_does_not_remove_replacement() {
        let registry = DebugRegistry::new();
        let first = Arc::new(FixedDescriptorFactory::default());
        let second = Arc::new(FixedDescriptorFactory::default());

        let mut old = registry.register_descriptor_factory("probe_rs", first).unwrap();
        old.dispose();
        let _current = registry
            .register_descriptor_factory("probe_rs", second.clone())
            .unwrap();

        let mut stale = Registration {
            registry: Arc::downgrade(&registry.inner),
            kind: RegistrationKind::Descriptor,
            debug_type: "probe_rs".into(),
            id: old.id,
            disposed: false,
        };
        stale.dispose();

        assert_eq!(second.disposed.load(Ordering::SeqCst), 0);
        let handle = registry
            .start_session("s", "probe_rs", SessionConfiguration::launch(), None)
            .await
            .unwrap();
        assert!(handle.descriptor().is_server());
    }

    #[test]
    fn test_dispose_after_registry_dropped() {
        let registry = DebugRegistry::new();
        let mut registration = registry
            .register_tracker_factory("probe_rs", Arc::new(CountingTrackerFactory::default()))
            .unwrap();
        drop(registry);

        registration.dispose();
        assert!(registration.is_disposed());
    }

    #[tokio::test]
    async fn test_subscriptions_dispose_all() {
        let registry = DebugRegistry::new();
        let trackers = Arc::new(CountingTrackerFactory::default());
        let descriptors = Arc::new(FixedDescriptorFactory::default());

        let mut subscriptions = Subscriptions::new();
        subscriptions.push(
            registry
                .register_tracker_factory("probe_rs", trackers.clone())
                .unwrap(),
        );
        subscriptions.push(
            registry
                .register_descriptor_factory("probe_rs", descriptors.clone())
                .unwrap(),
        );
        assert_eq!(subscriptions.len(), 2);

        subscriptions.dispose_all();
        assert!(subscriptions.is_empty());
        assert_eq!(descriptors.disposed.load(Ordering::SeqCst), 1);

        let handle = registry
            .start_session(
                "s",
                "probe_rs",
                SessionConfiguration::launch(),
                Some(AdapterExecutable::new("a")),
            )
            .await
            .unwrap();
        assert!(!handle.descriptor().is_server());
        assert_eq!(trackers.created.load(Ordering::SeqCst), 0);
    }
}
