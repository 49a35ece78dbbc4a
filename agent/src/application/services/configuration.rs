//! Application service: configuration manager.
//!
//! Holds the last applied desired-state document, decides whether an inbound
//! document is a real change, fans it out to observers in registration order
//! and persists it only once every observer has accepted it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use edge_models::{DesiredStateDocument, DeviceConfiguration, WorkloadSpec};
use tokio::sync::Mutex;

use crate::application::ports::{ConfigObserver, ConfigStateStore};
use crate::domain::config::NotifyPolicy;
use crate::domain::error::{ConfigurationError, ObserverFailures};

/// How often the owning process should pull configuration from upstream.
pub const DATA_TRANSFER_INTERVAL: Duration = Duration::from_secs(15);

/// Result of a successful [`ConfigurationManager::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Observers accepted the document and it is now persisted and current.
    Applied,
    /// The document matched the current one; nothing was done.
    Unchanged,
}

pub struct ConfigurationManager {
    store: Arc<dyn ConfigStateStore>,
    current: ArcSwap<DesiredStateDocument>,
    initial: AtomicBool,
    observers: Vec<Arc<dyn ConfigObserver>>,
    policy: NotifyPolicy,
    update_lock: Mutex<()>,
}

impl ConfigurationManager {
    /// Load the persisted document from `store`, falling back to
    /// `default_document` when it is missing or unreadable.
    ///
    /// The manager starts in the initial state whenever the fallback is used.
    pub async fn load(
        store: Arc<dyn ConfigStateStore>,
        default_document: DesiredStateDocument,
        policy: NotifyPolicy,
    ) -> Self {
        tracing::info!(path = %store.path().display(), "device config file");
        let (document, initial) = match store.load().await {
            Ok(Some(document)) => (document, false),
            Ok(None) => {
                tracing::info!("no persisted device configuration, using defaults");
                (default_document, true)
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "cannot load device configuration, using defaults");
                (default_document, true)
            }
        };
        Self {
            store,
            current: ArcSwap::from_pointee(document),
            initial: AtomicBool::new(initial),
            observers: Vec::new(),
            policy,
            update_lock: Mutex::new(()),
        }
    }

    /// Append an observer. Observers are notified in registration order.
    ///
    /// Takes `&mut self`, so registration can only happen while the manager
    /// is still exclusively owned during startup wiring.
    pub fn register_observer(&mut self, observer: Arc<dyn ConfigObserver>) {
        tracing::debug!(observer = observer.name(), "registering configuration observer");
        self.observers.push(observer);
    }

    /// Apply a new desired-state document.
    ///
    /// Unless the document is unchanged (and the manager is past its initial
    /// state) every observer is notified; the document is persisted and made
    /// current only if all of them accept it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ObserversRejected`] if an observer fails
    /// and [`ConfigurationError::Persist`] if the document cannot be written.
    /// In both cases the current document is left as it was.
    pub async fn update(
        &self,
        document: DesiredStateDocument,
    ) -> Result<UpdateOutcome, ConfigurationError> {
        let _guard = self.update_lock.lock().await;

        let unchanged = document.has_same_desired_state(&self.current.load());
        let initial = self.is_initial_config();
        tracing::trace!(initial, unchanged, version = %document.version, "comparing desired state");
        if unchanged && !initial {
            tracing::trace!("configuration didn't change");
            return Ok(UpdateOutcome::Unchanged);
        }

        tracing::debug!(
            version = %document.version,
            workloads = document.workloads.len(),
            "updating configuration"
        );
        self.notify_observers(&document).await?;

        // Observers that already accepted the document are not compensated
        // when persisting fails.
        tracing::trace!(path = %self.store.path().display(), "writing device config");
        if let Err(source) = self.store.save(&document).await {
            tracing::error!(error = %format!("{source:#}"), "cannot persist device configuration");
            return Err(ConfigurationError::Persist {
                path: self.store.path().to_path_buf(),
                source,
            });
        }

        tracing::info!(version = %document.version, "configuration applied");
        self.current.store(Arc::new(document));
        self.initial.store(false, Ordering::Release);
        Ok(UpdateOutcome::Applied)
    }

    async fn notify_observers(&self, document: &DesiredStateDocument) -> Result<(), ConfigurationError> {
        let mut failures = ObserverFailures::default();
        for observer in &self.observers {
            if let Err(e) = observer.on_configuration(document).await {
                tracing::warn!(
                    observer = observer.name(),
                    error = %format!("{e:#}"),
                    "observer rejected configuration"
                );
                failures.push(observer.name(), e);
                if self.policy == NotifyPolicy::FailFast {
                    break;
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::ObserversRejected(failures))
        }
    }

    /// Snapshot of the current document.
    #[must_use]
    pub fn current_document(&self) -> Arc<DesiredStateDocument> {
        self.current.load_full()
    }

    #[must_use]
    pub fn device_configuration(&self) -> DeviceConfiguration {
        self.current.load().configuration.clone()
    }

    #[must_use]
    pub fn workloads(&self) -> Vec<WorkloadSpec> {
        self.current.load().workloads.clone()
    }

    #[must_use]
    pub fn configuration_version(&self) -> String {
        let version = self.current.load().version.clone();
        tracing::trace!(%version, "configuration version");
        version
    }

    /// `true` until the first document has been applied successfully.
    #[must_use]
    pub fn is_initial_config(&self) -> bool {
        self.initial.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn notify_policy(&self) -> NotifyPolicy {
        self.policy
    }

    /// Polling period for upstream configuration. A policy value only; the
    /// manager itself never schedules anything.
    #[must_use]
    pub fn data_transfer_interval(&self) -> Duration {
        DATA_TRANSFER_INTERVAL
    }

    /// Delete the persisted document. In-memory state is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub async fn deregister(&self) -> Result<()> {
        tracing::info!(path = %self.store.path().display(), "removing device config file");
        self.store.remove().await.inspect_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "cannot remove device config file");
        })
    }
}
