//! Install and activate handlers.

use serde::{Deserialize, Serialize};

use precache_core::Error;

use super::{Interceptor, WorkerState};
use crate::fetch::InterceptedRequest;

/// Result of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub store: String,
    /// Cache keys written, in core asset order.
    pub assets: Vec<String>,
}

/// Result of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationReport {
    pub store: String,
    /// Stale stores removed.
    pub deleted: Vec<String>,
    pub navigation_preload: bool,
    pub claimed_clients: usize,
}

impl Interceptor {
    /// Precache every core asset into the current store.
    ///
    /// Every asset must come back with a 2xx status; otherwise nothing is
    /// stored and the worker becomes redundant. On success the host is told
    /// to skip waiting.
    ///
    /// An active worker only refreshes its store and keeps serving; a failed
    /// refresh leaves the previous entries in place.
    pub async fn on_install(&self) -> Result<InstallReport, Error> {
        if self.host.state().await == WorkerState::Activated {
            tracing::info!(store = %self.config.store_name, "refreshing core assets");
            let assets = self.precache().await?;
            return Ok(InstallReport { store: self.config.store_name.clone(), assets });
        }

        self.host.set_state(WorkerState::Installing).await;
        tracing::info!(store = %self.config.store_name, assets = self.config.core_assets.len(), "installing");

        match self.precache().await {
            Ok(assets) => {
                self.host.set_state(WorkerState::Installed).await;
                self.host.skip_waiting().await;
                tracing::info!(store = %self.config.store_name, "installed");
                Ok(InstallReport { store: self.config.store_name.clone(), assets })
            }
            Err(e) => {
                self.host.set_state(WorkerState::Redundant).await;
                tracing::error!(store = %self.config.store_name, "install failed: {e}");
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<Vec<String>, Error> {
        let store = &self.config.store_name;
        self.storage
            .open_store(store)
            .await
            .map_err(|e| Error::InstallFailed(format!("opening {store}: {e}")))?;

        let mut entries = Vec::with_capacity(self.config.core_assets.len());
        for path in &self.config.core_assets {
            let url = self
                .resolve(path)
                .map_err(|e| Error::InstallFailed(format!("{path}: {e}")))?;
            let request = InterceptedRequest::get(url);

            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("{path}: {e}")))?;
            if !response.is_ok() || response.is_partial() {
                return Err(Error::InstallFailed(format!("{path}: status {}", response.status)));
            }

            entries.push((request.key(), response));
        }

        self.storage
            .put_all(store, &entries)
            .await
            .map_err(|e| Error::InstallFailed(format!("storing core assets: {e}")))?;

        Ok(entries.into_iter().map(|(key, _)| key).collect())
    }

    /// Make this version the active one.
    ///
    /// Enables navigation preload when both the policy and the host allow it,
    /// deletes every store not named for this version, then claims clients.
    pub async fn on_activate(&self) -> Result<ActivationReport, Error> {
        let state = self.host.state().await;
        if !matches!(state, WorkerState::Installed | WorkerState::Activated) {
            return Err(Error::InvalidInput(format!("cannot activate a worker in state {state:?}")));
        }

        self.host.set_state(WorkerState::Activating).await;
        match self.activate().await {
            Ok(report) => {
                self.host.set_state(WorkerState::Activated).await;
                tracing::info!(
                    store = %report.store,
                    deleted = report.deleted.len(),
                    claimed = report.claimed_clients,
                    "activated"
                );
                Ok(report)
            }
            Err(e) => {
                self.host.set_state(state).await;
                Err(e)
            }
        }
    }

    async fn activate(&self) -> Result<ActivationReport, Error> {
        let mut navigation_preload = false;
        if self.policy.navigation_preload && self.host.supports_navigation_preload() {
            self.host.enable_navigation_preload().await?;
            navigation_preload = true;
        }

        let current = &self.config.store_name;
        let mut deleted = Vec::new();
        for name in self.storage.store_names().await? {
            if &name != current && self.storage.delete_store(&name).await? {
                tracing::debug!("deleted stale cache store {name}");
                deleted.push(name);
            }
        }

        let claimed_clients = self.host.claim_clients().await;

        Ok(ActivationReport { store: current.clone(), deleted, navigation_preload, claimed_clients })
    }
}
