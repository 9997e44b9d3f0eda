//! Capabilities the hosting environment provides to the interceptor.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use precache_core::Error;

/// Lifecycle state of the worker as seen by its host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    #[default]
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Installation failed; this version will never activate.
    Redundant,
}

/// Host-side primitives the lifecycle handlers call into.
#[async_trait::async_trait]
pub trait Host: Send + Sync {
    async fn state(&self) -> WorkerState;

    async fn set_state(&self, state: WorkerState);

    /// Activate as soon as installation finishes instead of waiting for
    /// existing consumers to close.
    async fn skip_waiting(&self);

    fn supports_navigation_preload(&self) -> bool;

    async fn enable_navigation_preload(&self) -> Result<(), Error>;

    /// Take control of every open consumer. Returns how many are controlled.
    async fn claim_clients(&self) -> usize;
}

/// An open consumer (page) of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub id: u64,
    pub url: String,
    pub controlled: bool,
}

/// In-process host: registration state plus the registry of open clients.
#[derive(Debug)]
pub struct Registration {
    state: RwLock<WorkerState>,
    preload_supported: bool,
    preload_enabled: AtomicBool,
    skip_waiting: AtomicBool,
    clients: RwLock<BTreeMap<u64, ClientInfo>>,
    next_client: AtomicU64,
}

impl Registration {
    pub fn new(preload_supported: bool) -> Self {
        Self {
            state: RwLock::new(WorkerState::Parsed),
            preload_supported,
            preload_enabled: AtomicBool::new(false),
            skip_waiting: AtomicBool::new(false),
            clients: RwLock::new(BTreeMap::new()),
            next_client: AtomicU64::new(1),
        }
    }

    pub fn navigation_preload_enabled(&self) -> bool {
        self.preload_enabled.load(Ordering::SeqCst)
    }

    pub fn skipped_waiting(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Register a newly opened client. It is controlled right away only if
    /// a worker is already active.
    pub async fn open_client(&self, url: impl Into<String>) -> u64 {
        let id = self.next_client.fetch_add(1, Ordering::SeqCst);
        let controlled = *self.state.read().await == WorkerState::Activated;
        self.clients
            .write()
            .await
            .insert(id, ClientInfo { id, url: url.into(), controlled });
        id
    }

    pub async fn clients(&self) -> Vec<ClientInfo> {
        self.clients.read().await.values().cloned().collect()
    }
}

impl Default for Registration {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait::async_trait]
impl Host for Registration {
    async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        let mut current = self.state.write().await;
        tracing::debug!(from = ?*current, to = ?state, "worker state change");
        *current = state;
    }

    async fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    fn supports_navigation_preload(&self) -> bool {
        self.preload_supported
    }

    async fn enable_navigation_preload(&self) -> Result<(), Error> {
        if !self.preload_supported {
            return Err(Error::InvalidInput("navigation preload is not supported by this host".into()));
        }
        self.preload_enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn claim_clients(&self) -> usize {
        let mut clients = self.clients.write().await;
        for client in clients.values_mut() {
            client.controlled = true;
        }
        clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_registration() {
        let reg = Registration::new(false);
        assert_eq!(reg.state().await, WorkerState::Parsed);
        assert!(!reg.supports_navigation_preload());
        assert!(!reg.navigation_preload_enabled());
        assert!(!reg.skipped_waiting());
    }

    #[tokio::test]
    async fn test_enable_preload_unsupported() {
        let reg = Registration::new(false);
        assert!(reg.enable_navigation_preload().await.is_err());
        assert!(!reg.navigation_preload_enabled());
    }

    #[tokio::test]
    async fn test_claim_controls_open_clients() {
        let reg = Registration::default();
        reg.open_client("https://lectura.app/").await;
        reg.open_client("https://lectura.app/libro/2").await;
        assert!(reg.clients().await.iter().all(|c| !c.controlled));

        assert_eq!(reg.claim_clients().await, 2);
        assert!(reg.clients().await.iter().all(|c| c.controlled));
    }

    #[tokio::test]
    async fn test_client_opened_after_activation_is_controlled() {
        let reg = Registration::default();
        reg.set_state(WorkerState::Activated).await;
        let id = reg.open_client("https://lectura.app/").await;

        let clients = reg.clients().await;
        assert_eq!(clients[0].id, id);
        assert!(clients[0].controlled);
    }
}
