//! Authoritative ability state
//!
//! The store is the single writer of the `AbilitySet`. Mutations are
//! serialized behind an async `RwLock`; readers get cloned snapshots.
//! Every change is published to subscribers right after the in-memory
//! mutation, then written through to the key-value store.

use crate::abilities::{Ability, AbilityKind, AbilitySet};
use crate::core::error::Result;
use crate::store::kv::KeyValueStore;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Key holding the serialized ability set
pub const ABILITIES_KEY: &str = "abilities";

/// Key holding the generation service API key
pub const API_KEY_KEY: &str = "api_key";

/// Buffered snapshots per subscriber before it starts lagging
const UPDATE_CHANNEL_CAPACITY: usize = 64;

pub struct AbilityStore {
    kv: Arc<dyn KeyValueStore>,
    state: RwLock<StoreState>,
    updates: broadcast::Sender<AbilitySet>,
}

#[derive(Default)]
struct StoreState {
    abilities: AbilitySet,
    /// Set once persisted state has been read; mutations before that load first
    loaded: bool,
}

impl AbilityStore {
    /// Create a store that has not read its persisted state yet
    ///
    /// The first `load` or `apply_score` reads it.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            kv,
            state: RwLock::new(StoreState::default()),
            updates,
        }
    }

    /// Create a store and load its persisted state
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let store = Arc::new(Self::new(kv));
        store.load().await;
        store
    }

    /// Subscribe to full snapshots published after every change
    pub fn subscribe(&self) -> broadcast::Receiver<AbilitySet> {
        self.updates.subscribe()
    }

    /// Load persisted abilities, initializing fresh ones on any failure
    ///
    /// Never fails: absent, unreadable or corrupt state is replaced with
    /// ten fresh abilities and written back. Publishes the result.
    pub async fn load(&self) -> AbilitySet {
        let mut state = self.state.write().await;
        self.load_locked(&mut state).await;
        let snapshot = state.abilities.clone();
        self.publish(snapshot.clone());
        snapshot
    }

    async fn load_locked(&self, state: &mut StoreState) {
        let (loaded, write_back) = match self.kv.get(ABILITIES_KEY).await {
            Ok(Some(json)) => match AbilitySet::from_json(&json) {
                Ok((set, repaired)) => {
                    if repaired {
                        tracing::warn!("Repaired persisted abilities");
                    }
                    (set, repaired)
                }
                Err(e) => {
                    tracing::warn!("{}; initializing fresh abilities", e);
                    (AbilitySet::fresh(), true)
                }
            },
            Ok(None) => {
                tracing::info!("No persisted abilities; initializing fresh abilities");
                (AbilitySet::fresh(), true)
            }
            Err(e) => {
                tracing::warn!("Failed to read abilities: {}; initializing fresh abilities", e);
                (AbilitySet::fresh(), true)
            }
        };

        state.abilities = loaded;
        state.loaded = true;
        if write_back {
            self.persist(&state.abilities).await;
        }
    }

    /// Add a score to one ability as experience
    ///
    /// Creates the ability on first reference. Returns its updated state.
    pub async fn apply_score(&self, kind: AbilityKind, score: f64) -> Ability {
        let mut state = self.state.write().await;
        if !state.loaded {
            self.load_locked(&mut state).await;
        }

        let ability = state.abilities.get_or_create(kind);
        let gained = ability.add_experience(score);
        let updated = ability.clone();
        if gained > 0 {
            tracing::info!(
                "{} reached level {} (+{})",
                kind.name(),
                updated.level,
                gained
            );
        } else {
            tracing::debug!(
                "{} +{:.1} exp ({:.1}/level {})",
                kind.name(),
                score,
                updated.experience,
                updated.level
            );
        }

        let snapshot = state.abilities.clone();
        self.publish(snapshot.clone());
        self.persist(&snapshot).await;
        updated
    }

    /// Consistent read-only copy of the current abilities
    pub async fn snapshot(&self) -> AbilitySet {
        self.state.read().await.abilities.clone()
    }

    /// Stored API key, if one is configured
    pub async fn credential(&self) -> Option<String> {
        match self.kv.get(API_KEY_KEY).await {
            Ok(key) => key.filter(|k| !k.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read API key: {}", e);
                None
            }
        }
    }

    /// Store the API key; an empty key clears it
    pub async fn save_credential(&self, api_key: &str) -> Result<()> {
        self.kv.set(API_KEY_KEY, api_key.trim()).await?;
        tracing::info!("API key updated");
        Ok(())
    }

    fn publish(&self, snapshot: AbilitySet) {
        // No subscribers is fine
        let _ = self.updates.send(snapshot);
    }

    async fn persist(&self, snapshot: &AbilitySet) {
        let result = match snapshot.to_json() {
            Ok(json) => self.kv.set(ABILITIES_KEY, &json).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to persist abilities: {}", e);
        }
    }
}
