//! Store clave-valor con TTL
//!
//! Estado compartido entre requests (dedup de dispatch, buckets de rate
//! limit) detrás de una interfaz inyectable, para poder respaldarlo con un
//! cache externo en despliegues multi-instancia. Las entradas expiran de
//! forma perezosa en el siguiente acceso a la misma clave; `sweep` permite
//! además una limpieza periódica opcional.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Operaciones del store TTL
#[async_trait]
pub trait TtlStore: Send + Sync {
    /// Valor de la clave si existe y no expiró.
    async fn get(&self, key: &str) -> Option<String>;

    /// Insertar solo si la clave no existe (o ya expiró). Devuelve true si
    /// esta llamada insertó el valor.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Renovar el TTL de una clave viva. Devuelve false si no existe.
    async fn touch(&self, key: &str, ttl: Duration) -> bool;

    /// Eliminar todas las entradas expiradas.
    async fn sweep(&self);
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Implementación en memoria del store TTL
#[derive(Clone, Default)]
pub struct InMemoryTtlStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TtlStore for InMemoryTtlStore {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expiración perezosa de la clave accedida
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(now) {
                entries.remove(key);
            }
        }
        None
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(key) {
            if !existing.is_expired(now) {
                return false;
            }
        }
        entries.insert(
            key.to_string(),
            Entry { value: value.to_string(), expires_at: now + ttl },
        );
        true
    }

    async fn touch(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at = now + ttl;
                true
            }
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }

    async fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
    }
}

/// Tarea opcional de limpieza periódica del store.
pub fn spawn_sweeper(store: Arc<dyn TtlStore>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // el primer tick es inmediato
        loop {
            ticker.tick().await;
            store.sweep().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_if_absent_wins_only_once() {
        let store = InMemoryTtlStore::new();
        assert!(store.set_if_absent("k", "a", Duration::from_secs(60)).await);
        assert!(!store.set_if_absent("k", "b", Duration::from_secs(60)).await);
        assert_eq!(store.get("k").await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let store = InMemoryTtlStore::new();
        assert!(store.set_if_absent("k", "a", Duration::from_millis(20)).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get("k").await, None);
        // La clave expirada puede reutilizarse
        assert!(store.set_if_absent("k", "b", Duration::from_secs(60)).await);
    }

    #[tokio::test]
    async fn test_touch_extends_live_entries_only() {
        let store = InMemoryTtlStore::new();
        assert!(!store.touch("missing", Duration::from_secs(1)).await);

        assert!(store.set_if_absent("k", "a", Duration::from_millis(50)).await);
        assert!(store.touch("k", Duration::from_secs(60)).await);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.get("k").await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let store = InMemoryTtlStore::new();
        assert!(store.set_if_absent("dead", "x", Duration::from_millis(10)).await);
        assert!(store.set_if_absent("live", "y", Duration::from_secs(60)).await);
        tokio::time::sleep(Duration::from_millis(30)).await;
        store.sweep().await;
        let entries = store.entries.read().await;
        assert!(!entries.contains_key("dead"));
        assert!(entries.contains_key("live"));
    }
}
