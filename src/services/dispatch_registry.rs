//! Registro de dedup de dispatch
//!
//! Evita notificar el mismo booking al mismo driver más de una vez dentro
//! de la ventana TTL. Clave: "{bookingId}:{driverId}". Respaldado por el
//! store TTL inyectable para que funcione igual con memoria o Redis.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::ttl_store::TtlStore;

fn make_key(booking_id: &str, driver_id: i64) -> String {
    format!("dispatch:{}:{}", booking_id, driver_id)
}

/// Registro compartido de dispatches por (booking, driver)
#[derive(Clone)]
pub struct DispatchRegistry {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
}

impl DispatchRegistry {
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Marcar un dispatch. Devuelve true si es el primero dentro del TTL.
    pub async fn mark_dispatched(&self, booking_id: &str, driver_id: i64) -> bool {
        let key = make_key(booking_id, driver_id);
        let first = self.store.set_if_absent(&key, "1", self.ttl).await;
        if first {
            log::info!("[dispatchRegistry] mark booking={} driver={}", booking_id, driver_id);
        }
        first
    }

    /// ¿Ya se despachó este booking a este driver dentro del TTL?
    pub async fn was_dispatched(&self, booking_id: &str, driver_id: i64) -> bool {
        self.store.get(&make_key(booking_id, driver_id)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ttl_store::InMemoryTtlStore;

    fn registry(ttl: Duration) -> DispatchRegistry {
        DispatchRegistry::new(Arc::new(InMemoryTtlStore::new()), ttl)
    }

    #[tokio::test]
    async fn test_mark_and_check() {
        let registry = registry(Duration::from_secs(60));
        assert!(!registry.was_dispatched("b-1", 7).await);
        assert!(registry.mark_dispatched("b-1", 7).await);
        assert!(registry.was_dispatched("b-1", 7).await);
        // Segunda marca dentro del TTL no es la primera
        assert!(!registry.mark_dispatched("b-1", 7).await);
        // Otro driver es una clave distinta
        assert!(!registry.was_dispatched("b-1", 8).await);
    }

    #[tokio::test]
    async fn test_dispatch_expires_after_ttl() {
        let registry = registry(Duration::from_millis(20));
        assert!(registry.mark_dispatched("b-2", 3).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!registry.was_dispatched("b-2", 3).await);
        assert!(registry.mark_dispatched("b-2", 3).await);
    }
}
