//! Canal de difusión de actualizaciones de pricing
//!
//! Los observadores (gateway de sockets, otros servicios) se suscriben al
//! canal; publicar sin suscriptores no es un error.

use tokio::sync::broadcast;

use crate::services::pricing_service::PricingUpdate;

/// Difusor de actualizaciones de pricing
#[derive(Clone)]
pub struct PricingBroadcaster {
    tx: broadcast::Sender<PricingUpdate>,
}

impl PricingBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publicar una actualización; devuelve cuántos suscriptores la reciben.
    pub fn publish(&self, update: PricingUpdate) -> usize {
        match self.tx.send(update) {
            Ok(receivers) => receivers,
            Err(_) => {
                // Sin suscriptores activos; el payload se descarta
                tracing::debug!("📡 pricing:update sin suscriptores");
                0
            }
        }
    }

    /// Nueva suscripción al canal.
    pub fn subscribe(&self) -> broadcast::Receiver<PricingUpdate> {
        self.tx.subscribe()
    }
}

impl Default for PricingBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::FareBreakdown;

    fn sample_update() -> PricingUpdate {
        PricingUpdate {
            booking_id: "b-1".to_string(),
            vehicle_type: "mini".to_string(),
            distance_km: 3.1,
            fare_estimated: 121.5,
            fare_breakdown: FareBreakdown {
                base: 50.0,
                distance_cost: 31.0,
                time_cost: 0.0,
                waiting_cost: 0.0,
                surge_multiplier: 1.5,
            },
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let broadcaster = PricingBroadcaster::new(8);
        assert_eq!(broadcaster.publish(sample_update()), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_update() {
        let broadcaster = PricingBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        assert_eq!(broadcaster.publish(sample_update()), 1);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.booking_id, "b-1");
        assert_eq!(received.fare_breakdown.surge_multiplier, 1.5);
    }
}
