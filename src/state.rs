//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::cache::ttl_store::TtlStore;
use crate::config::environment::EnvironmentConfig;
use crate::services::broadcast_service::PricingBroadcaster;
use crate::services::dispatch_registry::DispatchRegistry;
use crate::services::sms_service::SmsService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub sms: SmsService,
    pub pricing_broadcast: PricingBroadcaster,
    pub ttl_store: Arc<dyn TtlStore>,
    pub dispatch: DispatchRegistry,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, ttl_store: Arc<dyn TtlStore>) -> Self {
        let sms = SmsService::new(&config);
        let dispatch = DispatchRegistry::new(
            ttl_store.clone(),
            Duration::from_secs(config.dispatch_ttl_seconds),
        );
        Self {
            pool,
            config,
            sms,
            pricing_broadcast: PricingBroadcaster::default(),
            ttl_store,
            dispatch,
        }
    }
}
