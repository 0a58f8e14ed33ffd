//! Cliente Redis con connection pooling y operaciones async
//!
//! Backend alternativo del store TTL para despliegues multi-instancia:
//! Redis expira las claves de forma nativa, así que `sweep` es un no-op.

use anyhow::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{info, warn};

use super::cache_config::CacheConfig;
use super::ttl_store::TtlStore;

/// Cliente Redis compartido
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }

    /// Generar clave de cache con prefijo
    fn make_key(key: &str) -> String {
        format!("ride_hailing:{}", key)
    }

    /// Verificar si Redis está conectado
    pub async fn is_connected(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }
}

#[async_trait]
impl TtlStore for RedisClient {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<String>>(Self::make_key(key)).await {
            Ok(value) => value,
            Err(e) => {
                warn!("⚠️ Error leyendo clave {}: {}", key, e);
                None
            }
        }
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut conn = self.manager.clone();
        let result: Result<Option<String>, redis::RedisError> = redis::cmd("SET")
            .arg(Self::make_key(key))
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;
        match result {
            Ok(reply) => reply.is_some(),
            Err(e) => {
                warn!("⚠️ Error escribiendo clave {}: {}", key, e);
                false
            }
        }
    }

    async fn touch(&self, key: &str, ttl: Duration) -> bool {
        let mut conn = self.manager.clone();
        let result: Result<i64, redis::RedisError> = redis::cmd("EXPIRE")
            .arg(Self::make_key(key))
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;
        match result {
            Ok(updated) => updated == 1,
            Err(e) => {
                warn!("⚠️ Error renovando TTL de {}: {}", key, e);
                false
            }
        }
    }

    async fn sweep(&self) {
        // Redis expira las claves por su cuenta
    }
}
