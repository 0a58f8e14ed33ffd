use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use ride_hailing::cache::redis_client::RedisClient;
use ride_hailing::cache::ttl_store::{spawn_sweeper, InMemoryTtlStore, TtlStore};
use ride_hailing::cache::CacheConfig;
use ride_hailing::config::environment::EnvironmentConfig;
use ride_hailing::database::connection::{mask_database_url, DatabaseConnection};
use ride_hailing::routes::create_app;
use ride_hailing::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚕 Ride Hailing Backend");
    info!("=======================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    info!("🔗 Conectando a {}", mask_database_url(&config.database_url));
    let db_connection = match DatabaseConnection::new(&config.database_url).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // Store TTL: Redis si está disponible, memoria de proceso si no
    let ttl_store: Arc<dyn TtlStore> = match std::env::var("REDIS_URL") {
        Ok(redis_url) => {
            let cache_config = CacheConfig { redis_url, ..CacheConfig::default() };
            match RedisClient::new(cache_config).await {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    warn!("⚠️ Redis no disponible, usando store en memoria: {}", e);
                    Arc::new(InMemoryTtlStore::new())
                }
            }
        }
        Err(_) => Arc::new(InMemoryTtlStore::new()),
    };

    // Limpieza periódica de claves expiradas (dedup de dispatch)
    let sweep_interval = Duration::from_secs(config.dispatch_ttl_seconds.max(1));
    let _sweeper = spawn_sweeper(ttl_store.clone(), sweep_interval);

    let port = config.port;
    let app_state = AppState::new(pool, config, ttl_store);
    let app = create_app(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📱 Phone Auth:");
    info!("   POST /auth/request-otp - Solicitar código OTP");
    info!("   POST /auth/verify-otp - Verificar OTP y emitir tokens");
    info!("🚗 Driver:");
    info!("   GET  /drivers/profile/me - Perfil propio");
    info!("   PUT  /drivers/profile/me - Actualizar perfil");
    info!("   POST /drivers/profile/me/toggle-availability - Toggle de disponibilidad");
    info!("   GET  /drivers/booking-eligibility - Elegibilidad de booking");
    info!("   POST /drivers/:id/upload-documents - Subida de documentos");
    info!("   POST /drivers/passengers/:id/rate - Valorar a un passenger");
    info!("🛡️ Admin:");
    info!("   GET  /admin/drivers/pending-documents - Revisiones pendientes");
    info!("   POST /admin/drivers/:id/approve - Aprobar driver");
    info!("   POST /admin/drivers/:id/approve-documents - Aprobar documentos");
    info!("   POST /admin/drivers/:id/reject-documents - Rechazar documentos");
    info!("   POST /admin/drivers/:id/status - Cambiar estado");
    info!("   POST /admin/drivers/:id/points - Puntos de recompensa (driver)");
    info!("   POST /admin/passengers - Alta de passenger");
    info!("   POST /admin/passengers/:id/points - Puntos de recompensa (passenger)");
    info!("💰 Pricing:");
    info!("   POST /pricing/recalculate - Recalcular tarifa de un booking");
    info!("   POST /pricing - Crear política");
    info!("   PUT  /pricing/:id - Actualizar política y difundir");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
