use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, coordinates, devices, enterprises, health, notifications, users};
use crate::services::{
    enterprise::build_dispatcher, CoordinateIngestion, DeviceRegistry, EnterpriseService,
    MissingOwnerPolicy, NotificationCenter,
};
use persistence::repositories::{
    CoordinateRepository, DeviceRepository, EnterpriseRepository, NotificationRepository,
    UserRepository,
};
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub users: UserRepository,
    /// Membership lookups for enterprise-scoped authorization.
    pub memberships: EnterpriseRepository,
    pub registry: DeviceRegistry,
    pub ingestion: CoordinateIngestion,
    pub enterprises: EnterpriseService,
    pub notifications: NotificationCenter,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let jwt = JwtConfig::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.leeway_secs,
    );

    let device_repo = DeviceRepository::new(pool.clone());
    let coordinate_repo = CoordinateRepository::new(pool.clone());
    let user_repo = UserRepository::new(pool.clone());
    let enterprise_repo = EnterpriseRepository::new(pool.clone());
    let notification_repo = NotificationRepository::new(pool.clone());

    let dispatcher = Arc::new(build_dispatcher(enterprise_repo.clone()));

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        rate_limiter,
        users: user_repo.clone(),
        memberships: enterprise_repo.clone(),
        registry: DeviceRegistry::new(device_repo.clone(), enterprise_repo.clone()),
        ingestion: CoordinateIngestion::new(
            device_repo,
            coordinate_repo,
            user_repo.clone(),
            enterprise_repo.clone(),
            MissingOwnerPolicy::from_config(&config.ingestion.missing_owner_policy),
        ),
        enterprises: EnterpriseService::new(enterprise_repo, user_repo, notification_repo.clone()),
        notifications: NotificationCenter::new(notification_repo, dispatcher),
    };

    build_router(state, &config)
}

fn build_router(state: AppState, config: &Config) -> Router {
    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Device-facing routes: microcontrollers identify themselves by MAC
    // address, so there is no bearer token here. Ingestion applies its own
    // per-MAC throttle.
    let device_routes = Router::new()
        .route("/api/coordinates", post(coordinates::ingest_coordinate))
        .route(
            "/api/devices/identify/:mac",
            get(coordinates::identify_device),
        );

    // Protected routes (require a bearer token)
    // Middleware order: auth runs first, then rate limiting (which needs the auth info)
    let protected_routes = Router::new()
        // Device registry
        .route(
            "/api/devices",
            post(devices::create_device).get(devices::list_devices),
        )
        .route(
            "/api/devices/:id",
            get(devices::get_device)
                .patch(devices::update_device)
                .delete(devices::delete_device),
        )
        .route("/api/devices/:id/active", patch(devices::set_device_active))
        .route(
            "/api/devices/:id/coordinates",
            get(coordinates::coordinate_history),
        )
        // Users
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Enterprises
        .route("/api/enterprises", post(enterprises::create_enterprise))
        .route("/api/enterprises/:id", get(enterprises::get_enterprise))
        .route(
            "/api/enterprises/:id/members",
            post(enterprises::invite_member).get(enterprises::list_members),
        )
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route(
            "/api/notifications/:id/confirm",
            post(notifications::confirm_notification),
        )
        .route(
            "/api/notifications/:id",
            delete(notifications::delete_notification),
        )
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/auth/login", post(auth::login))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(device_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
