//! Web layer module
//!
//! HTTP interface for the gamesite admin service. Handlers stay thin: they
//! parse and validate the request, call a repository (or the game launch
//! client) and wrap the result in the standard [`responses::ApiResponse`]
//! envelope.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    database::Database,
    game_launch::GameLaunchClient,
    models::BannerKind,
    repositories::{
        BannerRepository, FloatingSocialRepository, GameHistoryRepository, GameRepository,
        NoticeRepository, PaymentMethodRepository, PromotionRepository, SettingsRepository,
        SiteConfigRepository, WithdrawMethodRepository,
    },
    uploads::UploadStorage,
};

pub mod extractors;
pub mod handlers;
pub mod responses;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub storage: UploadStorage,
    pub game_launch: GameLaunchClient,
    pub games: GameRepository,
    pub game_history: GameHistoryRepository,
    pub promotions: PromotionRepository,
    pub providers: BannerRepository,
    pub sliders: BannerRepository,
    pub sliders2: BannerRepository,
    pub payment_methods: PaymentMethodRepository,
    pub withdraw_methods: WithdrawMethodRepository,
    pub floating_socials: FloatingSocialRepository,
    pub notices: NoticeRepository,
    pub site_configs: SiteConfigRepository,
    pub settings: SettingsRepository,
}

impl AppState {
    pub fn new(config: Config, database: Database) -> Result<Self> {
        let pool = database.pool();
        let game_launch = GameLaunchClient::new(&config.game_launch)?;
        let storage = UploadStorage::new(config.storage.uploads_path.clone());

        Ok(Self {
            games: GameRepository::new(pool.clone()),
            game_history: GameHistoryRepository::new(pool.clone()),
            promotions: PromotionRepository::new(pool.clone()),
            providers: BannerRepository::new(pool.clone(), BannerKind::Provider),
            sliders: BannerRepository::new(pool.clone(), BannerKind::Slider),
            sliders2: BannerRepository::new(pool.clone(), BannerKind::Slider2),
            payment_methods: PaymentMethodRepository::new(pool.clone()),
            withdraw_methods: WithdrawMethodRepository::new(pool.clone()),
            floating_socials: FloatingSocialRepository::new(pool.clone()),
            notices: NoticeRepository::new(pool.clone()),
            site_configs: SiteConfigRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
            database,
            config,
            storage,
            game_launch,
        })
    }

    /// Repository behind one of the banner mount points
    pub fn banners(&self, kind: BannerKind) -> &BannerRepository {
        match kind {
            BannerKind::Provider => &self.providers,
            BannerKind::Slider => &self.sliders,
            BannerKind::Slider2 => &self.sliders2,
        }
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.web.cors_origins);
    let body_limit = state.config.web.max_upload_bytes;
    let uploads = ServeDir::new(state.storage.root());

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api/v1", api_v1_routes())
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    use handlers::{
        dashboard, floating_socials, footer, game_history, games, logo, notices,
        payment_methods, play_game, promotions, settings, site_configs, withdraw_methods,
    };
    use crate::models::{BottomNavbarSettings, NavbarSettings, ThemeSettings};

    Router::new()
        // Game catalog
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/admin", get(games::list_all_games))
        .route(
            "/games/:id",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .route("/games/:id/status", patch(games::toggle_game_status))
        // Game launch relay
        .route("/playgame", post(play_game::play_game))
        // Bet history
        .route(
            "/game-history",
            get(game_history::list_game_history).post(game_history::create_game_history),
        )
        .route("/game-history/:id", get(game_history::get_game_history))
        .route(
            "/game-history/:id/status",
            patch(game_history::update_game_history_status),
        )
        // Promotions
        .route(
            "/promotions",
            get(promotions::list_promotions).post(promotions::create_promotion),
        )
        .route("/promotions/admin", get(promotions::list_promotions))
        .route(
            "/promotions/:id",
            get(promotions::get_promotion)
                .put(promotions::update_promotion)
                .delete(promotions::delete_promotion),
        )
        // Banner images
        .nest("/providers", banner_routes(BannerKind::Provider))
        .nest("/sliders", banner_routes(BannerKind::Slider))
        .nest("/sliders2", banner_routes(BannerKind::Slider2))
        // Payment methods
        .route(
            "/payment-methods",
            get(payment_methods::list_payment_methods).post(payment_methods::create_payment_method),
        )
        .route(
            "/payment-methods/admin",
            get(payment_methods::list_all_payment_methods),
        )
        .route(
            "/payment-methods/:id",
            get(payment_methods::get_payment_method)
                .put(payment_methods::update_payment_method)
                .delete(payment_methods::delete_payment_method),
        )
        .route(
            "/payment-methods/:id/status",
            patch(payment_methods::toggle_payment_method_status),
        )
        // Withdraw methods
        .route(
            "/withdraw-methods",
            get(withdraw_methods::list_withdraw_methods)
                .post(withdraw_methods::create_withdraw_method),
        )
        .route(
            "/withdraw-methods/admin",
            get(withdraw_methods::list_all_withdraw_methods),
        )
        .route(
            "/withdraw-methods/:id",
            get(withdraw_methods::get_withdraw_method)
                .put(withdraw_methods::update_withdraw_method)
                .delete(withdraw_methods::delete_withdraw_method),
        )
        .route(
            "/withdraw-methods/:id/status",
            patch(withdraw_methods::toggle_withdraw_method_status),
        )
        // Floating social buttons
        .route(
            "/floating-socials",
            get(floating_socials::list_floating_socials)
                .post(floating_socials::create_floating_social),
        )
        .route(
            "/floating-socials/admin",
            get(floating_socials::list_all_floating_socials),
        )
        .route(
            "/floating-socials/:id",
            get(floating_socials::get_floating_social)
                .put(floating_socials::update_floating_social)
                .delete(floating_socials::delete_floating_social),
        )
        .route(
            "/floating-socials/:id/status",
            patch(floating_socials::toggle_floating_social_status),
        )
        // Notices
        .route(
            "/notices",
            get(notices::current_notice).post(notices::create_notice),
        )
        .route("/notices/admin", get(notices::list_notices))
        .route(
            "/notices/:id",
            get(notices::get_notice)
                .put(notices::update_notice)
                .delete(notices::delete_notice),
        )
        .route("/notices/:id/status", patch(notices::toggle_notice_status))
        // Site configuration
        .route(
            "/site-configs",
            get(site_configs::active_site_config).post(site_configs::create_site_config),
        )
        .route("/site-configs/admin", get(site_configs::list_site_configs))
        .route(
            "/site-configs/:id",
            get(site_configs::get_site_config)
                .put(site_configs::update_site_config)
                .delete(site_configs::delete_site_config),
        )
        .route(
            "/site-configs/:id/activate",
            patch(site_configs::activate_site_config),
        )
        // Singleton style documents
        .route(
            "/settings/navbar",
            get(settings::get_settings::<NavbarSettings>)
                .post(settings::save_settings::<NavbarSettings>),
        )
        .route(
            "/settings/bottom-navbar",
            get(settings::get_settings::<BottomNavbarSettings>)
                .post(settings::save_settings::<BottomNavbarSettings>),
        )
        .route(
            "/settings/theme",
            get(settings::get_settings::<ThemeSettings>)
                .post(settings::save_settings::<ThemeSettings>),
        )
        // Footer and logo image sets
        .route("/footer", get(footer::get_footer).post(footer::save_footer))
        .route("/footer/social-links", post(footer::add_social_link))
        .route(
            "/footer/social-links/:link_id",
            delete(footer::remove_social_link),
        )
        .route("/logo", get(logo::get_logo).post(logo::save_logo))
        // Dashboard
        .route("/dashboard/summary", get(dashboard::summary))
}

/// Routes shared by the provider, slider and slider2 collections
fn banner_routes(kind: BannerKind) -> Router<AppState> {
    use handlers::banners;

    Router::new()
        .route("/", get(banners::list_banners).post(banners::create_banner))
        .route("/admin", get(banners::list_banners))
        .route(
            "/:id",
            get(banners::get_banner)
                .put(banners::update_banner)
                .delete(banners::delete_banner),
        )
        .layer(Extension(kind))
}

/// HTTP server wrapping the application router
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, database: Database) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let state = AppState::new(config, database)?;

        Ok(Self {
            app: build_router(state),
            addr,
        })
    }

    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Web server listening on http://{}", self.addr);

        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}
