//! Yavalath Server - HTTP API for the board front-end
//!
//! This crate provides the web backend:
//! - REST API for the game session (select, step, reset, load)
//! - Board token utilities
//! - Static file serving for the front-end
//! - Background move worker for the computer player

mod judge;
mod routes;
mod state;
mod worker;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use yavalath_core::{Judge, NoJudge, Player, RandomMover, Session};

pub use judge::CommandJudge;
pub use state::ServerState;
pub use worker::{spawn_move_worker, spawn_reply_pump, MoveWorker, WorkerMessage};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Token to start from
    pub board_hex: Option<String>,
    /// Label cells with their index in the board response
    pub show_numbers: bool,
    /// Side played by the computer, `None` for two humans
    pub ai_player: Option<Player>,
    /// Seed for the computer player
    pub seed: Option<u64>,
    /// External program that judges positions
    pub judge_command: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "yavalath/web".to_string(),
            board_hex: None,
            show_numbers: false,
            ai_player: Some(Player::P0),
            seed: None,
            judge_command: None,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry
        .route("/api/board", get(routes::board::get_board))
        // Game session
        .route("/api/game/state", get(routes::game::get_game_state))
        .route("/api/game/select", post(routes::game::select_cell))
        .route("/api/game/forward", post(routes::game::step_forward))
        .route("/api/game/back", post(routes::game::step_back))
        .route("/api/game/reset", post(routes::game::reset_game))
        .route("/api/game/load", post(routes::game::load_board))
        .route("/api/game/ai", post(routes::game::set_ai_player))
        // Token utilities
        .route("/api/token/check", post(routes::token::check_token))
        .route("/api/token/encode", post(routes::token::encode_moves))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Build the session described by the configuration
pub fn build_session(config: &ServerConfig) -> Session {
    let judge: Box<dyn Judge> = match &config.judge_command {
        Some(program) => Box::new(CommandJudge::new(program)),
        None => Box::new(NoJudge),
    };
    let mut session = Session::new(judge, config.ai_player);

    if let Some(board_hex) = &config.board_hex {
        match session.load_token(board_hex) {
            Ok(()) => tracing::info!(
                "Loaded board {} ({} moves)",
                board_hex,
                session.history().len()
            ),
            Err(e) => tracing::warn!("Invalid boardHex {}: {}. Starting empty.", board_hex, e),
        }
    }

    session
}

/// Ask the worker to move if the computer has the move in the starting position
pub fn request_opening_move(state: &ServerState) {
    let opening = state.session().request_ai_move_if_due();
    state.dispatch(opening);
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let mut state = ServerState::new(build_session(&config), config.show_numbers);

    let mut messages = None;
    if config.ai_player.is_some() {
        let mover = match config.seed {
            Some(seed) => RandomMover::with_seed(seed),
            None => RandomMover::new(),
        };
        let mut worker = spawn_move_worker(mover);
        worker.ready().await?;
        let (requests, replies) = worker.into_parts();
        state = state.with_worker(requests);
        messages = Some(replies);
    }

    let state = Arc::new(state);
    if let Some(messages) = messages {
        spawn_reply_pump(Arc::clone(&state), messages);
        request_opening_move(&state);
    }

    let router = create_router(&config, state);

    tracing::info!("Yavalath server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
