//! Single binary web server: tournaments, registration, bracket generation and result reporting via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use esports_tournament_web::{
    eligible_entrants, generate_bracket, join_tournament, report_result, review_participant,
    BracketError, MatchId, Participant, RandomSeeder, ReviewAction, Tournament, TournamentError,
    TournamentId, TournamentSettings, TournamentStore,
};
use serde::Deserialize;

type AppState = Data<TournamentStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct JoinBody {
    email: String,
    #[serde(default)]
    team_name: String,
    #[serde(default)]
    team_size: Option<String>,
    #[serde(default)]
    players: Vec<String>,
    #[serde(default)]
    transaction_id: String,
}

#[derive(Deserialize)]
struct ReviewBody {
    email: String,
    action: ReviewAction,
}

#[derive(Deserialize)]
struct ReportResultBody {
    winner: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/bracket/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Server settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self { host, port }
    }
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotFound(_)
        | TournamentError::ParticipantNotFound(_)
        | TournamentError::Bracket(BracketError::MatchNotFound(_)) => HttpResponse::NotFound().json(body),
        TournamentError::Storage(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Respond with the committed tournament, or the mapped error.
fn tournament_response<T>(result: Result<(T, Tournament), TournamentError>) -> HttpResponse {
    match result {
        Ok((_, t)) => HttpResponse::Ok().json(t),
        Err(e) => {
            log::warn!("request rejected: {}", e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "esports-tournament-web",
    })
}

/// Create a new tournament (returns it with id and short id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentSettings>) -> HttpResponse {
    let tournament = Tournament::new(body.into_inner());
    log::info!("created tournament {} ({})", tournament.short_id, tournament.id);
    match state.insert(tournament.clone()) {
        Ok(_) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(&e),
    }
}

/// All tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.list() {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.remove(path.id) {
        Ok(t) => {
            log::info!("deleted tournament {}", t.short_id);
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Err(e) => error_response(&e),
    }
}

/// Register a team (tournament must be Open).
#[post("/api/tournaments/{id}/participants")]
async fn api_join_tournament(state: AppState, path: Path<TournamentPath>, body: Json<JoinBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut participant = Participant::new(body.email, body.team_name, body.transaction_id);
    if let Some(size) = body.team_size {
        participant.team_size = size;
    }
    participant.players = body.players;
    tournament_response(state.transact(path.id, |t| join_tournament(t, participant)))
}

/// Approve or reject a participant's payment proof.
#[put("/api/tournaments/{id}/participants/review")]
async fn api_review_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ReviewBody>,
) -> HttpResponse {
    tournament_response(state.transact(path.id, |t| review_participant(t, &body.email, body.action)))
}

/// Entrants the bracket would be generated from.
#[get("/api/tournaments/{id}/entrants")]
async fn api_eligible_entrants(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(eligible_entrants(&t)),
        Err(e) => error_response(&e),
    }
}

/// Generate the bracket from verified participants (Open -> InProgress).
#[post("/api/tournaments/{id}/bracket/generate")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    tournament_response(state.transact(path.id, |t| {
        generate_bracket(t, &mut RandomSeeder::thread_rng())
    }))
}

/// Report (or correct) the winner of one match.
#[put("/api/tournaments/{id}/bracket/matches/{match_id}/winner")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    tournament_response(state.transact(path.id, |t| report_result(t, path.match_id, body.winner.trim())))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(TournamentStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_join_tournament)
            .service(api_review_participant)
            .service(api_eligible_entrants)
            .service(api_generate_bracket)
            .service(api_report_result)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
