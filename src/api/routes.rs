use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin, leaderboard::get_leaderboard, news, profiles, schedule, streams::list_streams, teams, tournaments,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/register", post(profiles::register))
        .route("/api/profile", get(profiles::get_profile).put(profiles::update_profile))
        .route("/api/tournaments", get(tournaments::list_tournaments))
        .route("/api/tournaments/changes", get(tournaments::tournament_changes))
        .route("/api/tournaments/:id", get(tournaments::get_tournament))
        .route("/api/tournaments/:id/register", post(tournaments::register_for_tournament))
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route("/api/teams/join", post(teams::join_team))
        .route("/api/teams/:id", get(teams::get_team))
        .route("/api/schedule", get(schedule::get_schedule))
        .route("/api/matches/:id", get(schedule::get_match))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/news", get(news::list_news))
        .route("/api/news/:id", get(news::get_news))
        .route("/api/streams", get(list_streams))
        .nest("/api/admin", admin_routes())
        .with_state(state)
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/tournaments", post(admin::create_tournament))
        .route("/tournaments/:id", put(admin::update_tournament).delete(admin::delete_tournament))
        .route("/teams", get(admin::list_teams).post(admin::create_team))
        .route("/teams/:id", put(admin::update_team).delete(admin::delete_team))
        .route("/matches", get(admin::list_matches).post(admin::create_match))
        .route("/matches/:id", put(admin::update_match).delete(admin::delete_match))
        .route("/matches/:id/participants", post(admin::add_participant))
        .route("/news", post(admin::create_news))
        .route("/news/:id", put(admin::update_news).delete(admin::delete_news))
        .route("/streams", post(admin::create_stream))
        .route("/streams/:id", put(admin::update_stream).delete(admin::delete_stream))
        .route("/leaderboard", post(admin::create_stats))
        .route("/leaderboard/:id", put(admin::update_stats))
}
