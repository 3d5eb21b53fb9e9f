use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizcast_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::create_collection)
            .service(handlers::list_collections)
            .service(handlers::get_collection)
            .service(handlers::update_collection)
            .service(handlers::delete_collection)
            .service(handlers::add_activity)
            .service(handlers::update_activity)
            .service(handlers::remove_activity)
            .service(handlers::set_answers)
            .service(handlers::change_activity_type)
            .service(handlers::create_session)
            .service(handlers::join_session)
            .service(handlers::get_session)
            .service(handlers::start_session)
            .service(handlers::advance_session)
            .service(handlers::finish_session)
            .service(handlers::submit_answer)
            .service(handlers::leaderboard)
    })
    .bind((host, port))?
    .run()
    .await
}
