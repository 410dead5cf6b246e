use actix_cors::Cors;
use actix_multipart::form::{tempfile::TempFileConfig, MultipartFormConfig};
use actix_web::{middleware::Logger, web, App, HttpServer};

use promptform_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    config.validate();

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let max_upload_bytes = config.max_upload_bytes;
    let upload_temp_dir = config.upload_temp_dir.clone();

    let state = AppState::new(config)
        .await
        .expect("failed to initialize the application");

    log::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        // Published forms are embedded on arbitrary sites, so submissions
        // must be accepted cross-origin.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(MultipartFormConfig::default().total_limit(max_upload_bytes))
            .app_data(TempFileConfig::default().directory(&upload_temp_dir))
            .wrap(cors)
            .wrap(Logger::default())
            .service(handlers::generate_form)
            .service(handlers::assist_question)
            .service(handlers::suggest_question)
            .service(handlers::generate_form_from_image)
            .service(handlers::generate_form_from_document)
            .service(handlers::refactor_form)
            .service(handlers::analyze_responses)
            .service(handlers::create_form)
            .service(handlers::update_form)
            .service(handlers::list_forms)
            .service(handlers::delete_form)
            .service(handlers::submit_response)
            .service(handlers::list_responses)
            .service(handlers::form_summary)
            .service(handlers::get_form)
            .service(handlers::health_check)
            .service(handlers::health_check_live)
            .service(handlers::health_check_ready)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
