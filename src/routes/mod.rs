// Route exports
pub mod cases;
pub mod mentors;

pub use mentors::AppState;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(mentors::health_check))
        .service(
            web::scope("/api")
                .configure(mentors::configure)
                .configure(cases::configure),
        );
}
