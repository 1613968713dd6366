use actix_web::web;

use crate::handlers::{garages, shifts};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/garages", web::get().to(garages::list_garages))
        .service(
            web::scope("/shifts")
                .route("", web::get().to(shifts::get_shifts))
                .route("", web::post().to(shifts::create_shift))
                .route("/search", web::get().to(shifts::search))
                .route("/history", web::get().to(shifts::history))
                .route("/{id}", web::delete().to(shifts::cancel_shift)),
        );
}
