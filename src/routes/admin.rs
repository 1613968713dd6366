use actix_web::web;

use crate::handlers::{admin_shifts, bikes, drivers, garages, payroll, shifts};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/garages", web::get().to(garages::list_garages))
            .route("/garages", web::post().to(garages::create_garage))
            .route("/garages/{id}", web::get().to(garages::get_garage))
            .route("/garages/{id}", web::put().to(garages::update_garage))
            .route("/garages/{id}", web::delete().to(garages::delete_garage))
            .route("/bikes", web::get().to(bikes::list_bikes))
            .route("/bikes", web::post().to(bikes::create_bike))
            .route("/bikes/maintenance", web::get().to(bikes::needing_mechanic))
            .route("/bikes/{id}", web::get().to(bikes::get_bike))
            .route("/bikes/{id}", web::put().to(bikes::update_bike))
            .route("/bikes/{id}/archive", web::post().to(bikes::archive_bike))
            .route(
                "/bikes/{id}/maintenance",
                web::get().to(bikes::list_maintenance),
            )
            .route(
                "/bikes/{id}/maintenance",
                web::post().to(bikes::add_maintenance),
            )
            .route(
                "/bikes/{id}/maintenance/{log_id}",
                web::put().to(bikes::update_maintenance),
            )
            .route(
                "/bikes/{id}/maintenance/{log_id}",
                web::delete().to(bikes::delete_maintenance),
            )
            .route(
                "/bikes/{id}/operator-notes",
                web::get().to(bikes::operator_notes),
            )
            .route("/calendar", web::get().to(admin_shifts::calendar))
            .route("/shifts/{id}", web::get().to(admin_shifts::get_shift))
            .route(
                "/shifts/{id}/check-in",
                web::post().to(admin_shifts::check_in),
            )
            .route(
                "/shifts/{id}/check-out",
                web::post().to(admin_shifts::check_out),
            )
            .route("/shifts/{id}/reset", web::post().to(admin_shifts::reset))
            .route("/shifts/{id}/notes", web::post().to(admin_shifts::set_notes))
            .route("/shifts/{id}/status", web::post().to(admin_shifts::confirm))
            .route("/shifts/{id}/status", web::delete().to(admin_shifts::reject))
            .route(
                "/shifts/{id}/reassign/{bike_id}",
                web::post().to(admin_shifts::reassign),
            )
            .route(
                "/shifts/{id}/operator-notes",
                web::get().to(admin_shifts::get_operator_notes),
            )
            .route(
                "/shifts/{id}/operator-notes",
                web::post().to(admin_shifts::set_operator_notes),
            )
            .route("/drivers", web::get().to(drivers::list_drivers))
            .route("/drivers/{id}", web::get().to(drivers::get_driver))
            .route("/drivers/{id}", web::put().to(drivers::update_driver))
            .route("/drivers/{id}/block", web::post().to(drivers::block_driver))
            .route(
                "/drivers/{id}/block",
                web::delete().to(drivers::unblock_driver),
            )
            .route(
                "/drivers/{driver_id}/shifts",
                web::get().to(shifts::get_shifts_for_driver),
            )
            .route(
                "/drivers/{driver_id}/shifts",
                web::post().to(shifts::create_shift_for_driver),
            )
            .route(
                "/drivers/{driver_id}/shifts/search",
                web::get().to(shifts::search_for_driver),
            )
            .route(
                "/drivers/{driver_id}/shifts/history",
                web::get().to(shifts::history_for_driver),
            )
            .route(
                "/drivers/{driver_id}/shifts/{id}",
                web::delete().to(shifts::cancel_shift_for_driver),
            )
            .route("/payroll", web::get().to(payroll::outstanding))
            .route("/payroll/payout", web::post().to(payroll::payout)),
    );
}
