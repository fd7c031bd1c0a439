// app/src/web/routes.rs

use crate::web::handlers::{admin_handlers, auth_handlers, doctor_handlers, patient_handlers};
use actix_web::{web, HttpResponse};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Public pages
    .route("/", web::get().to(auth_handlers::index))
    .service(
      web::resource("/register")
        .route(web::get().to(auth_handlers::register_form))
        .route(web::post().to(auth_handlers::register_submit)),
    )
    .service(
      web::resource("/login")
        .route(web::get().to(auth_handlers::login_form))
        .route(web::post().to(auth_handlers::login_submit)),
    )
    .route("/logout", web::get().to(auth_handlers::logout))
    // Patient pages
    .route("/patient/dashboard", web::get().to(patient_handlers::patient_dashboard))
    .route("/doctors", web::get().to(doctor_handlers::list_doctors))
    .service(
      web::resource("/book/{doctor_id}")
        .route(web::get().to(doctor_handlers::book_form))
        .route(web::post().to(doctor_handlers::book_submit)),
    )
    .route(
      "/appointment/cancel/{appointment_id}",
      web::get().to(patient_handlers::cancel_appointment),
    )
    // Admin pages
    .service(
      web::scope("/admin")
        .route("/dashboard", web::get().to(admin_handlers::admin_dashboard))
        .route(
          "/appointment/update/{appointment_id}/{status}",
          web::get().to(admin_handlers::update_appointment_status),
        )
        .route("/doctors", web::get().to(admin_handlers::manage_doctors))
        .service(
          web::resource("/doctor/add")
            .route(web::get().to(admin_handlers::add_doctor_form))
            .route(web::post().to(admin_handlers::add_doctor_submit)),
        )
        .route(
          "/doctor/toggle/{doctor_id}",
          web::get().to(admin_handlers::toggle_doctor_availability),
        ),
    );
}
