pub mod auth;
pub mod health;
pub mod tags;
pub mod tasks;

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::auth::AuthMiddleware;

/// Routes reachable without a token: health, registration and login.
pub fn public(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::register)
        .service(auth::login);
}

/// Tag and task routes, each scope wrapped in the access guard. The guard
/// binds the token's subject into the request, and every store call below is
/// scoped to that user.
pub fn protected(secret: &str) -> impl HttpServiceFactory {
    let guard = AuthMiddleware::new(secret.to_string());
    (
        web::scope("/tags")
            .wrap(guard.clone())
            .service(tags::list_tags)
            .service(tags::create_tag)
            .service(tags::delete_tag),
        web::scope("/tasks")
            .wrap(guard)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
}
