pub mod admins;
pub mod auth;
pub mod content_blocks;
pub mod events;
pub mod health;
pub mod needs;
pub mod news;
pub mod pages;
pub mod parishioners;
pub mod posts;
pub mod servants;
pub mod services;

use actix_web::web;

/// Mounts everything under `/api`: the auth surface plus all content resources.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth_config).configure(content_config);
}

/// Login, logout, the current admin and admin management. These handlers only need
/// `CredentialStore`, `SessionGuard` and `TokenTransport` in the app data.
pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me),
    )
    .service(
        web::scope("/admins")
            .service(admins::list_admins)
            .service(admins::create_admin)
            .service(admins::get_admin)
            .service(admins::update_admin)
            .service(admins::delete_admin),
    );
}

/// Site content and parish records, backed by `web::Data<PgPool>`.
pub fn content_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .service(pages::list_pages)
            .service(pages::create_page)
            .service(pages::get_page_by_slug)
            .service(pages::get_page)
            .service(pages::update_page)
            .service(pages::delete_page),
    )
    .service(
        web::scope("/content-blocks")
            .service(content_blocks::list_content_blocks)
            .service(content_blocks::create_content_block)
            .service(content_blocks::get_content_block)
            .service(content_blocks::update_content_block)
            .service(content_blocks::delete_content_block),
    )
    .service(
        web::scope("/servants")
            .service(servants::list_servants)
            .service(servants::create_servant)
            .service(servants::get_servant)
            .service(servants::update_servant)
            .service(servants::delete_servant),
    )
    .service(
        web::scope("/parishioners")
            .service(parishioners::list_parishioners)
            .service(parishioners::create_parishioner)
            .service(parishioners::get_parishioner)
            .service(parishioners::update_parishioner)
            .service(parishioners::delete_parishioner),
    )
    .service(
        web::scope("/services")
            .service(services::list_services)
            .service(services::create_service)
            .service(services::get_service)
            .service(services::update_service)
            .service(services::delete_service),
    )
    .service(
        web::scope("/events")
            .service(events::list_events)
            .service(events::create_event)
            .service(events::get_event)
            .service(events::update_event)
            .service(events::delete_event),
    )
    .service(
        web::scope("/news")
            .service(news::list_news)
            .service(news::create_news)
            .service(news::get_news)
            .service(news::update_news)
            .service(news::delete_news),
    )
    .service(
        web::scope("/posts")
            .service(posts::list_posts)
            .service(posts::create_post)
            .service(posts::get_post)
            .service(posts::update_post)
            .service(posts::delete_post),
    )
    .service(
        web::scope("/needs")
            .service(needs::list_needs)
            .service(needs::create_need)
            .service(needs::get_need)
            .service(needs::update_need)
            .service(needs::delete_need),
    );
}
