use std::sync::Arc;

use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use staffchat::admin::directory::InMemoryAccountDirectory;
use staffchat::admin::model::AdminAccount;
use staffchat::admin::{self, Role};
use staffchat::attachment::store::InMemoryAttachmentStore;
use staffchat::config::Config;
use staffchat::state::AppState;
use staffchat::{attachment, group, message, sync};

#[tokio::main]
async fn main() {
    let config = Config::default();

    // In the full platform the directory is the account service and the
    // attachment store is blob storage; the in-process implementations keep
    // this binary self-contained.
    let accounts = InMemoryAccountDirectory::new();
    let owner = AdminAccount::new(
        &config.super_admin_email,
        &config.super_admin_name,
        Role::SuperAdmin,
    );
    info!("seeded super admin {} ({})", owner.name, owner.id);
    accounts.insert(owner).await;

    let directory: admin::Directory = Arc::new(accounts);
    let attachments: attachment::Store = Arc::new(InMemoryAttachmentStore::new());

    let state = AppState::init(directory, attachments).await;

    let router = Router::new()
        .merge(sync::api(state.clone()))
        .merge(group::api(state.clone()))
        .merge(message::api(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admin::middleware::authenticate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(config.env.allow_origin())
                .allow_methods(config.env.allow_methods())
                .allow_headers(config.env.allow_headers()),
        );

    let addr = config.env.addr();
    info!("staff messaging core listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, router).await.expect("server error");
}
