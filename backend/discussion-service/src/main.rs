use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{anyhow, Context};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use db_pool::{create_pool, migrate, DbConfig};
use discussion_service::config::{Config, StoreBackend};
use discussion_service::metrics::serve_metrics;
use discussion_service::repository::postgres::MIGRATOR;
use discussion_service::repository::{
    CommentStore, MemoryCommentStore, MemoryPostStore, PgCommentStore, PgPostStore, PostStore,
};
use discussion_service::schema::{build_schema, AppSchema, PageSizeLimits};
use discussion_service::services::{CommentService, PostService};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::prelude::*;

async fn graphql_handler(schema: web::Data<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn playground_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// SDL endpoint for client code generation
async fn schema_handler(schema: web::Data<AppSchema>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(schema.sdl())
}

async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "discussion-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP routes; the GraphiQL page is only mounted when `playground` is set
fn routes(cfg: &mut web::ServiceConfig, playground: bool) {
    let mut graphql = web::resource("/graphql").route(web::post().to(graphql_handler));
    if playground {
        graphql = graphql.route(web::get().to(playground_handler));
    }

    cfg.service(graphql)
        .route("/schema", web::get().to(schema_handler))
        .route("/health", web::get().to(health_handler))
        .route("/metrics", web::get().to(serve_metrics));
}

/// Build the post and comment stores for the configured backend
async fn build_stores(
    config: &Config,
) -> anyhow::Result<(Arc<dyn PostStore>, Arc<dyn CommentStore>)> {
    match config.store.backend {
        StoreBackend::Memory => {
            let posts: Arc<dyn PostStore> = Arc::new(MemoryPostStore::new());
            let comments: Arc<dyn CommentStore> =
                Arc::new(MemoryCommentStore::new(Arc::clone(&posts)));
            Ok((posts, comments))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .store
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow!("DATABASE_URL is required for the postgres backend"))?;

            let db_config = DbConfig::from_env("discussion-service", database_url);
            db_config.log_config();
            let pool = create_pool(db_config)
                .await
                .context("failed to create database pool")?;

            if config.store.run_migrations {
                migrate(&pool, &MIGRATOR)
                    .await
                    .context("failed to run database migrations")?;
            }

            Ok((
                Arc::new(PgPostStore::new(pool.clone())),
                Arc::new(PgCommentStore::new(pool)),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,discussion_service=debug,db_pool=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow!(e))?;
    tracing::info!(
        env = %config.app.env,
        backend = %config.store.backend,
        "starting discussion-service"
    );

    let (post_store, comment_store) = build_stores(&config).await?;
    let post_service = Arc::new(PostService::new(post_store));
    let comment_service = Arc::new(CommentService::new(comment_store));

    let schema = build_schema(
        post_service,
        comment_service,
        PageSizeLimits {
            default_size: config.graphql.default_page_size,
            max_size: config.graphql.max_page_size,
        },
    );

    let playground = !config.is_production();
    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!(playground, "listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(schema.clone()))
            .configure(|cfg| routes(cfg, playground))
    })
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
