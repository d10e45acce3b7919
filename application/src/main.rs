use std::{
    io,
    sync::{Arc, OnceLock},
    time,
};

use application::{api, graphql, rest, Args, Config, Service};
use axum::{
    extract::MatchedPath,
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use juniper::EmptySubscription;
use service::{
    command::{Command as _, SeedFixtures},
    infra::{postgres, Gemini, Postgres},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{self as log, Subscriber};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
};

/// Levels written to stderr rather than stdout.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Configured maximum level, [`log::Level::INFO`] until the config is read.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(log_layer(io::stdout, false))
        .with(log_layer(io::stderr, true))
        .init();

    _ = start().await;
}

/// Builds a compact log layer writing the events of [`STDERR_LEVELS`] (or all
/// the other ones) up to [`LOG_LEVEL`] into the provided `writer`.
fn log_layer<S, W>(writer: W, stderr: bool) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| {
            let level = *meta.level();
            meta.is_span()
                || (STDERR_LEVELS.contains(&level) == stderr
                    && LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                        >= level)
        }))
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        server,
        database,
        drafting,
        firm,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let postgres_config = database.to_postgres();
    if postgres_config.is_none() {
        log::error!(
            "database URL or key is not configured, every database \
             operation will fail",
        );
    }
    let mut postgres = Postgres::new(
        &postgres_config.clone().unwrap_or_default(),
    )
    .map_err(|e| {
        log::error!("failed to initialize `Postgres` database: {e}");
    })?;

    if postgres_config.is_some() {
        let report =
            migrations::runner().run_async(&mut postgres).await.map_err(
                |e| log::error!("failed to run database migrations: {e}"),
            )?;
        for applied in report.applied_migrations() {
            log::info!("applied `{applied}` migration");
        }
    }

    let service = Service::new(
        service::Config { firm },
        postgres,
        Gemini::new(drafting.into()),
    );

    if postgres_config.is_some() && database.seed {
        let seeded = service.execute(SeedFixtures).await.map_err(|e| {
            log::error!("failed to seed the database: {e}");
        })?;
        log::info!("seeded the database: {seeded:?}");
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([http::header::CONTENT_TYPE]);
    for origin in &server.cors.origins {
        cors = cors.allow_origin(
            origin.parse::<http::header::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not a valid CORS origin: {e}");
            })?,
        );
    }

    let app = router(service)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span::<axum::body::Body>)
                .on_response(record_response::<axum::body::Body>),
        );

    let listener = TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;
    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}

/// Routes the GraphQL and REST endpoints to the provided [`Service`].
fn router(service: Service) -> Router {
    let schema =
        api::Schema::new(api::Query, api::Mutation, EmptySubscription::new());

    Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .route(
            "/api/admin/email-templates",
            get(rest::list_email_templates).post(rest::create_email_template),
        )
        .route(
            "/api/admin/email-templates/test-connection",
            get(rest::test_connection),
        )
        .route("/api/admin/templates/emails", get(rest::raw_email_templates))
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
}

/// Opens the [`tracing::Span`] of the provided HTTP request.
fn request_span<B>(req: &http::Request<B>) -> tracing::Span {
    let client_ip = InsecureClientIp::from(req.headers(), req.extensions())
        .map(|ip| ip.0.to_string())
        .ok();
    tracing::info_span!(
        "HTTP request",
        http.client_ip = client_ip,
        http.flavor = ?req.version(),
        http.method = req.method().as_str(),
        http.route = req
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str),
        http.target = req
            .uri()
            .path_and_query()
            .map(http::uri::PathAndQuery::as_str),
        http.user_agent = req
            .headers()
            .get(http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok()),
        http.status_code = tracing::field::Empty,
    )
}

/// Records the status of the provided HTTP response and the time it took.
fn record_response<B>(
    res: &http::Response<B>,
    took: time::Duration,
    span: &tracing::Span,
) {
    let status = res.status();
    _ = span.record("http.status_code", status.as_u16());

    let duration = format!("{}ms", took.as_millis());
    if status.is_client_error() || status.is_server_error() {
        log::error!(duration = duration.as_str());
    } else {
        log::info!(duration = duration.as_str());
    }
}
