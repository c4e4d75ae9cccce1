//! HTTP server wiring for the footer endpoint

use std::convert::Infallible;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::api::error::ApiError;
use crate::api::footer::{FooterQuery, footer_html};
use crate::config::Settings;
use crate::render::Renderer;
use crate::store::ProjectStore;
use crate::store::sqlite::SqliteStore;

/// Shared request-handling state
pub struct AppState<S> {
    pub store: S,
    pub renderer: Renderer,
    pub settings: Settings,
}

/// Open the registry and serve until the process is stopped.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let store = SqliteStore::new(&settings.database_path())?;
    let renderer = Renderer::new()?;
    let state = Arc::new(AppState {
        store,
        renderer,
        settings,
    });
    serve(state).await
}

/// Bind the configured address and serve.
pub async fn serve<S: ProjectStore>(state: Arc<AppState<S>>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(state.settings.bind_addr).await?;
    serve_with_listener(listener, state).await
}

/// Accept loop on an already-bound listener; one tokio task per connection.
pub async fn serve_with_listener<S: ProjectStore>(
    listener: TcpListener,
    state: Arc<AppState<S>>,
) -> anyhow::Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);

    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |request| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle_request(&state, request)) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!("Connection error from {}: {}", remote_addr, e);
            }
        });
    }
}

fn handle_request<S: ProjectStore>(
    state: &AppState<S>,
    request: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let path = request.uri().path();
    let is_footer = path == "/api/v2/footer_html" || path == "/api/v2/footer_html/";

    if !is_footer {
        return error_response(ApiError::NotFound);
    }
    if request.method() != Method::GET {
        return error_response(ApiError::MethodNotAllowed);
    }

    let query = FooterQuery::from_query(request.uri().query().unwrap_or(""));
    footer_html(&state.store, &state.renderer, &state.settings, &query)
        .and_then(|response| Ok(serde_json::to_vec(&response)?))
        .map(|body| json_response(StatusCode::OK, body))
        .unwrap_or_else(error_response)
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    response
}

fn error_response(error: ApiError) -> Response<Full<Bytes>> {
    let status = error.status();
    if status.is_server_error() {
        error!("Request failed: {}", error);
    }
    let body = serde_json::json!({ "detail": error.detail() });
    json_response(status, body.to_string().into_bytes())
}
