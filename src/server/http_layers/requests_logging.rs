//! Request logging middleware

use axum::extract::State;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode},
    middleware::Next,
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Bodies at least this long are summarised instead of printed.
const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

/// Reads the declared body length. Streamed downloads without a length are
/// never buffered.
fn declared_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get(header::CONTENT_LENGTH)
        .ok_or("no Content-Length, not buffered")?
        .to_str()
        .map_err(|_| "unreadable Content-Length")?
        .parse::<usize>()
        .map_err(|_| "non numeric Content-Length")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} Headers:", label);
    for (name, value) in headers {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Logs the body when it is small enough and hands back an equivalent one.
async fn log_body(label: &str, headers: &HeaderMap, body: Body) -> Result<Body, axum::Error> {
    let size = match declared_length(headers) {
        Ok(size) => size,
        Err(reason) => {
            info!("  {} Body: {}", label, reason);
            return Ok(body);
        }
    };
    if size >= MAX_LOGGABLE_BODY_LENGTH {
        info!(
            "  {} Body: {:#} not logged",
            label,
            byte_unit::Byte::from(size)
        );
        return Ok(body);
    }

    let bytes = axum::body::to_bytes(body, size).await?;
    info!("  {} Body:\n{}", label, String::from_utf8_lossy(&bytes));
    Ok(Body::from(bytes))
}

fn body_read_failure(label: &str, err: axum::Error) -> Response<Body> {
    error!("Failed to buffer {} body for logging: {:?}", label, err);
    let mut response = Response::new(Body::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

pub async fn log_requests(
    State(level): State<RequestsLoggingLevel>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if level == RequestsLoggingLevel::None {
        return next.run(request).await;
    }

    let started = Instant::now();
    info!(">>> {} {}", request.method(), request.uri());

    let (parts, body) = request.into_parts();
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", &parts.headers);
    }
    let body = if level >= RequestsLoggingLevel::Body {
        match log_body("Req", &parts.headers, body).await {
            Ok(body) => body,
            Err(err) => return body_read_failure("request", err),
        }
    } else {
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = response.into_parts();
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", &parts.headers);
    }
    let body = if level >= RequestsLoggingLevel::Body {
        match log_body("Resp", &parts.headers, body).await {
            Ok(body) => body,
            Err(err) => return body_read_failure("response", err),
        }
    } else {
        body
    };

    info!(
        "<<< {} ({}ms)",
        parts.status.as_u16(),
        started.elapsed().as_millis()
    );
    Response::from_parts(parts, body)
}
