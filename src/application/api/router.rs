use std::{convert::Infallible, net::SocketAddr, time::Instant};

use bytes::Bytes;
use chrono::Local;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::{self, Body, Buf},
    header::{self, HeaderValue},
    server::conn::http1,
    Method, Request, Response, StatusCode,
};
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::{
    application::api::{
        logger::{self, RequestLog},
        person::person_router,
    },
    domain::person::PersonManager,
};

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

pub const GREETING: &str = "<h1>Hello World!</h1>";

/// Request bodies above 100kb are refused.
pub const MAX_BODY_SIZE: usize = 100 * 1024;

/// Failure answered to the client. A missing `error` means an empty body.
#[derive(Debug, Serialize, PartialEq)]
pub struct HttpError<'a> {
    #[serde(skip)]
    code: u16,
    error: Option<&'a str>,
}
impl<'a> HttpError<'a> {
    pub const fn new(code: u16, error: &'a str) -> Self {
        HttpError {
            code,
            error: Some(error),
        }
    }

    pub const fn empty(code: u16) -> Self {
        HttpError { code, error: None }
    }
}

pub const INTERNAL_ERROR: HttpError = HttpError::new(500, "internal error");

pub const NOT_FOUND_ERROR: HttpError = HttpError::empty(404);

pub const UNKNOWN_ENDPOINT_ERROR: HttpError = HttpError::new(404, "unknown endpoint");

pub const MALFORMATTED_ID_ERROR: HttpError = HttpError::new(400, "malformatted id");

pub const MALFORMATTED_BODY_ERROR: HttpError = HttpError::new(400, "malformatted body");

pub const PAYLOAD_TOO_LARGE_ERROR: HttpError = HttpError::new(413, "request entity too large");

/// Failure of the server itself, never answered to a client.
#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

/// Successful outcome of a route.
#[derive(Debug, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Html(String),
    NoContent,
}

fn with_content(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

impl From<ApiResponse> for Response<Full<Bytes>> {
    fn from(value: ApiResponse) -> Self {
        match value {
            ApiResponse::Json(json) => with_content(
                StatusCode::OK,
                "application/json",
                Bytes::from(json.to_string()),
            ),
            ApiResponse::Html(html) => {
                with_content(StatusCode::OK, "text/html; charset=utf-8", Bytes::from(html))
            }
            ApiResponse::NoContent => {
                let mut response = Response::new(Full::new(Bytes::new()));
                *response.status_mut() = StatusCode::NO_CONTENT;
                response
            }
        }
    }
}

impl From<HttpError<'static>> for Response<Full<Bytes>> {
    fn from(err: HttpError<'static>) -> Self {
        let status = StatusCode::from_u16(err.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match serde_json::to_string(&err) {
            Ok(json) if err.error.is_some() => {
                with_content(status, "application/json", Bytes::from(json))
            }
            _ => {
                let mut response = Response::new(Full::new(Bytes::new()));
                *response.status_mut() = status;
                response
            }
        }
    }
}

pub struct MainRouter {
    person_manager: PersonManager,
    port: u16,
}

impl MainRouter {
    pub fn new(person_manager: PersonManager, port: u16) -> Self {
        return Self {
            person_manager,
            port,
        };
    }

    /// Binds `0.0.0.0:<port>` and serves until Ctrl+C.
    pub async fn run(&self) -> Result<(), APIError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| APIError::ConfigurationError(e.to_string()))?;
        info!("Server running on port {}", self.port);
        tokio::select! {
            res = self.serve(listener) => res,
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                Ok(())
            }
        }
    }

    pub async fn serve(&self, listener: TcpListener) -> Result<(), APIError> {
        // We start a loop to continuously accept incoming connections
        loop {
            let (stream, _) = listener
                .accept()
                .await
                .map_err(|e| APIError::ConfigurationError(e.to_string()))?;

            // Use an adapter to access something implementing `tokio::io` traits as if they implement
            // `hyper::rt` IO traits.
            let io = TokioIo::new(stream);

            let person_manager_cloned = self.person_manager.clone();
            tokio::task::spawn(async move {
                let cors = CorsLayer::new()
                    .allow_origin(AllowOrigin::any())
                    .allow_methods(vec![
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers(vec![header::CONTENT_TYPE]);
                let routes = ServiceBuilder::new().layer(cors).service_fn(move |r| {
                    let person_manager_cloned = person_manager_cloned.clone();
                    async move {
                        Ok::<Response<Full<Bytes>>, Infallible>(
                            handle_request(r, person_manager_cloned).await,
                        )
                    }
                });
                // Logging wraps CORS so that preflights get their line too.
                let service = service_fn(move |r| {
                    let routes = routes.clone();
                    async move {
                        Ok::<Response<BoxBody>, Infallible>(log_request(r, routes).await)
                    }
                });
                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, TowerToHyperService::new(service))
                    .await
                {
                    warn!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Reads the JSON body, hands the request to `routes` and writes its access-log line.
async fn log_request<S>(request: Request<body::Incoming>, routes: S) -> Response<BoxBody>
where
    S: Service<Request<Value>, Response = Response<Full<Bytes>>, Error = Infallible>,
{
    let started = Instant::now();
    let method = request.method().clone();
    let url = match request.uri().path_and_query() {
        Some(val) => val.to_string(),
        None => request.uri().path().to_string(),
    };
    let (parts, body) = request.into_parts();
    let (response, body) = match read_json_body(body).await {
        Ok(json) => {
            let response = match routes.oneshot(Request::from_parts(parts, json.clone())).await {
                Ok(r) => r,
                Err(never) => match never {},
            };
            (response, Some(json))
        }
        Err(e) => (e.into(), None),
    };
    let size = response.body().size_hint().exact().unwrap_or(0);
    logger::log_request(RequestLog::new(
        &method,
        &url,
        response.status(),
        size,
        started.elapsed(),
        body.as_ref(),
    ));
    response.map(full)
}

async fn handle_request(
    request: Request<Value>,
    person_manager: PersonManager,
) -> Response<Full<Bytes>> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match route_requests(&method, &path, request.into_body(), &person_manager).await {
        Ok(r) => r.into(),
        Err(e) => e.into(),
    }
}

// A missing or unparsable body reads as `Null`.
async fn read_json_body<B>(body: B) -> Result<Value, HttpError<'static>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let whole_body = match Limited::new(body, MAX_BODY_SIZE).collect().await {
        Ok(collected) => collected.aggregate(),
        Err(e) if e.is::<LengthLimitError>() => return Err(PAYLOAD_TOO_LARGE_ERROR),
        Err(e) => {
            error!("An internal error occured while reading the body: {}", e);
            return Err(INTERNAL_ERROR);
        }
    };
    Ok(serde_json::from_reader(whole_body.reader()).unwrap_or(Value::Null))
}

pub async fn route_requests(
    method: &Method,
    path: &str,
    body: Value,
    person_manager: &PersonManager,
) -> Result<ApiResponse, HttpError<'static>> {
    let splitted_path: Vec<&str> = path.split("/").skip(1).collect();
    match splitted_path.as_slice() {
        [""] if method == Method::GET => Ok(ApiResponse::Html(GREETING.to_owned())),
        ["info"] if method == Method::GET => info(person_manager).await,
        ["api", "persons", rest @ ..] => {
            person_router::router(&rest.join("/"), method, body, person_manager).await
        }
        _ => Err(UNKNOWN_ENDPOINT_ERROR),
    }
}

async fn info(person_manager: &PersonManager) -> Result<ApiResponse, HttpError<'static>> {
    let count = person_manager.count_people().await?;
    let now = Local::now();
    Ok(ApiResponse::Html(format!(
        "<div><p>Phonebook has info for {} people</p></div><div><p>{}</p></div>",
        count,
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )))
}

fn full(body: Full<Bytes>) -> BoxBody {
    body.map_err(|never| match never {}).boxed()
}
