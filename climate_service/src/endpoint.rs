/// HTTP endpoint for querying the climate dataset
///
/// Read-only JSON API over stations and measurements.
///
/// Endpoints:
/// - GET /                          - Route listing (text/html)
/// - GET /api/v1.0/precipitation    - Date → precipitation since the cutoff
/// - GET /api/v1.0/stations         - All station identifiers
/// - GET /api/v1.0/tobs             - Most active station's observations since the cutoff
/// - GET /api/v1.0/{start}          - TMIN/TAVG/TMAX for date >= start
/// - GET /api/v1.0/{start}/{end}    - TMIN/TAVG/TMAX for start <= date <= end
/// - GET /health                    - Service health check

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::analysis::groupings;
use crate::config::ServerConfig;
use crate::error::ServiceError;
use crate::model::{DateRange, LAST_12_MONTHS_START};
use crate::store::{ClimateStore, StoreError};

/// Prefix shared by every data route.
pub const API_PREFIX: &str = "/api/v1.0/";

const WELCOME_TEXT: &str = "Welcome to the Climate App!<br/>\
    Available Routes:<br/>\
    /api/v1.0/precipitation<br/>\
    /api/v1.0/stations<br/>\
    /api/v1.0/tobs<br/>\
    /api/v1.0/<start><br/>\
    /api/v1.0/<start>/<end>";

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/{start}",
    "/api/v1.0/{start}/{end}",
    "/health",
];

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A parsed request path.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Welcome,
    Health,
    Precipitation,
    Stations,
    Tobs,
    TemperatureStats(DateRange),
    NotFound,
}

impl Route {
    /// Parses a request URL. The query string is ignored and path segments
    /// are percent-decoded; dates are not validated.
    pub fn parse(url: &str) -> Route {
        let path = url.split('?').next().unwrap_or_default();

        match path {
            "/" => return Route::Welcome,
            "/health" => return Route::Health,
            _ => {}
        }

        let Some(rest) = path.strip_prefix(API_PREFIX) else {
            return Route::NotFound;
        };

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            match urlencoding::decode(raw) {
                Ok(segment) if !segment.is_empty() => segments.push(segment.into_owned()),
                _ => return Route::NotFound,
            }
        }

        match segments.as_slice() {
            [name] if name == "precipitation" => Route::Precipitation,
            [name] if name == "stations" => Route::Stations,
            [name] if name == "tobs" => Route::Tobs,
            [start] => Route::TemperatureStats(DateRange::starting(start.as_str())),
            [start, end] => Route::TemperatureStats(DateRange::between(start.as_str(), end.as_str())),
            _ => Route::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Status, content type and body of a reply, before it is handed to tiny_http.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
        }
    }

    /// JSON response; serialization failure degrades to a 500.
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                Self::internal_error()
            }
        }
    }

    fn internal_error() -> Self {
        Self {
            status: 500,
            content_type: "application/json",
            body: r#"{"error": "Internal Server Error"}"#.to_string(),
        }
    }

    fn not_found() -> Self {
        Self::json(
            404,
            &serde_json::json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS
            }),
        )
    }

    fn method_not_allowed(method: &Method) -> Self {
        Self::json(
            405,
            &serde_json::json!({
                "error": "Method not allowed",
                "method": method.to_string()
            }),
        )
    }

    fn into_tiny_http(self) -> Response<Cursor<Vec<u8>>> {
        let response = Response::from_data(self.body.into_bytes())
            .with_status_code(StatusCode::from(self.status));

        match Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

/// Process-level facts reported by `/health`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub started_at: DateTime<Utc>,
}

impl ServiceInfo {
    pub fn now() -> Self {
        Self { started_at: Utc::now() }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Routes one request to its handler and renders the reply.
pub fn handle_request<S: ClimateStore>(
    store: &mut S,
    info: &ServiceInfo,
    method: &Method,
    url: &str,
) -> ApiResponse {
    if !matches!(method, Method::Get | Method::Head) {
        return ApiResponse::method_not_allowed(method);
    }

    let result = match Route::parse(url) {
        Route::Welcome => Ok(ApiResponse::html(WELCOME_TEXT)),
        Route::Health => Ok(handle_health(info)),
        Route::Precipitation => handle_precipitation(store),
        Route::Stations => handle_stations(store),
        Route::Tobs => handle_tobs(store),
        Route::TemperatureStats(range) => handle_temperature_stats(store, &range),
        Route::NotFound => Ok(ApiResponse::not_found()),
    };

    result.unwrap_or_else(|e| {
        tracing::error!("{} {} failed: {}", method, url, e);
        ApiResponse::internal_error()
    })
}

/// Handle /health endpoint
fn handle_health(info: &ServiceInfo) -> ApiResponse {
    ApiResponse::json(
        200,
        &serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": info.started_at
        }),
    )
}

/// Handle /api/v1.0/precipitation
fn handle_precipitation<S: ClimateStore>(store: &mut S) -> Result<ApiResponse, StoreError> {
    let readings = store.precipitation_since(LAST_12_MONTHS_START)?;
    Ok(ApiResponse::json(200, &groupings::precipitation_by_date(readings)))
}

/// Handle /api/v1.0/stations
fn handle_stations<S: ClimateStore>(store: &mut S) -> Result<ApiResponse, StoreError> {
    let stations = store.stations()?;
    Ok(ApiResponse::json(200, &groupings::station_ids(stations)))
}

/// Handle /api/v1.0/tobs
fn handle_tobs<S: ClimateStore>(store: &mut S) -> Result<ApiResponse, StoreError> {
    let Some(active) = store.most_active_station()? else {
        tracing::debug!("No measurements stored; tobs is empty");
        return Ok(ApiResponse::json(200, &serde_json::json!([])));
    };

    tracing::debug!(
        "Most active station {} ({} observations)",
        active.station_id,
        active.observation_count
    );

    let observations = store.temperature_observations(&active.station_id, LAST_12_MONTHS_START)?;
    Ok(ApiResponse::json(200, &observations))
}

/// Handle /api/v1.0/{start} and /api/v1.0/{start}/{end}
fn handle_temperature_stats<S: ClimateStore>(
    store: &mut S,
    range: &DateRange,
) -> Result<ApiResponse, StoreError> {
    let stats = store.temperature_stats(range)?;
    Ok(ApiResponse::json(200, &stats))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server and serve requests until the listener closes
pub fn start_endpoint_server<S: ClimateStore>(
    config: &ServerConfig,
    mut store: S,
) -> Result<(), ServiceError> {
    let address = config.bind_address();
    let server = Server::http(&address).map_err(|e| ServiceError::Server {
        address: address.clone(),
        reason: e.to_string(),
    })?;

    let info = ServiceInfo::now();
    tracing::info!("HTTP endpoint listening on http://{}", address);

    for request in server.incoming_requests() {
        respond(&mut store, &info, request);
    }

    Ok(())
}

fn respond<S: ClimateStore>(store: &mut S, info: &ServiceInfo, request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let reply = handle_request(store, info, &method, &url);
    tracing::debug!("{} {} -> {}", method, url, reply.status);

    if let Err(e) = request.respond(reply.into_tiny_http()) {
        tracing::warn!("Failed to send response: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
