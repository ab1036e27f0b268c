/// climate_service: read-only JSON API over a climate-observations dataset.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model     — table structs (Station, Measurement), row and response types
/// ├── config    — service configuration loader (climate.toml) + DATABASE_URL
/// ├── db        — connection and schema validation
/// ├── error     — top-level ServiceError
/// ├── store
/// │   ├── pg       — ClimateStore over PostgreSQL
/// │   └── fixtures (test only) — in-memory ClimateStore
/// ├── analysis
/// │   └── groupings — reshapes query rows into response shapes
/// └── endpoint  — routing and HTTP server
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod store;
