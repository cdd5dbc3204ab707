//! AMap geocoding, routing, POI search and region lookup as callable tools.
//!
//! Each operation takes loosely-typed caller input, validates it into a
//! typed record, calls the provider once, and returns a simplified result
//! inside a uniform [`ResponseEnvelope`](types::ResponseEnvelope).

pub mod config;
pub mod endpoint;
pub mod error;
pub mod input;
pub mod params;
pub mod query;
pub mod serve;
pub mod service;
pub mod simplify;
pub mod tools;
pub mod transport;
pub mod types;
pub mod validate;
