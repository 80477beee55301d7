//! Skyline SDK - client for the building search API.

pub mod client;

pub use client::SkylineClient;
pub use skyline_core::{Action, BoundingBox, RouteResponse, SearchRequest};
