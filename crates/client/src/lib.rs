//! HTTP client for the video-translation backend.
//!
//! Provides the typed wire protocol, the fixed translate parameter set,
//! the reqwest-based API wrapper, and the [`backend::Backend`] trait the
//! runner is written against.

pub mod api;
pub mod backend;
pub mod params;
pub mod protocol;
