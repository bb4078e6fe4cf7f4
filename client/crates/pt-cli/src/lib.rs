//! pt-cli library
//!
//! Exports the HTTP client, its transport seam, and the refresher that keeps
//! the session alive, for the `pay` binary and for tests.

pub mod client;

#[cfg(test)]
mod tests;

pub use client::{
    ApiRequest, ApiResponse, CliClientResult, Client, ClientError, REFRESH_PATH,
    ReqwestTransport, Transport, TransportRefresher,
};
