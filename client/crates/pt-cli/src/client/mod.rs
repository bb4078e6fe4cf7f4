pub(crate) mod api_request;
pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod reqwest_transport;
pub(crate) mod transport;
pub(crate) mod transport_refresher;

pub use api_request::{ApiRequest, ApiResponse};
pub use client::{Client, REFRESH_PATH};
pub use error::{ClientError, Result as CliClientResult};
pub use reqwest_transport::ReqwestTransport;
pub use transport::Transport;
pub use transport_refresher::TransportRefresher;
