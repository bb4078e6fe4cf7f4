mod api_request;
mod client;
mod error;
mod reqwest_transport;
