//! Transport module - HTTP request abstraction and the reqwest client

pub mod http_transport;
pub mod traits;

pub use http_transport::ReqwestTransport;
pub use traits::{GatewayRequest, GatewayResponse, HttpTransport};
