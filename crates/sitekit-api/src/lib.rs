// sitekit-api: async request gateway for the sitekit REST backend

pub mod error;
pub mod gateway;
pub mod http;
pub mod transport;

pub use error::Error;
pub use gateway::{QueryParams, RequestGateway};
pub use http::HttpGateway;
pub use transport::{TlsMode, TransportConfig};
