// grapevine-api: Async transport plumbing for the Grapevine RSS aggregation API

pub mod auth;
pub mod error;
pub mod http;
pub mod paths;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use error::Error;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, TlsMode, Transport, TransportConfig};
pub use types::ItemFlag;
