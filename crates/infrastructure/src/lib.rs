//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_token_store;
mod http_backoffice_client;
mod in_memory_token_store;
mod tracing_notice_sink;

pub use file_token_store::FileTokenStore;
pub use http_backoffice_client::HttpBackofficeClient;
pub use in_memory_token_store::InMemoryTokenStore;
pub use tracing_notice_sink::TracingNoticeSink;
