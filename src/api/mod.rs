pub mod client;
pub mod http;

pub use client::{today_local, ApiClient};
pub use http::Backend;
