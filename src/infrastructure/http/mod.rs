//! HTTP client used to talk to identity providers and inventory endpoints

mod client;

pub use client::{
    content_type_essence, declared_charset, ByteStream, HttpClient, HttpClientTrait, HttpRequest, HttpResponse,
};

#[cfg(test)]
pub use client::mock;
