//! The binary RPC front-end.

use crate::validate::validate_url;
use shortloop_core::{ShortenError, Shortener};
use shortloop_proto_schema::v1 as proto;
use shortloop_proto_schema::v1::url_shortener_server::UrlShortener;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::debug;

pub use shortloop_proto_schema::v1::url_shortener_server::UrlShortenerServer;

pub struct UrlShortenerGrpc {
    shortener: Arc<dyn Shortener>,
}

impl UrlShortenerGrpc {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self { shortener }
    }
}

#[tonic::async_trait]
impl UrlShortener for UrlShortenerGrpc {
    async fn shorten(
        &self,
        request: Request<proto::ShortenRequest>,
    ) -> Result<Response<proto::ShortenResponse>, Status> {
        let request = request.into_inner();
        debug!(url = %request.url, "grpc shorten request");

        validate_url(&request.url).map_err(Status::invalid_argument)?;

        let short_url = self
            .shortener
            .shorten(&request.url)
            .await
            .map_err(to_status)?;

        Ok(Response::new(proto::ShortenResponse { short_url }))
    }

    async fn resolve(
        &self,
        request: Request<proto::ResolveRequest>,
    ) -> Result<Response<proto::ResolveResponse>, Status> {
        let request = request.into_inner();
        debug!(short_url = %request.short_url, "grpc resolve request");

        let original_url = self
            .shortener
            .resolve(&request.short_url)
            .await
            .map_err(to_status)?;

        Ok(Response::new(proto::ResolveResponse { original_url }))
    }
}

fn to_status(err: ShortenError) -> Status {
    match &err {
        ShortenError::AlreadyExists => Status::already_exists(err.to_string()),
        ShortenError::NotFound => Status::not_found(err.to_string()),
        ShortenError::Unavailable(_) => Status::unavailable(err.to_string()),
        ShortenError::GenerationFailed(_) => Status::internal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortloop_engine::{RandomGenerator, ShortenerService};
    use shortloop_storage::InMemoryRepository;
    use tonic::Code;

    fn test_server() -> UrlShortenerGrpc {
        let service = ShortenerService::new(
            InMemoryRepository::new(),
            RandomGenerator::new(10).unwrap(),
        );
        UrlShortenerGrpc::new(Arc::new(service))
    }

    #[tokio::test]
    async fn shorten_returns_a_code() {
        let server = test_server();

        let response = server
            .shorten(Request::new(proto::ShortenRequest {
                url: "https://example.com".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(response.get_ref().short_url.len(), 10);
    }

    #[tokio::test]
    async fn shorten_then_resolve_round_trips() {
        let server = test_server();

        let shortened = server
            .shorten(Request::new(proto::ShortenRequest {
                url: "https://example.com".to_string(),
            }))
            .await
            .unwrap();

        let resolved = server
            .resolve(Request::new(proto::ResolveRequest {
                short_url: shortened.get_ref().short_url.clone(),
            }))
            .await
            .unwrap();

        assert_eq!(resolved.get_ref().original_url, "https://example.com");
    }

    #[tokio::test]
    async fn invalid_url_is_invalid_argument() {
        let server = test_server();

        let status = server
            .shorten(Request::new(proto::ShortenRequest {
                url: "not-a-url".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn duplicate_shorten_is_already_exists() {
        let server = test_server();
        let request = || {
            Request::new(proto::ShortenRequest {
                url: "https://example.com".to_string(),
            })
        };

        server.shorten(request()).await.unwrap();
        let status = server.shorten(request()).await.unwrap_err();

        assert_eq!(status.code(), Code::AlreadyExists);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let server = test_server();

        let status = server
            .resolve(Request::new(proto::ResolveRequest {
                short_url: "never-inserted".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
    }
}
