use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes the HTTP requests issued by [`fetch_bytes`](super::fetch_bytes).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Lets one client be shared by concurrently spawned downloads.
#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.as_ref().execute(req).await
    }
}
