use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{interpret, ApiResponse, HttpMethod, HttpRequest, HttpResponse};

/// Executes HTTP requests. Implementations do the network I/O only; status
/// handling and body decoding are shared in [`Transport::send`].
pub trait Transport: Send + Sync {
    /// Perform `request` and return whatever the server answered, including
    /// non-2xx responses.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// Build, execute and interpret one API call.
    fn send(
        &self,
        config: &ClientConfig,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let request = HttpRequest::build(config, method, endpoint, body)?;
        debug!(%method, endpoint, has_body = request.body.is_some(), "sending request");
        let response = self.execute(&request)?;
        interpret(&request, response)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}
