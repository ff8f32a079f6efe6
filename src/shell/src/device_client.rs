use crate::config::DeviceConfig;
use anyhow::{Context, Result};
use crux_http::{
    HttpError,
    protocol::{HttpRequest, HttpResponse, HttpResult},
};
use light_panel_core::BASE_URL;
use log::{debug, info, warn};
use reqwest::{Client, Method, Url};
use trait_variant::make;

/// Executes the HTTP requests the core builds for the device
#[make(Send)]
pub trait DeviceTransport {
    async fn send(&self, request: HttpRequest) -> HttpResult;
}

#[derive(Clone)]
pub struct DeviceClient {
    client: Client,
    base_url: Url,
}

impl DeviceClient {
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to create device HTTP client")?;

        Ok(DeviceClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Map a core request URL (`https://relative/...`) onto the configured device
    pub fn device_url(&self, url: &str) -> Result<Url> {
        let path = url
            .strip_prefix(BASE_URL)
            .with_context(|| format!("unexpected request url: {url}"))?;
        let path = format!("/{}", path.trim_start_matches('/'));
        let base = self.base_url.as_str().trim_end_matches('/');

        Url::parse(&format!("{base}{path}"))
            .with_context(|| format!("failed to build device url for {path}"))
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = self.device_url(&request.url)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .with_context(|| format!("invalid HTTP method: {}", request.method))?;
        // bodies may carry Wi-Fi credentials and are never logged
        info!("{method} {url}");

        let mut builder = self.client.request(method, url.clone());
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        let res = builder
            .body(request.body.clone())
            .send()
            .await
            .with_context(|| format!("failed to send request to {url}"))?;

        let status = res.status();
        let mut response = HttpResponse::status(status.as_u16());
        for (name, value) in res.headers() {
            if let Ok(value) = value.to_str() {
                response.header(name.as_str(), value);
            }
        }

        let body = res
            .bytes()
            .await
            .with_context(|| format!("failed to read response body from {url}"))?;
        debug!("{url} responded with {status}");

        Ok(response.body(body.to_vec()).build())
    }
}

impl DeviceTransport for DeviceClient {
    async fn send(&self, request: HttpRequest) -> HttpResult {
        match self.execute(&request).await {
            Ok(response) => HttpResult::Ok(response),
            Err(e) => {
                warn!("{} {} failed: {e:#}", request.method, request.url);
                HttpResult::Err(HttpError::Io(format!("{e:#}")))
            }
        }
    }
}
