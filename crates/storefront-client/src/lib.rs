//! Typed HTTP client for the storefront API.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use storefront_types::domain::checkout::{CheckoutPayload, CheckoutReceipt};
use storefront_types::domain::order::Order;
use storefront_types::domain::product::{NewProduct, Product, ProductId};
use uuid::Uuid;

#[derive(Clone)]
pub struct StorefrontClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct StorefrontClient {
    base: Url,
    client: reqwest::Client,
}

impl StorefrontClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<StorefrontClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(StorefrontClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    /// Sends the request and decodes a 2xx body. Any other status is an
    /// error carrying that status.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        let res = request.send().await?.error_for_status()?;
        tracing::debug!(status = %res.status(), url = %res.url(), "storefront response");
        Ok(res.json().await?)
    }

    pub async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        self.fetch(self.client.get(self.url("products")?)).await
    }

    pub async fn get_product(&self, id: ProductId) -> anyhow::Result<Product> {
        self.fetch(self.client.get(self.url(&format!("products/{id}"))?))
            .await
    }

    pub async fn create_product(&self, product: &NewProduct) -> anyhow::Result<Product> {
        self.fetch(self.client.post(self.url("products")?).json(product))
            .await
    }

    pub async fn checkout(&self, payload: &CheckoutPayload) -> anyhow::Result<CheckoutReceipt> {
        self.fetch(self.client.post(self.url("orders/checkout")?).json(payload))
            .await
    }

    pub async fn get_order(&self, order_number: Uuid) -> anyhow::Result<Order> {
        self.fetch(self.client.get(self.url(&format!("orders/{order_number}"))?))
            .await
    }

    /// Newest first.
    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        self.fetch(self.client.get(self.url("orders")?)).await
    }
}

impl StorefrontClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let name = HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Uses `client` as is; headers and timeout set on the builder are ignored.
    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<StorefrontClient> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder().default_headers(self.headers);
                if let Some(t) = self.timeout {
                    builder = builder.timeout(t);
                }
                builder.build()?
            }
        };
        Ok(StorefrontClient {
            base: self.base,
            client,
        })
    }
}
