// The cache's view of the network: "give me the JSON at this key".

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;
use venntry_api::{ApiClient, Method};

use super::key::ResourceKey;
use crate::error::CoreError;

pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, key: &ResourceKey) -> BoxFuture<'static, Result<Value, CoreError>>;
}

/// Authenticated `GET` on the key's path.
impl Fetcher for ApiClient {
    fn fetch(&self, key: &ResourceKey) -> BoxFuture<'static, Result<Value, CoreError>> {
        let client = self.clone();
        let path = key.as_str().to_owned();
        async move {
            let raw = client.request(Method::GET, &path, None).await?;
            Ok(raw.json::<Value>()?)
        }
        .boxed()
    }
}
