//! # S3 object storage
//!
//! Hosted-bucket backend. Public URLs are issued off a configured base URL
//! (bucket website endpoint or CDN front), not presigned.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use domains::{GatewayError, MediaStorage, Result};
use tracing::debug;

use crate::sniff::require_image;

pub struct S3MediaStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3MediaStorage {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client from the ambient AWS environment (credentials chain,
    /// region).
    pub async fn from_env(bucket: String, public_base_url: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, public_base_url)
    }
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn upload(&self, path: String, data: Bytes, content_type: mime::Mime) -> Result<()> {
        require_image(&data, &content_type)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&path)
            .content_type(content_type.as_ref())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        debug!(%path, bucket = %self.bucket, "stored upload");
        Ok(())
    }

    async fn remove(&self, path: String) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&path)
            .send()
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    fn storage_path(&self, public_url: &str) -> Option<String> {
        public_url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}
