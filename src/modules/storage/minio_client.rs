use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use tracing::{debug, info, warn};

use super::object_store::ObjectStore;
use super::sigv4::SigV4Signer;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO client over `rust-s3`, path-style addressing.
///
/// Every object FireSafe writes lives under the public prefix and is served
/// straight from `public_endpoint`.
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    signer: SigV4Signer,
    http_client: Client,
}

impl MinIOClient {
    pub fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            signer: SigV4Signer::s3(&config.access_key, &config.secret_key, &config.region),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
            http_client,
        })
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Create the bucket if needed and open the public prefix for anonymous reads.
    ///
    /// Neither step fails startup: both are logged and can be fixed by hand.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        match Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        {
            Ok(_) => info!("Bucket '{}' created", self.bucket.name()),
            Err(e) => {
                let message = e.to_string();
                if message.contains("BucketAlreadyOwnedByYou")
                    || message.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }

        if let Err(e) = self.put_public_read_policy().await {
            warn!(
                "Failed to set bucket policy for '{}': {}. Run `mc anonymous set download minio/{}/{}` manually.",
                self.bucket.name(),
                e,
                self.bucket.name(),
                self.public_prefix
            );
        }

        Ok(())
    }

    async fn put_public_read_policy(&self) -> Result<(), AppError> {
        let bucket_name = self.bucket.name();
        let policy = public_read_policy(&bucket_name, &self.public_prefix).to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let signed = self.signer.sign(
            "PUT",
            &host_header,
            &format!("/{}", bucket_name),
            "policy=",
            policy.as_bytes(),
            Utc::now(),
        )?;

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &host_header)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.payload_hash)
            .header("Authorization", &signed.authorization)
            .header("Content-Type", "application/json")
            .body(policy)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )));
        }

        info!(
            "Set public read policy for {}/{}/*",
            bucket_name, self.public_prefix
        );
        Ok(())
    }

    fn url_base(&self) -> String {
        format!("{}/{}/", self.public_endpoint, self.bucket.name())
    }
}

fn public_read_policy(bucket_name: &str, public_prefix: &str) -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{bucket_name}/{public_prefix}/*")]
            }
        ]
    })
}

#[async_trait]
impl ObjectStore for MinIOClient {
    fn public_key(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path.trim_start_matches('/'))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.url_base(), key)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_base())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload '{}': {}", key, e))
            })?;

        debug!("Uploaded '{}' ({} bytes)", key, data.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.bucket.delete_object(key).await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to delete '{}': {}", key, e))
        })?;

        debug!("Deleted '{}'", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MinIOClient {
        MinIOClient::new(MinIOConfig {
            endpoint: "http://minio:9000".to_string(),
            public_endpoint: "https://files.firesafe.test/".to_string(),
            access_key: "minio".to_string(),
            secret_key: "minio-secret".to_string(),
            bucket: "firesafe".to_string(),
            region: "us-east-1".to_string(),
            public_prefix: "public".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_public_url_round_trips_to_key() {
        let client = client();
        let key = client.public_key("visit_reports/abc/Rapport.pdf");
        assert_eq!(key, "public/visit_reports/abc/Rapport.pdf");

        let url = client.public_url(&key);
        assert_eq!(
            url,
            "https://files.firesafe.test/firesafe/public/visit_reports/abc/Rapport.pdf"
        );
        assert_eq!(client.key_from_url(&url), Some(key));
    }

    #[test]
    fn test_foreign_urls_have_no_key() {
        let client = client();
        assert_eq!(client.key_from_url("https://elsewhere.test/x.pdf"), None);
        assert_eq!(
            client.key_from_url("https://files.firesafe.test/firesafe/"),
            None
        );
    }

    #[test]
    fn test_policy_targets_public_prefix() {
        let policy = public_read_policy("firesafe", "public");
        assert_eq!(
            policy["Statement"][0]["Resource"][0],
            "arn:aws:s3:::firesafe/public/*"
        );
    }
}
