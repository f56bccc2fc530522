//! MinIO/S3-compatible storage client
//!
//! Stores submission images and avatars under a world-readable prefix
//! of a single bucket. Uses rust-s3 crate for lightweight S3 operations.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// An object waiting to be uploaded
#[derive(Debug, Clone)]
pub struct PendingObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    /// Access key for AWS Signature v4 signing
    access_key: String,
    /// Secret key for AWS Signature v4 signing
    secret_key: String,
    /// Region name for AWS Signature v4 signing
    region_name: String,
    /// HTTP client for bucket policy operations
    http_client: Client,
}

impl MinIOClient {
    /// Create a client from configuration without touching the network.
    /// Call [`MinIOClient::prepare`] once at startup to create the bucket.
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

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        })
    }

    /// Create the bucket if needed and open the public prefix for anonymous reads
    pub async fn prepare(&self) -> Result<(), AppError> {
        self.ensure_bucket_exists().await?;
        self.set_public_read_policy().await?;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            self.endpoint,
            self.bucket.name(),
            self.public_prefix
        );

        Ok(())
    }

    /// Ensure the bucket exists, create if not
    async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        // An "already exists" error from MinIO is fine
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), AppError> {
        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    /// Allow anonymous `GetObject` on `<public_prefix>/*`
    async fn set_public_read_policy(&self) -> Result<(), AppError> {
        let bucket_name = self.bucket.name();
        let public_prefix = &self.public_prefix;

        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{bucket_name}/{public_prefix}/*")]
                }
            ]
        });

        match self
            .put_bucket_policy_with_sigv4(&bucket_name, &policy.to_string())
            .await
        {
            Ok(_) => {
                info!(
                    "Set public read policy for {}/{}/*",
                    bucket_name, public_prefix
                );
            }
            Err(e) => {
                // Startup continues; the policy can be set by hand
                warn!(
                    "Failed to set bucket policy for '{}': {}. \
                    You may need to set the policy manually using: \
                    mc anonymous set download minio/{}/{}",
                    bucket_name, e, bucket_name, public_prefix
                );
            }
        }
        Ok(())
    }

    /// Put bucket policy using AWS Signature v4
    async fn put_bucket_policy_with_sigv4(
        &self,
        bucket_name: &str,
        policy: &str,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let url = format!("{}/{}?policy", self.endpoint, bucket_name);
        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));

        let canonical_uri = format!("/{}", bucket_name);
        let canonical_querystring = "policy=";
        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host_header, payload_hash, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";

        let canonical_request = format!(
            "PUT\n{}\n{}\n{}\n{}\n{}",
            canonical_uri, canonical_querystring, canonical_headers, signed_headers, payload_hash
        );

        let algorithm = "AWS4-HMAC-SHA256";
        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let canonical_request_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            algorithm, amz_date, credential_scope, canonical_request_hash
        );

        let signature = self.calculate_signature(&date_stamp, &string_to_sign)?;

        let authorization_header = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            algorithm, self.access_key, credential_scope, signed_headers, signature
        );

        let response = self
            .http_client
            .put(&url)
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization_header)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::Internal(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )))
        }
    }

    /// Calculate AWS Signature v4 signature
    fn calculate_signature(
        &self,
        date_stamp: &str,
        string_to_sign: &str,
    ) -> Result<String, AppError> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        let signature = Self::hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }

    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Object key under the public prefix, e.g. `public/reports/<id>/image-1.jpg`
    pub fn public_key(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path.trim_start_matches('/'))
    }

    /// Upload a single object, returning its key
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload file '{}': {}", key, e))
            })?;
        ensure_success(response.status_code(), "upload", key)?;

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());
        Ok(key.to_string())
    }

    /// Upload a batch of objects in order. If one upload fails, objects
    /// already stored by this call are deleted before the error is returned.
    pub async fn upload_all(&self, objects: Vec<PendingObject>) -> Result<Vec<String>, AppError> {
        let mut uploaded = Vec::with_capacity(objects.len());

        for object in objects {
            match self
                .upload(&object.key, object.data, &object.content_type)
                .await
            {
                Ok(key) => uploaded.push(key),
                Err(e) => {
                    warn!(
                        "Upload of '{}' failed, removing {} already uploaded object(s)",
                        object.key,
                        uploaded.len()
                    );
                    self.delete_all(&uploaded).await;
                    return Err(e);
                }
            }
        }

        Ok(uploaded)
    }

    /// Delete a file from the storage
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self.bucket.delete_object(key).await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to delete file '{}': {}", key, e))
        })?;
        ensure_success(response.status_code(), "delete", key)?;

        debug!(
            "Deleted file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }

    /// Best-effort removal; failures are logged and skipped
    pub async fn delete_all(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                warn!("Failed to clean up object '{}': {}", key, e);
            }
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Public URL of an object
    pub fn get_file_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    /// Extract the object key from a URL produced by this client
    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.public_endpoint, &self.endpoint]
            .iter()
            .map(|endpoint| format!("{}/{}/", endpoint, bucket))
            .find_map(|prefix| url.strip_prefix(prefix.as_str()).map(str::to_string))
    }
}

/// Object requests report failures through the HTTP status, not as errors
fn ensure_success(status: u16, action: &str, key: &str) -> Result<(), AppError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AppError::ExternalServiceError(format!(
            "Failed to {} file '{}': storage responded with HTTP {}",
            action, key, status
        )))
    }
}

#[cfg(test)]
pub fn test_client() -> MinIOClient {
    test_client_for("http://localhost:9000")
}

#[cfg(test)]
fn test_client_for(endpoint: &str) -> MinIOClient {
    MinIOClient::new(MinIOConfig {
        endpoint: endpoint.to_string(),
        public_endpoint: "https://cdn.example.com/".to_string(),
        access_key: "minioadmin".to_string(),
        secret_key: "minioadmin".to_string(),
        bucket: "water-guard".to_string(),
        region: "us-east-1".to_string(),
        public_prefix: "public".to_string(),
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP request (head and body) and returns its request line
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return String::new();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        head.lines().next().unwrap_or_default().to_string()
    }

    /// Local S3 endpoint answering each request with the status picked by
    /// `respond`. Returns the endpoint URL and the request lines it received.
    async fn stub_storage<F>(respond: F) -> (String, Arc<Mutex<Vec<String>>>)
    where
        F: Fn(&str) -> u16 + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                let status = respond(&request);
                log.lock().unwrap().push(request);

                let body = if status < 300 {
                    ""
                } else {
                    "<Error><Code>AccessDenied</Code><Message>Access Denied.</Message></Error>"
                };
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (endpoint, seen)
    }

    fn pending(key: &str) -> PendingObject {
        PendingObject {
            key: key.to_string(),
            data: vec![0x89, b'P', b'N', b'G'],
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rejected_upload_is_an_error() {
        let (endpoint, _) = stub_storage(|_| 403).await;
        let client = test_client_for(&endpoint);

        let result = client
            .upload_all(vec![pending("public/reports/x/image-1.png")])
            .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_failed_batch_removes_stored_objects() {
        let (endpoint, seen) = stub_storage(|request| {
            if request.starts_with("PUT") && request.contains("image-2.png") {
                500
            } else {
                200
            }
        })
        .await;
        let client = test_client_for(&endpoint);

        let result = client
            .upload_all(vec![
                pending("public/reports/x/image-1.png"),
                pending("public/reports/x/image-2.png"),
                pending("public/reports/x/image-3.png"),
            ])
            .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));

        let seen = seen.lock().unwrap();
        let deleted: Vec<&String> = seen.iter().filter(|r| r.starts_with("DELETE")).collect();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].contains("image-1.png"));
        assert!(!seen.iter().any(|r| r.contains("image-3.png")));
    }

    #[tokio::test]
    async fn test_rejected_delete_is_an_error() {
        let (endpoint, _) = stub_storage(|_| 500).await;
        let client = test_client_for(&endpoint);

        let result = client.delete("public/avatars/u/avatar.png").await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[test]
    fn test_success_statuses() {
        assert!(ensure_success(200, "upload", "k").is_ok());
        assert!(ensure_success(204, "delete", "k").is_ok());
        assert!(ensure_success(403, "upload", "k").is_err());
        assert!(ensure_success(500, "delete", "k").is_err());
    }

    #[test]
    fn test_public_key() {
        let client = test_client();
        assert_eq!(
            client.public_key("reports/abc/image-1.jpg"),
            "public/reports/abc/image-1.jpg"
        );
        assert_eq!(client.public_key("/avatars/u/avatar.png"), "public/avatars/u/avatar.png");
    }

    #[test]
    fn test_file_url_round_trip() {
        let client = test_client();
        let url = client.get_file_url("public/news/n1/image-2.png");
        assert_eq!(url, "https://cdn.example.com/water-guard/public/news/n1/image-2.png");
        assert_eq!(
            client.extract_key_from_url(&url).as_deref(),
            Some("public/news/n1/image-2.png")
        );
    }

    #[test]
    fn test_extract_key_from_internal_endpoint() {
        let client = test_client();
        assert_eq!(
            client
                .extract_key_from_url("http://localhost:9000/water-guard/public/a.png")
                .as_deref(),
            Some("public/a.png")
        );
        assert_eq!(client.extract_key_from_url("https://elsewhere/x.png"), None);
    }
}
