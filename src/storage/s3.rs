//! S3客户端实现
//!
//! 基于 rust-s3，每次调用按桶名构造 Bucket 句柄（无网络IO）

use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::creds::Credentials as S3Credentials;
use s3::Region;

use super::{ObjectAcl, ObjectClient};
use crate::config::{Credentials, DEFAULT_ENDPOINT_HOST};
use crate::error::{Error, Result};

/// rust-s3 backed storage client / S3存储客户端
pub struct S3ObjectClient {
    region: Region,
    credentials: S3Credentials,
    tls_verify: bool,
}

impl S3ObjectClient {
    /// 创建S3客户端（不发起网络请求）
    pub fn new(
        region: &str,
        endpoint_host: &str,
        tls_verify: bool,
        credentials: Credentials,
    ) -> Result<Self> {
        let credentials = S3Credentials::new(
            Some(credentials.access_key()),
            Some(credentials.secret_key()),
            None,
            None,
            None,
        )
        .map_err(|e| Error::configuration(format!("创建S3凭证失败: {}", e)))?;

        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint_url(region, endpoint_host),
        };

        if !tls_verify {
            tracing::warn!("TLS certificate verification is disabled for {}", endpoint_host);
        }

        Ok(Self {
            region,
            credentials,
            tls_verify,
        })
    }

    /// 创建 Bucket 句柄
    fn bucket(&self, name: &str) -> Result<Bucket> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| Error::storage(format!("创建S3 Bucket失败: {}", e)))?;
        let bucket: Bucket = *bucket;

        if self.tls_verify {
            Ok(bucket)
        } else {
            bucket
                .set_dangerous_config(true, true)
                .map_err(|e| Error::storage(format!("配置S3 TLS失败: {}", e)))
        }
    }
}

/// Endpoint URL for a region / host pair / 端点地址
fn endpoint_url(region: &str, endpoint_host: &str) -> String {
    let host = endpoint_host.trim_end_matches('/');
    if host.is_empty() || host == DEFAULT_ENDPOINT_HOST {
        format!("https://s3.{}.amazonaws.com", region)
    } else if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// Non-2xx responses become storage errors (fail-on-err is off) / 非2xx状态码视为失败
fn check_status(action: &str, key: &str, code: u16) -> Result<()> {
    if (200..300).contains(&code) {
        Ok(())
    } else {
        Err(Error::storage(format!("{} {} failed with HTTP {}", action, key, code)))
    }
}

#[async_trait]
impl ObjectClient for S3ObjectClient {
    fn name(&self) -> &str {
        "S3"
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        acl: ObjectAcl,
    ) -> Result<()> {
        let mut bucket = self.bucket(bucket)?;
        bucket.add_header("x-amz-acl", acl.as_str());

        let response = bucket
            .put_object_with_content_type(key, &body, content_type)
            .await
            .map_err(|e| Error::storage(format!("上传S3对象失败: {}", e)))?;
        check_status("PutObject", key, response.status_code())
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let bucket = self.bucket(bucket)?;
        let response = bucket
            .get_object(key)
            .await
            .map_err(|e| Error::storage(format!("获取S3对象失败: {}", e)))?;
        check_status("GetObject", key, response.status_code())?;
        Ok(response.bytes().clone())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        let response = bucket
            .delete_object(key)
            .await
            .map_err(|e| Error::storage(format!("删除S3对象失败: {}", e)))?;
        check_status("DeleteObject", key, response.status_code())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let bucket = self.bucket(bucket)?;
        match bucket.head_object(key).await {
            Ok((_, 404)) => Ok(false),
            Ok((_, code)) => check_status("HeadObject", key, code).map(|_| true),
            Err(e) => Err(Error::storage(format!("查询S3对象失败: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("sa-east-1", "s3.amazonaws.com"), "https://s3.sa-east-1.amazonaws.com");
        assert_eq!(endpoint_url("us-east-1", ""), "https://s3.us-east-1.amazonaws.com");
        assert_eq!(endpoint_url("cn-hangzhou", "oss-cn-hangzhou.aliyuncs.com"), "https://oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(endpoint_url("us-east-1", "http://localhost:9000/"), "http://localhost:9000");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("GetObject", "a.txt", 200).is_ok());
        assert!(check_status("DeleteObject", "a.txt", 204).is_ok());
        assert!(matches!(check_status("GetObject", "a.txt", 404), Err(Error::Storage(_))));
        assert!(matches!(check_status("PutObject", "a.txt", 403), Err(Error::Storage(_))));
    }

    #[test]
    fn test_new_client_without_network() {
        let client = S3ObjectClient::new(
            "sa-east-1",
            "s3.amazonaws.com",
            true,
            Credentials::new("AK", "SK"),
        )
        .unwrap();
        assert_eq!(client.name(), "S3");
    }
}
