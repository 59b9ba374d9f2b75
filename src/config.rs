//! Facade configuration / 门面配置
//!
//! `FacadeConfig` is what callers hand in (credentials included).
//! It is split once into `Credentials` and `StorageSettings`; only the
//! secret-free settings are kept by the facade afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default region / 默认区域
pub const DEFAULT_REGION: &str = "sa-east-1";

/// Default endpoint host (AWS) / 默认端点
pub const DEFAULT_ENDPOINT_HOST: &str = "s3.amazonaws.com";

/// Environment variable overriding the config file path / 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "S3_FACADE_CONFIG";

/// Input configuration (holds credentials) / 输入配置（包含凭证）
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacadeConfig {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_endpoint_host")]
    pub endpoint_host: String,
    #[serde(default)]
    pub tls_verify: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_endpoint_host() -> String {
    DEFAULT_ENDPOINT_HOST.to_string()
}

impl FacadeConfig {
    pub fn new(access_key: &str, secret_key: &str, bucket: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            bucket: bucket.to_string(),
            region: default_region(),
            endpoint_host: default_endpoint_host(),
            tls_verify: false,
        }
    }

    pub fn region(mut self, val: &str) -> Self {
        self.region = val.to_string();
        self
    }

    pub fn endpoint_host(mut self, val: &str) -> Self {
        self.endpoint_host = val.to_string();
        self
    }

    pub fn tls_verify(mut self, val: bool) -> Self {
        self.tls_verify = val;
        self
    }

    /// Validate and split into credentials + retained settings / 校验并拆分
    pub fn into_parts(self) -> Result<(Credentials, StorageSettings)> {
        if self.access_key.trim().is_empty() {
            return Err(Error::configuration("accessKey is required"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::configuration("secretKey is required"));
        }

        let credentials = Credentials {
            access_key: self.access_key,
            secret_key: self.secret_key,
        };
        let settings = StorageSettings {
            bucket: self.bucket,
            region: self.region,
            endpoint_host: self.endpoint_host,
            tls_verify: self.tls_verify,
        };
        settings.validate()?;

        Ok((credentials, settings))
    }
}

impl fmt::Debug for FacadeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacadeConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint_host", &self.endpoint_host)
            .field("tls_verify", &self.tls_verify)
            .finish()
    }
}

/// Access key pair, consumed by the storage client / 访问凭证
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: &str, secret_key: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Settings retained after construction, never holds secrets / 构造后保留的配置（不含密钥）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_endpoint_host")]
    pub endpoint_host: String,
    #[serde(default)]
    pub tls_verify: bool,
}

impl StorageSettings {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            region: default_region(),
            endpoint_host: default_endpoint_host(),
            tls_verify: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::configuration("bucket is required"));
        }
        Ok(())
    }
}

/// Config file path: `$S3_FACADE_CONFIG` or ./config.json / 配置文件路径
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from a JSON file / 从JSON文件加载配置
pub fn load_config(path: &Path) -> Result<FacadeConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::configuration(format!("Failed to read config file {:?}: {}", path, e)))?;

    let config: FacadeConfig = serde_json::from_str(&content)
        .map_err(|e| Error::configuration(format!("Failed to parse config file {:?}: {}", path, e)))?;

    tracing::info!("Loaded configuration from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config: FacadeConfig = serde_json::from_str(
            r#"{"accessKey":"AK","secretKey":"SK","bucket":"photos"}"#,
        )
        .unwrap();
        assert_eq!(config.region, "sa-east-1");
        assert_eq!(config.endpoint_host, "s3.amazonaws.com");
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_into_parts_drops_secrets() {
        let (credentials, settings) = FacadeConfig::new("AK", "SK", "photos")
            .region("us-east-1")
            .into_parts()
            .unwrap();
        assert_eq!(credentials.access_key(), "AK");
        assert_eq!(credentials.secret_key(), "SK");
        assert_eq!(settings.bucket, "photos");
        assert_eq!(settings.region, "us-east-1");

        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("SK"));
        assert!(!json.contains("AK"));
    }

    #[test]
    fn test_missing_required_keys() {
        for config in [
            FacadeConfig::new("", "SK", "photos"),
            FacadeConfig::new("AK", "", "photos"),
            FacadeConfig::new("AK", "SK", " "),
        ] {
            assert!(matches!(config.into_parts(), Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = FacadeConfig::new("AK", "top-secret", "photos");
        assert!(!format!("{:?}", config).contains("top-secret"));
        let credentials = Credentials::new("AK", "top-secret");
        assert!(!format!("{:?}", credentials).contains("top-secret"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"accessKey":"AK","secretKey":"SK","bucket":"b","endpointHost":"minio.local","tlsVerify":true}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoint_host, "minio.local");
        assert!(config.tls_verify);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_config(&path), Err(Error::Configuration(_))));
        assert!(matches!(
            load_config(&dir.path().join("missing.json")),
            Err(Error::Configuration(_))
        ));
    }
}
