use anyhow::{anyhow, bail, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use s3_facade::{config, DeleteOutcome, ObjectStorage};

const USAGE: &str = "Usage:
  s3-facade put <local_path> [remote_dir]
  s3-facade get <remote_key> <local_dir>
  s3-facade delete <remote_key> [--confirm]
  s3-facade exists <remote_key>
  s3-facade url <remote_key> [--tls]
  s3-facade version

Config is read from $S3_FACADE_CONFIG or ./config.json";

/// Parsed command / 命令
#[derive(Debug, PartialEq)]
enum Command {
    Put { local_path: String, remote_dir: Option<String> },
    Get { remote_key: String, local_dir: String },
    Delete { remote_key: String, confirm: bool },
    Exists { remote_key: String },
    Url { remote_key: String, tls: bool },
    Version,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let (flags, positional): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|a| a.starts_with("--"));
    let has_flag = |name: &str| flags.iter().any(|f| f.as_str() == name);
    let arg = |i: usize| -> Result<String> {
        positional
            .get(i)
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("missing argument\n\n{}", USAGE))
    };

    let command = match positional.first().map(|s| s.as_str()) {
        Some("put") => Command::Put {
            local_path: arg(1)?,
            remote_dir: positional.get(2).map(|s| s.to_string()),
        },
        Some("get") => Command::Get {
            remote_key: arg(1)?,
            local_dir: arg(2)?,
        },
        Some("delete") => Command::Delete {
            remote_key: arg(1)?,
            confirm: has_flag("--confirm"),
        },
        Some("exists") => Command::Exists { remote_key: arg(1)? },
        Some("url") => Command::Url {
            remote_key: arg(1)?,
            tls: has_flag("--tls"),
        },
        Some("version") => Command::Version,
        Some(other) => bail!("unknown command: {}\n\n{}", other, USAGE),
        None => bail!("{}", USAGE),
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_facade=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    if command == Command::Version {
        println!(
            "s3-facade {} (built {}, {})",
            env!("CARGO_PKG_VERSION"),
            env!("BUILD_TIME"),
            env!("BUILD_PROFILE")
        );
        return Ok(());
    }

    // Load configuration / 加载配置
    let config_path = config::default_config_path();
    let facade_config = config::load_config(&config_path)?;
    let storage = ObjectStorage::new(facade_config)?;

    match command {
        Command::Put { local_path, remote_dir } => {
            storage.put(&local_path, remote_dir.as_deref()).await?;
            tracing::info!("Uploaded {} to bucket {}", local_path, storage.settings().bucket);
        }
        Command::Get { remote_key, local_dir } => {
            storage.get(&remote_key, &local_dir).await?;
            tracing::info!("Saved {} under {}", remote_key, local_dir);
        }
        Command::Delete { remote_key, confirm } => {
            if confirm {
                match storage.delete_confirmed(&remote_key).await? {
                    DeleteOutcome::Confirmed => println!("deleted"),
                    DeleteOutcome::Acknowledged => println!("acknowledged (object still visible)"),
                }
            } else {
                storage.delete(&remote_key).await?;
                println!("acknowledged");
            }
        }
        Command::Exists { remote_key } => {
            println!("{}", storage.exists(&remote_key).await?);
        }
        Command::Url { remote_key, tls } => {
            println!("{}", storage.public_url(&remote_key, tls));
        }
        Command::Version => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(&args(&["put", "local/cat.png", "images"])).unwrap(),
            Command::Put {
                local_path: "local/cat.png".to_string(),
                remote_dir: Some("images".to_string()),
            }
        );
        assert_eq!(
            parse_args(&args(&["url", "--tls", "a.txt"])).unwrap(),
            Command::Url { remote_key: "a.txt".to_string(), tls: true }
        );
        assert_eq!(
            parse_args(&args(&["delete", "a.txt"])).unwrap(),
            Command::Delete { remote_key: "a.txt".to_string(), confirm: false }
        );
        assert!(parse_args(&args(&["get", "a.txt"])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
    }
}
