//! Configuration loading integration tests
//!
//! Tests the EMBED_GATEWAY_CONFIG environment variable support and
//! configuration precedence.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

use embed_gateway::config::ConfigLoader;

// Static mutex to ensure environment variable tests don't interfere with each other
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

fn config_file(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", contents).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_config_env_var_loading() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap();

    let temp_file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 9999

[links]
twitter_root = "https://x.com"
public_url = "https://fx.example"
        "#,
    );

    let original_config = std::env::var("EMBED_GATEWAY_CONFIG").ok();
    unsafe {
        std::env::set_var("EMBED_GATEWAY_CONFIG", temp_file.path().to_str().unwrap());
    }

    let config_path = ConfigLoader::get_config_path();
    assert_eq!(config_path.as_deref(), Some(temp_file.path()));

    let settings = ConfigLoader::new().load(config_path.as_deref()).unwrap();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 9999);
    assert_eq!(settings.links.twitter_root, "https://x.com");
    assert_eq!(settings.links.public_url, "https://fx.example");
    // Sections absent from the file keep their defaults
    assert_eq!(settings.cache.ttl_secs, 3600);

    unsafe {
        std::env::remove_var("EMBED_GATEWAY_CONFIG");
        if let Some(config) = original_config {
            std::env::set_var("EMBED_GATEWAY_CONFIG", config);
        }
    }
}

#[test]
fn test_env_var_overrides_config_file() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap();

    let temp_file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 9999

[links]
twitter_root = "https://x.com"
        "#,
    );

    let original_port = std::env::var("EMBED_SERVER_PORT").ok();
    let original_root = std::env::var("TWITTER_ROOT").ok();
    unsafe {
        std::env::set_var("EMBED_SERVER_PORT", "8888");
        std::env::set_var("TWITTER_ROOT", "https://twitter.example");
    }

    let settings = ConfigLoader::new().load(Some(temp_file.path())).unwrap();

    assert_eq!(settings.server.port, 8888);
    assert_eq!(settings.links.twitter_root, "https://twitter.example");
    assert_eq!(settings.server.host, "127.0.0.1");

    unsafe {
        std::env::remove_var("EMBED_SERVER_PORT");
        std::env::remove_var("TWITTER_ROOT");
        if let Some(port) = original_port {
            std::env::set_var("EMBED_SERVER_PORT", port);
        }
        if let Some(root) = original_root {
            std::env::set_var("TWITTER_ROOT", root);
        }
    }
}

#[test]
fn test_default_config_path() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap();

    let original_config = std::env::var("EMBED_GATEWAY_CONFIG").ok();
    unsafe {
        std::env::remove_var("EMBED_GATEWAY_CONFIG");
    }

    if let Some(path) = ConfigLoader::get_config_path() {
        assert!(path.ends_with("embed-gateway/config.toml"));
    }

    if let Some(config) = original_config {
        unsafe {
            std::env::set_var("EMBED_GATEWAY_CONFIG", config);
        }
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap();

    let temp_file = config_file(
        r#"
[cache]
ttl_secs = 0
        "#,
    );

    let err = ConfigLoader::new().load(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().contains("ttl_secs"));
}

#[cfg(unix)]
#[test]
fn test_config_with_server_cli() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap();

    let temp_file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 4416
        "#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("embed-gateway");
    cmd.env("EMBED_GATEWAY_CONFIG", temp_file.path().to_str().unwrap());
    cmd.env_remove("EMBED_SERVER_PORT");
    cmd.args(["server", "-v", "--port", "0"]);
    cmd.timeout(std::time::Duration::from_secs(2));

    let output = cmd.output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stderr.contains("127.0.0.1") || stdout.contains("127.0.0.1"),
        "Expected to see 127.0.0.1 in server output, but got:\nSTDOUT: {}\nSTDERR: {}",
        stdout,
        stderr
    );
}
