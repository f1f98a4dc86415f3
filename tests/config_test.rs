// Integration tests for configuration layering

use anyhow::Result;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

use adaptive_chat::config::{load_config_with, ConfigOverrides};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn config_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_every_layer_in_order() -> Result<()> {
    let file = config_file(
        r#"
api_key = "from-file"
request_timeout_secs = 30

[sampling]
temperature = 0.5
top_p = 0.7
max_tokens = 800
model = "file-model"
"#,
    )?;

    let overrides = ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        model: Some("cli-model".to_string()),
        ..ConfigOverrides::default()
    };
    let lookup = env(&[
        ("GROQ_API_KEY", "from-env"),
        ("LLM_TOP_P", "0.6"),
        ("LLM_MODEL", "env-model"),
        ("LLM_MAX_TOKENS", "not-a-number"),
    ]);

    let config = load_config_with(&overrides, lookup)?;

    assert_eq!(config.api_key, "from-env");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.sampling.temperature, 0.5);
    assert_eq!(config.sampling.top_p, 0.6);
    // Invalid env value keeps the file value
    assert_eq!(config.sampling.max_tokens, 800);
    assert_eq!(config.sampling.model, "cli-model");

    Ok(())
}

#[test]
fn test_missing_api_key_is_fatal() -> Result<()> {
    let file = config_file("[sampling]\ntemperature = 0.5\n")?;
    let overrides = ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..ConfigOverrides::default()
    };

    let err = load_config_with(&overrides, env(&[])).unwrap_err();
    assert!(err.to_string().contains("No API key"));

    Ok(())
}

#[test]
fn test_invalid_file_sampling_is_rejected() -> Result<()> {
    let file = config_file("api_key = \"k\"\n[sampling]\ntemperature = 3.0\n")?;
    let overrides = ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..ConfigOverrides::default()
    };

    let err = load_config_with(&overrides, env(&[])).unwrap_err();
    assert!(format!("{:#}", err).contains("temperature"));

    Ok(())
}
