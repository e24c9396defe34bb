use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn valid() -> MeAgentConfig {
    MeAgentConfig {
        partner_id: "partner-7".into(),
        callback_url: "https://shop.example.com/rewards/done".into(),
        ..MeAgentConfig::default()
    }
}

#[test]
fn default_config_fails_validation_without_partner() {
    let err = MeAgentConfig::default().validate().expect_err("no partner id");
    assert!(matches!(err, AgentError::Config(ref msg) if msg.contains("partner_id")));
}

#[test]
fn validates_callback_scheme() {
    assert!(valid().validate().is_ok());

    let mut config = valid();
    config.callback_url = "javascript:alert(1)".into();
    assert!(matches!(config.validate(), Err(AgentError::Config(_))));

    config.callback_url = "not a url".into();
    assert!(config.validate().is_err());
}

#[test]
fn env_overrides_prefer_app_prefix() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ME_AGENT_PARTNER_ID", "from-me-agent"),
        ("APP__PARTNER_ID", "from-app"),
        ("ME_AGENT_ENVIRONMENT", "staging"),
        ("ME_AGENT_NETWORK", "polygon"),
        ("APP__LOCALE", "fr-FR"),
    ]);
    let mut config = valid();
    apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.partner_id, "from-app");
    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.network, SupportedNetwork::Polygon);
    assert_eq!(config.locale, "fr-FR");
}

#[test]
fn unparseable_enum_override_is_ignored() {
    let mut config = valid();
    apply_env_overrides(&mut config, |key| {
        (key == "ME_AGENT_NETWORK").then(|| "dogecoin".to_string())
    });
    assert_eq!(config.network, SupportedNetwork::Ethereum);
}

#[test]
fn loads_toml_file_with_partial_fields() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("me_agent_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("me-agent.toml");
    fs::write(
        &path,
        r#"
partner_id = "acme"
environment = "development"
callback_url = "http://localhost:3000/cb"
"#,
    )
    .expect("write config");

    let config = read_config_file(&path).expect("load");
    assert_eq!(config.partner_id, "acme");
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.container_id, "me-agent");
    assert!(config.validate().is_ok());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_file_reports_path() {
    let err = read_config_file(Path::new("/definitely/not/here.toml")).expect_err("missing");
    assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
}
