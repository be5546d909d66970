use serde::Deserialize;
use std::collections::HashMap;

pub const TOKEN_VARIABLE: &str = "GRAFANA_API_TOKEN";

/// Values read from `GRAFANA_*` environment variables
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EnvSettings {
    #[serde(default)]
    pub api_token: String,
}

/// Everything a command needs to talk to the server
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_token: String,
    pub verbose: bool,
}

impl Settings {
    pub fn new(api_url: String, env: EnvSettings, verbose: bool) -> anyhow::Result<Self> {
        if env.api_token.trim().is_empty() {
            anyhow::bail!("{} variable not set", TOKEN_VARIABLE);
        }

        Ok(Self {
            api_url,
            api_token: env.api_token,
            verbose,
        })
    }
}

pub fn load_env_settings() -> anyhow::Result<EnvSettings> {
    load_env_settings_from(None)
}

fn load_env_settings_from(vars: Option<HashMap<String, String>>) -> anyhow::Result<EnvSettings> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("GRAFANA").source(vars))
        .build()?;

    Ok(settings.try_deserialize()?)
}
