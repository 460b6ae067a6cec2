use std::path::PathBuf;

use common_utils::consts;
use domain_types::types::{FortisCredentials, Proxy};
use hyperswitch_masking::PeekInterface;

use crate::logger::config::Log;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub fortis: FortisCredentials,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: consts::Env,
}

impl Common {
    pub fn validate(&self, fortis: &FortisCredentials) -> Result<(), config::ConfigError> {
        let Self { environment } = self;
        match environment {
            consts::Env::Production if fortis.sandbox => Err(config::ConfigError::Message(
                "production environment cannot use the Fortis sandbox".into(),
            )),
            consts::Env::Development | consts::Env::Production | consts::Env::Sandbox => Ok(()),
        }
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // Here, it should be `set_override()` not `set_default()`.
            // "env" can't be altered by config field.
            .set_override("env", environment.to_string())
    }

    /// Config path.
    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        let mut config_path = PathBuf::new();
        if let Some(explicit_config_path_val) = explicit_config_path {
            config_path.push(explicit_config_path_val);
        } else {
            let config_directory: String = "config".into();
            let config_file_name = environment.config_path();

            config_path.push(workspace_path());
            config_path.push(config_directory);
            config_path.push(config_file_name);
        }
        config_path
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        self.common.validate(&self.fortis)?;

        let required = [
            ("fortis.developer_id", self.fortis.developer_id.as_str()),
            ("fortis.user_id", self.fortis.user_id.as_str()),
            ("fortis.user_api_key", self.fortis.user_api_key.peek().as_str()),
        ];
        if let Some((key, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(config::ConfigError::Message(format!("{key} must be set")));
        }

        if self.fortis.timeout_seconds == 0 {
            return Err(config::ConfigError::Message(
                "fortis.timeout_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Effective settings as `(key, value)` pairs with the API key hidden
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let fortis = &self.fortis;
        vec![
            ("environment", self.common.environment.to_string()),
            ("fortis.developer_id", fortis.developer_id.clone()),
            ("fortis.user_id", fortis.user_id.clone()),
            ("fortis.user_api_key", "[hidden]".to_string()),
            (
                "fortis.location_id",
                fortis.default_location_id().unwrap_or("<unset>").to_string(),
            ),
            ("fortis.sandbox", fortis.sandbox.to_string()),
            ("fortis.base_url", fortis.base_url().to_string()),
            ("fortis.timeout_seconds", fortis.timeout_seconds.to_string()),
            ("fortis.strict", fortis.strict.to_string()),
        ]
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
