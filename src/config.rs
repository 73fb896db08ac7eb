use std::path::PathBuf;

use anyhow::Result;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub enum ConfigLoadOption {
    #[default]
    Default,

    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Ingresses whose class annotation does not contain this marker are left untouched
    pub ingress_class_marker: String,

    /// Reference appended for `ingress.kubernetes.io/ssl-redirect`
    pub ssl_redirect_middleware: String,

    /// Provider suffix of middleware references (`<ns>-<name>@<provider>`)
    pub middleware_provider: String,

    /// Namespace used when an Ingress has none
    pub default_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingress_class_marker: "traefik".into(),
            ssl_redirect_middleware: "ssl-redirect@file".into(),
            middleware_provider: "kubernetescrd".into(),
            default_namespace: "default".into(),
        }
    }
}

impl Config {
    pub fn load(option: ConfigLoadOption) -> Result<Self> {
        let figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config = match option {
            ConfigLoadOption::Default => figment,
            ConfigLoadOption::Path(path) => figment.merge(Yaml::file(path)),
        }
        .extract()?;

        Ok(config)
    }
}
