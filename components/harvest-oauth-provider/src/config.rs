// Copyright (c) 2018 Chef Software Inc. and/or applicable contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration for the Harvest provider adapter

use std::{fs,
          path::Path};

use url::Url;

use crate::{error::{Error,
                    Result},
            types::ApplicationIdentity};

/// Base URL of the Harvest v2 API
pub const DEFAULT_HARVEST_API_URL: &str = "https://api.harvestapp.com";
/// Scope granting access to every Harvest and Forecast account of the user
pub const DEFAULT_HARVEST_SCOPE: &str = "harvest:all";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HarvestCfg {
    pub api_url:     String,
    pub scopes:      Vec<String>,
    pub app_name:    Option<String>,
    pub app_contact: Option<String>,
}

impl Default for HarvestCfg {
    fn default() -> Self {
        HarvestCfg { api_url:     DEFAULT_HARVEST_API_URL.to_string(),
                     scopes:      vec![DEFAULT_HARVEST_SCOPE.to_string()],
                     app_name:    None,
                     app_contact: None, }
    }
}

impl HarvestCfg {
    pub fn from_raw(raw: &str) -> Result<Self> {
        let cfg: HarvestCfg = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file<T>(path: T) -> Result<Self>
        where T: AsRef<Path>
    {
        debug!("Loading provider configuration from {}", path.as_ref().display());
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_raw(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)?;
        if url.cannot_be_a_base() || !(url.scheme() == "https" || url.scheme() == "http") {
            return Err(Error::Config(format!("api_url must be an absolute http(s) URL, \
                                              got {}",
                                             self.api_url)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::Config(format!("api_url must not carry a query or fragment, \
                                              got {}",
                                             self.api_url)));
        }

        if self.scopes.is_empty() {
            return Err(Error::Config("at least one scope is required".to_string()));
        }
        if self.scopes.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::Config("scopes must not contain empty entries".to_string()));
        }

        match (&self.app_name, &self.app_contact) {
            (Some(_), None) | (None, Some(_)) => {
                Err(Error::Config("app_name and app_contact must be set together".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The configured application identity, `None` when neither part is set.
    pub fn application_identity(&self) -> Result<Option<ApplicationIdentity>> {
        match (&self.app_name, &self.app_contact) {
            (Some(name), Some(contact)) => {
                ApplicationIdentity::new(name.as_str(), contact.as_str()).map(Some)
            }
            (None, None) => Ok(None),
            _ => Err(Error::Config("app_name and app_contact must be set together".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_from_raw() {
        let content = r#"
        api_url = "https://api.harvestapp.test"
        scopes = ["harvest:123", "forecast:456"]
        app_name = "Acme"
        app_contact = "ops@acme.io"
        "#;

        let config = HarvestCfg::from_raw(content).unwrap();
        assert_eq!(config.api_url, "https://api.harvestapp.test");
        assert_eq!(config.scopes, vec!["harvest:123", "forecast:456"]);
        assert_eq!(config.app_name, Some("Acme".to_string()));
        assert_eq!(config.app_contact, Some("ops@acme.io".to_string()));

        let identity = config.application_identity().unwrap().unwrap();
        assert_eq!(identity.user_agent(), "Acme (ops@acme.io)");
    }

    #[test]
    fn config_from_raw_defaults() {
        let config = HarvestCfg::from_raw("").unwrap();
        assert_eq!(config, HarvestCfg::default());
        assert_eq!(config.api_url, DEFAULT_HARVEST_API_URL);
        assert_eq!(config.scopes, vec![DEFAULT_HARVEST_SCOPE]);
        assert!(config.application_identity().unwrap().is_none());
    }

    #[test]
    fn config_rejects_partial_identity() {
        let content = r#"
        app_name = "Acme"
        "#;

        match HarvestCfg::from_raw(content) {
            Err(Error::Config(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn config_rejects_empty_scopes() {
        assert!(HarvestCfg::from_raw("scopes = []").is_err());
        assert!(HarvestCfg::from_raw(r#"scopes = ["harvest:all", " "]"#).is_err());
    }

    #[test]
    fn config_rejects_bad_api_url() {
        match HarvestCfg::from_raw(r#"api_url = "not a url""#) {
            Err(Error::UrlParse(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
        match HarvestCfg::from_raw(r#"api_url = "ftp://api.harvestapp.com""#) {
            Err(Error::Config(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn config_rejects_api_url_with_query() {
        for api_url in &["https://api.harvestapp.com/?account=1",
                         "https://api.harvestapp.com?account=1",
                         "https://api.harvestapp.com/#users"]
        {
            let config = HarvestCfg { api_url: api_url.to_string(),
                                      ..Default::default() };
            match config.validate() {
                Err(Error::Config(_)) => (),
                other => panic!("unexpected result for {}: {:?}", api_url, other),
            }
        }
    }

    #[test]
    fn config_rejects_malformed_toml() {
        match HarvestCfg::from_raw("api_url = ") {
            Err(Error::ConfigParse(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"https://api.harvestapp.com/\"").unwrap();

        let config = HarvestCfg::from_file(file.path()).unwrap();
        assert_eq!(config.api_url, "https://api.harvestapp.com/");
    }

    #[test]
    fn config_from_missing_file() {
        match HarvestCfg::from_file("/nonexistent/harvest.toml") {
            Err(Error::IO(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
