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

use std::result;

use reqwest::header::{HeaderMap,
                      HeaderValue,
                      ACCEPT,
                      USER_AGENT};
use serde_json::Value;

use crate::{config::{HarvestCfg,
                     DEFAULT_HARVEST_API_URL,
                     DEFAULT_HARVEST_SCOPE},
            error::{AuthorizationError,
                    Result},
            types::*};

/// URL to the Harvest ID consent page
pub const HARVEST_AUTHORIZATION_URL: &str = "https://id.getharvest.com/oauth2/authorize";
/// URL to the Harvest ID token endpoint
pub const HARVEST_TOKEN_URL: &str = "https://id.getharvest.com/api/v1/oauth2/token";
/// Path of the current user endpoint, relative to the API base URL
pub const HARVEST_RESOURCE_OWNER_PATH: &str = "/v2/users/me";

const APPLICATION_JSON: &str = "application/json";

#[derive(Clone, Debug)]
pub struct Harvest {
    api_url:  String,
    scopes:   Vec<String>,
    identity: Option<ApplicationIdentity>,
}

impl Harvest {
    pub fn new() -> Self {
        Harvest { api_url:  DEFAULT_HARVEST_API_URL.to_string(),
                  scopes:   vec![DEFAULT_HARVEST_SCOPE.to_string()],
                  identity: None, }
    }

    pub fn from_config(config: &HarvestCfg) -> Result<Self> {
        config.validate()?;
        let identity = config.application_identity()?;
        let api_url = config.api_url.trim_end_matches('/').to_string();

        debug!("Harvest provider configured, api_url={}, scopes={:?}, identity={:?}",
               api_url,
               config.scopes,
               identity.as_ref().map(ApplicationIdentity::user_agent));

        Ok(Harvest { api_url,
                     scopes: config.scopes.clone(),
                     identity })
    }

    pub fn api_url(&self) -> &str { &self.api_url }

    pub fn identity(&self) -> Option<&ApplicationIdentity> { self.identity.as_ref() }

    /// Request headers built from the identity this adapter was configured with.
    pub fn default_headers(&self) -> HeaderMap { self.request_headers(self.identity.as_ref()) }
}

impl Default for Harvest {
    fn default() -> Self { Harvest::new() }
}

impl ProviderAdapter for Harvest {
    fn name(&self) -> &str { "harvest" }

    fn authorization_url(&self) -> &str { HARVEST_AUTHORIZATION_URL }

    fn token_url(&self) -> &str { HARVEST_TOKEN_URL }

    fn resource_owner_url(&self, _token: &str) -> String {
        format!("{}{}", self.api_url, HARVEST_RESOURCE_OWNER_PATH)
    }

    fn default_scopes(&self) -> &[String] { &self.scopes }

    fn request_headers(&self, identity: Option<&ApplicationIdentity>) -> HeaderMap {
        let user_agent = match identity {
            Some(identity) => identity.user_agent().clone(),
            None => HeaderValue::from_static(DEFAULT_USER_AGENT),
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(USER_AGENT, user_agent);
        headers
    }

    // A failing HTTP status always wins over the body. Harvest also reports some
    // failures as a 200 carrying an `error` field.
    fn check_response(&self,
                      status: u16,
                      reason: &str,
                      body: &Value)
                      -> result::Result<(), AuthorizationError> {
        if status >= 400 {
            return Err(AuthorizationError::new(reason, status));
        }

        match body.get("error") {
            None | Some(Value::Null) => Ok(()),
            Some(error) => {
                let message = error_message(error).unwrap_or_else(|| reason.to_string());
                Err(AuthorizationError::new(message, status))
            }
        }
    }

    fn parse_resource_owner(&self, body: Value) -> ResourceOwner { ResourceOwner::new(body) }
}

/// The text to report for a body-level `error` value, `None` when the value
/// carries nothing worth reporting.
fn error_message(error: &Value) -> Option<String> {
    match *error {
        Value::Null | Value::Bool(false) => None,
        Value::String(ref s) if s.is_empty() || s == "0" => None,
        Value::String(ref s) => Some(s.clone()),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => None,
        Value::Array(ref a) if a.is_empty() => None,
        Value::Object(ref o) if o.is_empty() => None,
        ref other => Some(other.to_string()),
    }
}
