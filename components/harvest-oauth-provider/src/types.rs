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
                      HeaderValue};
use serde_json::Value;

use crate::error::{AuthorizationError,
                   Error,
                   Result};

/// `User-Agent` sent when no application identity is configured, rendered the
/// same way as `ApplicationIdentity::user_agent`.
pub const DEFAULT_USER_AGENT: &str = "MyApp (example@mail.com)";

/// Name and contact of the application talking to the provider. Some providers
/// require these in the `User-Agent` of every API request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationIdentity {
    name:       String,
    contact:    String,
    user_agent: HeaderValue,
}

impl ApplicationIdentity {
    pub fn new<T, U>(name: T, contact: U) -> Result<Self>
        where T: Into<String>,
              U: Into<String>
    {
        let name = name.into().trim().to_string();
        let contact = contact.into().trim().to_string();

        if name.is_empty() || contact.is_empty() {
            return Err(Error::Config("application identity requires both a name and a contact".to_string()));
        }

        let user_agent = HeaderValue::from_str(&format!("{} ({})", name, contact))?;

        Ok(ApplicationIdentity { name,
                                 contact,
                                 user_agent })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn contact(&self) -> &str { &self.contact }

    /// Rendered as `"{name} ({contact})"`.
    pub fn user_agent(&self) -> &HeaderValue { &self.user_agent }
}

/// Identity data returned by a provider's resource-owner endpoint.
///
/// No schema is enforced; the raw body is kept verbatim and fields are looked
/// up by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceOwner(Value);

impl ResourceOwner {
    pub fn new(body: Value) -> Self { ResourceOwner(body) }

    pub fn get(&self, field: &str) -> Option<&Value> { self.0.get(field) }

    pub fn id(&self) -> Option<&Value> { self.get("id") }

    pub fn email(&self) -> Option<&str> { self.get_str("email") }

    pub fn first_name(&self) -> Option<&str> { self.get_str("first_name") }

    pub fn last_name(&self) -> Option<&str> { self.get_str("last_name") }

    pub fn as_value(&self) -> &Value { &self.0 }

    pub fn into_inner(self) -> Value { self.0 }

    fn get_str(&self, field: &str) -> Option<&str> { self.get(field).and_then(Value::as_str) }
}

/// Vendor specific knowledge a generic OAuth2 authorization-code client needs
/// to talk to one identity provider.
///
/// Every operation is a pure function of its inputs and the adapter's immutable
/// configuration. The client sequences the calls: authorize, exchange the code,
/// check each response, fetch the resource owner and parse it.
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Where the resource owner is sent to grant consent.
    fn authorization_url(&self) -> &str;

    /// Where authorization codes and refresh tokens are exchanged for access tokens.
    fn token_url(&self) -> &str;

    /// Where the client fetches identity data for the owner of `token`.
    fn resource_owner_url(&self, token: &str) -> String;

    /// Never empty.
    fn default_scopes(&self) -> &[String];

    /// Headers to decorate outgoing requests with. Always carries `Accept` and
    /// `User-Agent`.
    fn request_headers(&self, identity: Option<&ApplicationIdentity>) -> HeaderMap;

    /// Classifies a provider response. Called by the client on every response
    /// received during the flow; an error terminates the flow.
    fn check_response(&self,
                      status: u16,
                      reason: &str,
                      body: &Value)
                      -> result::Result<(), AuthorizationError>;

    fn parse_resource_owner(&self, body: Value) -> ResourceOwner;

    /// The scopes to request: `requested` when the caller named any, the
    /// provider defaults otherwise.
    fn scopes_or_default(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.default_scopes().to_vec()
        } else {
            requested.to_vec()
        }
    }
}
