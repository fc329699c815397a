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

use std::{error,
          fmt,
          io,
          result};

use reqwest::header::InvalidHeaderValue;

/// Raised by `ProviderAdapter::check_response` when the provider signals a failed
/// authorization step, either through the HTTP status or an `error` field in the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationError {
    pub message: String,
    pub code:    u16,
}

impl AuthorizationError {
    pub fn new<T>(message: T, code: u16) -> Self
        where T: Into<String>
    {
        AuthorizationError { message: message.into(),
                             code }
    }
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Authorization failed, status={}, message={}", self.code, self.message)
    }
}

impl error::Error for AuthorizationError {}

#[derive(Debug)]
pub enum Error {
    Authorization(AuthorizationError),
    Config(String),
    ConfigParse(toml::de::Error),
    IO(io::Error),
    InvalidHeader(InvalidHeaderValue),
    UrlParse(url::ParseError),
}

pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::Authorization(ref e) => format!("{}", e),
            Error::Config(ref e) => format!("Invalid provider configuration, {}", e),
            Error::ConfigParse(ref e) => format!("Unable to parse provider configuration, {}", e),
            Error::IO(ref e) => format!("{}", e),
            Error::InvalidHeader(ref e) => format!("Invalid header value, {}", e),
            Error::UrlParse(ref e) => format!("{}", e),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Authorization(ref e) => Some(e),
            Error::Config(_) => None,
            Error::ConfigParse(ref e) => Some(e),
            Error::IO(ref e) => Some(e),
            Error::InvalidHeader(ref e) => Some(e),
            Error::UrlParse(ref e) => Some(e),
        }
    }
}

impl From<AuthorizationError> for Error {
    fn from(err: AuthorizationError) -> Error { Error::Authorization(err) }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error { Error::IO(err) }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Error { Error::ConfigParse(err) }
}

impl From<InvalidHeaderValue> for Error {
    fn from(err: InvalidHeaderValue) -> Error { Error::InvalidHeader(err) }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error { Error::UrlParse(err) }
}
