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

//! Harvest identity provider adapter for OAuth2 authorization-code clients.
//!
//! The adapter supplies endpoint URLs, default scopes, request headers and the
//! error and resource-owner hooks a generic client calls while it runs the
//! flow. It performs no I/O of its own.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod error;
pub mod harvest;
pub mod types;

pub use crate::{config::HarvestCfg,
                error::{AuthorizationError,
                        Error,
                        Result},
                harvest::Harvest,
                types::{ApplicationIdentity,
                        ProviderAdapter,
                        ResourceOwner}};
