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
//
// SPDX-License-Identifier: Apache-2.0

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::attribute::Attribute;
use crate::types::entity::Entity;

/// Data about the entity being released to a relying party.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct TranslationInput {
    /// Released entity with its identities.
    pub entity: Entity,

    /// Attributes of the entity in the chosen group.
    #[builder(default)]
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Paths of all groups the entity is member of.
    #[builder(default)]
    #[serde(default)]
    pub groups: Vec<String>,

    /// Group the relying party asked for.
    #[builder(default = "\"/\".into()")]
    #[serde(default = "root_group")]
    pub chosen_group: String,

    /// Relying party name.
    #[builder(default)]
    #[serde(default)]
    pub requester: String,

    /// Attributes of the relying party.
    #[builder(default)]
    #[serde(default)]
    pub requester_attributes: Vec<Attribute>,

    /// Protocol name (`SAML2`, `OAuth2`, ...).
    #[builder(default)]
    #[serde(default)]
    pub protocol: String,

    /// Protocol flavour (`SAML2 WebSSO`, ...).
    #[builder(default)]
    #[serde(default)]
    pub protocol_subtype: String,

    /// Outcome of the user import run before the release, per importer.
    #[builder(default)]
    #[serde(default)]
    pub import_status: BTreeMap<String, String>,

    /// Login session of the invocation, if there is one.
    #[builder(default)]
    #[serde(default)]
    pub login: Option<LoginSessionInfo>,
}

fn root_group() -> String {
    "/".into()
}

/// The part of the login session visible to output profiles.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct LoginSessionInfo {
    /// Identities used to authenticate.
    #[builder(default)]
    #[serde(default)]
    pub authenticated_identities: Vec<String>,

    /// Remote identity provider when the login was remote.
    #[builder(default)]
    #[serde(default)]
    pub remote_idp: Option<String>,

    /// Authenticators used during the login, in factor order.
    #[builder(default)]
    #[serde(default)]
    pub authenticators: Vec<String>,

    /// Authentication methods (`pwd`, `otp`, `hwk`, ...) used by the
    /// authenticators.
    #[builder(default)]
    #[serde(default)]
    pub authentication_methods: Vec<String>,

    /// Authentication context reported by the upstream identity provider.
    #[builder(default)]
    #[serde(default)]
    pub upstream: Option<RemoteAuthnMetadata>,
}

/// Upstream authentication context of a remote login.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RemoteAuthnMetadata {
    /// Protocol used towards the upstream identity provider.
    pub protocol: String,
    /// Upstream identity provider.
    pub remote_idp: Option<String>,
    /// Authentication context class references.
    #[serde(default)]
    pub class_references: Vec<String>,
}
