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

/// Identity of an entity.
#[derive(Builder, Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct Identity {
    /// Identity type (`userName`, `email`, `persistent`, ...).
    pub type_id: String,

    /// Identity value.
    pub value: String,

    /// Remote identity provider the identity was obtained from.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_idp: Option<String>,

    /// Translation profile which created the identity.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_profile: Option<String>,
}

impl Identity {
    pub fn new<T: Into<String>, V: Into<String>>(type_id: T, value: V) -> Self {
        Self {
            type_id: type_id.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Whether both identities denote the same (type, value) pair.
    pub fn same_as(&self, other: &Identity) -> bool {
        self.type_id == other.type_id && self.value == other.value
    }
}

/// Identity as reported by the remote identity provider.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct RemoteIdentity {
    /// Identity value.
    pub name: String,

    /// Identity type as named by the remote side.
    pub identity_type: String,
}

/// Effect of a mapped identity on the local store.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityEffectMode {
    /// The identity must already exist, otherwise the login is rejected.
    RequireMatch,
    /// Create the identity (and its entity) when it does not exist.
    #[default]
    CreateOrMatch,
    /// Use the identity when present, ignore it otherwise.
    Match,
    /// Add the identity to an entity matched by another identity.
    UpdateOrMatch,
}

impl IdentityEffectMode {
    pub const VALUES: &'static [&'static str] = &[
        "REQUIRE_MATCH",
        "CREATE_OR_MATCH",
        "MATCH",
        "UPDATE_OR_MATCH",
    ];
}
