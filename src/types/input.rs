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

use crate::types::attribute::RemoteAttribute;
use crate::types::group::RemoteGroupMembership;
use crate::types::identity::RemoteIdentity;

/// Data received from a remote identity provider after a successful remote
/// authentication.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct RemotelyAuthenticatedInput {
    /// Name of the remote identity provider.
    pub idp: String,

    /// Identities asserted by the identity provider, the first one is the
    /// primary identity.
    #[builder(default)]
    #[serde(default)]
    pub identities: Vec<RemoteIdentity>,

    /// Attributes asserted by the identity provider.
    #[builder(default)]
    #[serde(default)]
    pub attributes: Vec<RemoteAttribute>,

    /// Group memberships asserted by the identity provider.
    #[builder(default)]
    #[serde(default)]
    pub groups: Vec<RemoteGroupMembership>,
}

impl RemotelyAuthenticatedInput {
    /// Human readable dump of the input used for debug logging.
    pub fn text_dump(&self) -> String {
        let mut lines = Vec::new();
        for id in &self.identities {
            lines.push(format!("IDENTITY: {} ({})", id.name, id.identity_type));
        }
        for attr in &self.attributes {
            lines.push(format!("ATTRIBUTE: {} = {:?}", attr.name, attr.values));
        }
        for group in &self.groups {
            lines.push(format!("GROUP: {}", group.group));
        }
        lines.join("\n")
    }
}
