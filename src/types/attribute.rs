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

/// Attribute of an entity in a group.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct Attribute {
    /// Attribute name.
    pub name: String,

    /// Group the attribute is assigned in.
    #[builder(default = "\"/\".into()")]
    #[serde(default = "root_group")]
    pub group_path: String,

    /// Attribute values.
    #[builder(default)]
    #[serde(default)]
    pub values: Vec<String>,

    /// Attribute visibility.
    #[builder(default)]
    #[serde(default)]
    pub visibility: AttributeVisibility,

    /// Remote identity provider the attribute was obtained from.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_idp: Option<String>,

    /// Translation profile which created the attribute.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_profile: Option<String>,
}

fn root_group() -> String {
    "/".into()
}

impl Attribute {
    pub fn new<N: Into<String>, G: Into<String>>(name: N, group_path: G, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            group_path: group_path.into(),
            values,
            visibility: AttributeVisibility::default(),
            remote_idp: None,
            translation_profile: None,
        }
    }

    /// First value or an empty string.
    pub fn first_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }
}

/// Attribute as reported by the remote identity provider.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct RemoteAttribute {
    /// Attribute name.
    pub name: String,

    /// Attribute values.
    #[builder(default)]
    #[serde(default)]
    pub values: Vec<String>,
}

/// Whether the attribute is released to relying parties.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeVisibility {
    /// Released to relying parties.
    #[default]
    Full,
    /// Only visible inside the platform.
    Local,
}

impl AttributeVisibility {
    pub const VALUES: &'static [&'static str] = &["full", "local"];
}

/// Effect of a mapped attribute on the local store.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeEffectMode {
    /// Only create the attribute when it does not exist yet.
    CreateOnly,
    /// Create or overwrite the attribute.
    #[default]
    CreateOrUpdate,
    /// Only overwrite an already existing attribute.
    UpdateOnly,
}

impl AttributeEffectMode {
    pub const VALUES: &'static [&'static str] = &["CREATE_ONLY", "CREATE_OR_UPDATE", "UPDATE_ONLY"];
}
