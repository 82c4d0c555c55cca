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
//! Declarative (serialized) form of translation profiles.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile family.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfileType {
    /// Maps data of a remote login onto the local store.
    Input,
    /// Shapes data released to a relying party.
    Output,
    /// Post-processes registration requests.
    Registration,
    /// Post-processes enquiry responses.
    Enquiry,
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
            Self::Registration => "REGISTRATION",
            Self::Enquiry => "ENQUIRY",
        })
    }
}

/// Translation profile definition.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct TranslationProfileDefinition {
    /// Profile name.
    pub name: String,

    /// Profile description.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Profile type.
    #[serde(rename = "type")]
    pub profile_type: ProfileType,

    /// Ordered rules.
    #[builder(default)]
    #[serde(default)]
    pub rules: Vec<TranslationRuleDefinition>,
}

impl TranslationProfileDefinition {
    pub fn builder() -> TranslationProfileDefinitionBuilder {
        TranslationProfileDefinitionBuilder::default()
    }
}

/// Rule definition.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TranslationRuleDefinition {
    /// Rule condition.
    #[serde(default = "default_condition")]
    pub condition: String,

    /// Rule action.
    pub action: ActionDefinition,
}

fn default_condition() -> String {
    "true".into()
}

impl TranslationRuleDefinition {
    pub fn new<C: Into<String>>(condition: C, action: ActionDefinition) -> Self {
        Self {
            condition: condition.into(),
            action,
        }
    }
}

/// Action definition: action name with its positional parameters.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ActionDefinition {
    /// Action name.
    pub name: String,

    /// Positional parameters, `null` for an omitted optional parameter.
    #[serde(default)]
    pub parameters: Vec<Option<String>>,
}

impl ActionDefinition {
    /// Action with all parameters given.
    pub fn new<N, I, P>(name: N, parameters: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(|p| Some(p.into())).collect(),
        }
    }

    /// Action with optional parameters.
    pub fn with_parameters<N: Into<String>>(name: N, parameters: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}
