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
//! Registration and enquiry forms and the requests filled in from them.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::types::attribute::Attribute;
use crate::types::identity::Identity;

/// How a form parameter value is collected.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterRetrievalSettings {
    /// Entered by the user.
    #[default]
    Interactive,
    /// Taken from the remote login, shown read only.
    Automatic,
    /// Taken from the remote login, not shown.
    AutomaticHidden,
    /// Taken from the remote login when available, entered otherwise.
    AutomaticOrInteractive,
    /// Taken from the remote login and editable.
    AutomaticAndInteractive,
}

impl ParameterRetrievalSettings {
    /// Whether the value can only come from the remote login.
    pub fn is_automatic_only(&self) -> bool {
        matches!(self, Self::Automatic | Self::AutomaticHidden)
    }
}

/// Identity parameter of a form.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct IdentityRegistrationParam {
    /// Identity type.
    pub identity_type: String,

    #[builder(default)]
    #[serde(default)]
    pub retrieval: ParameterRetrievalSettings,
}

/// Attribute parameter of a form.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct AttributeRegistrationParam {
    /// Attribute name.
    pub attribute_type: String,

    /// Group of the attribute.
    #[builder(default = "\"/\".into()")]
    #[serde(default = "root_group")]
    pub group: String,

    #[builder(default)]
    #[serde(default)]
    pub retrieval: ParameterRetrievalSettings,
}

/// Group parameter of a form.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct GroupRegistrationParam {
    /// Path of the offered group.
    pub group_path: String,

    #[builder(default)]
    #[serde(default)]
    pub retrieval: ParameterRetrievalSettings,
}

fn root_group() -> String {
    "/".into()
}

/// Registration or enquiry form.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct Form {
    /// Form name.
    pub name: String,

    /// Credential requirement assigned to entities registered with the form.
    #[builder(default)]
    #[serde(default)]
    pub default_credential_requirement: String,

    #[builder(default)]
    #[serde(default)]
    pub identity_params: Vec<IdentityRegistrationParam>,

    #[builder(default)]
    #[serde(default)]
    pub attribute_params: Vec<AttributeRegistrationParam>,

    #[builder(default)]
    #[serde(default)]
    pub group_params: Vec<GroupRegistrationParam>,
}

/// Selection of a group parameter.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct GroupSelection {
    pub selected: bool,

    /// Remote identity provider which provided the selection.
    #[builder(default)]
    #[serde(default)]
    pub external_idp: Option<String>,

    /// Input translation profile which provided the selection.
    #[builder(default)]
    #[serde(default)]
    pub translation_profile: Option<String>,
}

/// Request submitted for a form.
///
/// Identity, attribute and group entries are aligned by position with the
/// respective form parameters, `None` marks a parameter left empty.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(strip_option, into))]
pub struct FormRequest {
    #[builder(default)]
    #[serde(default)]
    pub request_id: Option<String>,

    #[builder(default)]
    #[serde(default)]
    pub identities: Vec<Option<Identity>>,

    #[builder(default)]
    #[serde(default)]
    pub attributes: Vec<Option<Attribute>>,

    #[builder(default)]
    #[serde(default)]
    pub group_selections: Vec<GroupSelection>,

    /// Acceptance of the form agreements.
    #[builder(default)]
    #[serde(default)]
    pub agreements: Vec<bool>,

    #[builder(default)]
    #[serde(default)]
    pub user_locale: Option<String>,
}

/// How the form was triggered.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggeringMode {
    /// Opened from the login screen.
    ManualAtLogin,
    /// Opened from a standalone link.
    #[default]
    ManualStandalone,
    /// Filled by an administrator.
    ManualAdmin,
    /// Shown after a remote login of an unknown user.
    AfterRemoteLoginWhenUnknownUser,
    /// Remote login started from the form.
    AfterRemoteLoginFromRegistrationForm,
}

/// Circumstances of a form submission.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct RegistrationContext {
    #[builder(default)]
    #[serde(default)]
    pub triggering_mode: TriggeringMode,

    /// Whether the form is shown on an identity provider endpoint.
    #[builder(default)]
    #[serde(default)]
    pub on_idp_endpoint: bool,
}

/// Submission status the profile is evaluated for.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestSubmitStatus {
    #[default]
    Submitted,
    NotSubmitted,
}

/// Kind of a confirmed element.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfirmedElementType {
    Identity,
    Attribute,
}

/// Element (identity or attribute value) which was just confirmed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfirmedElement {
    pub element_type: ConfirmedElementType,
    /// Identity type or attribute name.
    pub name: String,
    /// Confirmed value.
    pub value: String,
}

impl ConfirmedElement {
    pub fn identity(identity: &Identity) -> Self {
        Self {
            element_type: ConfirmedElementType::Identity,
            name: identity.type_id.clone(),
            value: identity.value.clone(),
        }
    }

    pub fn attribute(attribute: &Attribute) -> Self {
        Self {
            element_type: ConfirmedElementType::Attribute,
            name: attribute.name.clone(),
            value: attribute.first_value().to_string(),
        }
    }
}

/// Automatic decision on a submitted request.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomaticRequestAction {
    #[default]
    None,
    Accept,
    Reject,
    Drop,
}

impl AutomaticRequestAction {
    pub const VALUES: &'static [&'static str] = &["none", "accept", "reject", "drop"];
}
