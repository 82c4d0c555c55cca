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
//! # Action parameters
//!
//! Validated parameters of every action kind together with the logic
//! shared by the action families. Each struct declares its positional
//! parameters in `PARAMETERS` and is created through `from_parameters`.
use chrono::{Duration, Utc};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::action::{
    ActionEvaluationError, ActionKind, ActionParameterDefinition, ActionParameters, ParameterKind,
    evaluate_value, evaluate_values,
};
use crate::context::Context;
use crate::expression::{CompiledExpression, value_to_string, value_to_strings};
use crate::profile::error::ProfileDefinitionError;
use crate::result::{FilterTarget, MappedAttribute, MappedGroup, MappedIdentity};
use crate::types::{
    Attribute, AttributeEffectMode, AttributeVisibility, AutomaticRequestAction, EntityChange,
    EntityScheduledOperation, EntityState, GroupEffectMode, Identity, IdentityEffectMode,
};

use crate::action::ParameterKind::{Enumeration, Expression, Regex as RegexParam, Text};

const fn mandatory(name: &'static str, kind: ParameterKind) -> ActionParameterDefinition {
    ActionParameterDefinition::mandatory(name, kind)
}

const fn optional(name: &'static str, kind: ParameterKind) -> ActionParameterDefinition {
    ActionParameterDefinition::optional(name, kind)
}

/// Create identities out of an expression.
#[derive(Clone, Debug)]
pub struct CreateIdentity {
    pub identity_type: String,
    pub value: CompiledExpression,
}

impl CreateIdentity {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("identityType", Text),
        mandatory("expression", Expression),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            identity_type: params.text(0)?,
            value: params.expression(1)?,
        })
    }

    /// Identities for every non null value of the expression.
    pub(crate) fn identities(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Vec<Identity>, ActionEvaluationError> {
        Ok(
            evaluate_values(ActionKind::CreateIdentity, "expression", &self.value, ctx)?
                .into_iter()
                .map(|value| Identity {
                    translation_profile: Some(profile.to_string()),
                    ..Identity::new(self.identity_type.as_str(), value)
                })
                .collect(),
        )
    }
}

/// Remove identities of a type and/or with a value matching the pattern.
#[derive(Clone, Debug)]
pub struct FilterIdentity {
    pub identity_type: Option<String>,
    pub value: Option<Regex>,
}

impl FilterIdentity {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        optional("identityType", Text),
        optional("valueRegex", RegexParam),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            identity_type: params.optional_text(0),
            value: params.optional_regex(1)?,
        })
    }

    fn matches(&self, identity: &Identity) -> bool {
        self.identity_type
            .as_deref()
            .is_none_or(|type_id| type_id == identity.type_id)
            && self
                .value
                .as_ref()
                .is_none_or(|re| re.is_match(&identity.value))
    }

    pub(crate) fn apply<T: FilterTarget>(&self, target: &mut T) -> usize {
        let removed = target.retain_identities(|identity| !self.matches(identity));
        debug!(removed, "filtered identities");
        removed
    }
}

/// Release an attribute with values out of an expression.
#[derive(Clone, Debug)]
pub struct CreateAttribute {
    pub name: String,
    pub value: CompiledExpression,
}

impl CreateAttribute {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("attributeName", Text),
        mandatory("expression", Expression),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.text(0)?,
            value: params.expression(1)?,
        })
    }

    /// Attribute for a non null expression value.
    pub(crate) fn attribute(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Attribute>, ActionEvaluationError> {
        Ok(
            evaluate_value(ActionKind::CreateAttribute, "expression", &self.value, ctx)?.map(
                |value| Attribute {
                    translation_profile: Some(profile.to_string()),
                    ..Attribute::new(self.name.as_str(), "/", value_to_strings(&value))
                },
            ),
        )
    }
}

/// Remove attributes with a name matching the pattern.
#[derive(Clone, Debug)]
pub struct FilterAttribute {
    pub name: Regex,
}

impl FilterAttribute {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("attributeNameRegex", RegexParam)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.regex(0)?,
        })
    }

    pub(crate) fn apply<T: FilterTarget>(&self, target: &mut T) -> usize {
        let removed = target.retain_attributes(|attribute| !self.name.is_match(&attribute.name));
        debug!(removed, "filtered attributes");
        removed
    }
}

/// Remove the values of an attribute matching the pattern. The attribute
/// itself is kept even when no value remains.
#[derive(Clone, Debug)]
pub struct FilterAttributeValues {
    pub name: String,
    pub value: Regex,
}

impl FilterAttributeValues {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("attributeName", Text),
        mandatory("valueRegex", RegexParam),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.text(0)?,
            value: params.regex(1)?,
        })
    }

    pub(crate) fn apply<T: FilterTarget>(&self, target: &mut T) -> usize {
        let Some(attribute) = target.attribute_mut(&self.name) else {
            return 0;
        };
        let before = attribute.values.len();
        attribute.values.retain(|value| !self.value.is_match(value));
        let removed = before - attribute.values.len();
        debug!(attribute = %self.name, removed, "filtered attribute values");
        removed
    }
}

/// Restore original attributes with a name matching the pattern.
#[derive(Clone, Debug)]
pub struct UnfilterAttribute {
    pub name: Regex,
}

impl UnfilterAttribute {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("attributeNameRegex", RegexParam)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.regex(0)?,
        })
    }
}

/// Map remote data to local identities.
#[derive(Clone, Debug)]
pub struct MapIdentity {
    pub identity_type: String,
    pub value: CompiledExpression,
    pub credential_requirement: Option<String>,
    pub mode: IdentityEffectMode,
}

impl MapIdentity {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("identityType", Text),
        mandatory("expression", Expression),
        optional("credentialRequirement", Text),
        mandatory("effectMode", Enumeration(IdentityEffectMode::VALUES)),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            identity_type: params.text(0)?,
            value: params.expression(1)?,
            credential_requirement: params.optional_text(2),
            mode: params.enumeration(3)?,
        })
    }

    pub(crate) fn identities(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Vec<MappedIdentity>, ActionEvaluationError> {
        Ok(
            evaluate_values(ActionKind::MapIdentity, "expression", &self.value, ctx)?
                .into_iter()
                .map(|value| MappedIdentity {
                    mode: self.mode,
                    identity: Identity {
                        translation_profile: Some(profile.to_string()),
                        ..Identity::new(self.identity_type.as_str(), value)
                    },
                    credential_requirement: self.credential_requirement.clone(),
                })
                .collect(),
        )
    }
}

/// Map remote data to a local attribute.
#[derive(Clone, Debug)]
pub struct MapAttribute {
    pub name: String,
    pub group: String,
    pub value: CompiledExpression,
    pub visibility: AttributeVisibility,
    pub mode: AttributeEffectMode,
}

impl MapAttribute {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("attributeName", Text),
        mandatory("group", Text),
        mandatory("expression", Expression),
        mandatory("visibility", Enumeration(AttributeVisibility::VALUES)),
        mandatory("effectMode", Enumeration(AttributeEffectMode::VALUES)),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.text(0)?,
            group: params.text(1)?,
            value: params.expression(2)?,
            visibility: params.enumeration(3)?,
            mode: params.enumeration(4)?,
        })
    }

    pub(crate) fn attribute(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<MappedAttribute>, ActionEvaluationError> {
        Ok(
            evaluate_value(ActionKind::MapAttribute, "expression", &self.value, ctx)?.map(
                |value| MappedAttribute {
                    mode: self.mode,
                    attribute: Attribute {
                        visibility: self.visibility,
                        translation_profile: Some(profile.to_string()),
                        ..Attribute::new(
                            self.name.as_str(),
                            self.group.as_str(),
                            value_to_strings(&value),
                        )
                    },
                },
            ),
        )
    }
}

/// Map remote data to local group memberships.
#[derive(Clone, Debug)]
pub struct MapGroup {
    pub group: CompiledExpression,
    pub mode: GroupEffectMode,
}

impl MapGroup {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("expression", Expression),
        mandatory("effectMode", Enumeration(GroupEffectMode::VALUES)),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            group: params.expression(0)?,
            mode: params.enumeration(1)?,
        })
    }

    pub(crate) fn groups(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Vec<MappedGroup>, ActionEvaluationError> {
        Ok(
            evaluate_values(ActionKind::MapGroup, "expression", &self.group, ctx)?
                .into_iter()
                .map(|group| MappedGroup {
                    mode: self.mode,
                    group,
                    remote_idp: None,
                    translation_profile: profile.to_string(),
                })
                .collect(),
        )
    }
}

/// Schedule an operation on the entity.
#[derive(Clone, Debug)]
pub struct ScheduleEntityChange {
    pub operation: EntityScheduledOperation,
    pub delay: CompiledExpression,
}

impl ScheduleEntityChange {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory(
            "scheduledOperation",
            Enumeration(EntityScheduledOperation::VALUES),
        ),
        mandatory("scheduledAfterDays", Expression),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            operation: params.enumeration(0)?,
            delay: params.expression(1)?,
        })
    }

    /// Change scheduled the evaluated number of days from now.
    pub(crate) fn change(&self, ctx: &Context) -> Result<EntityChange, ActionEvaluationError> {
        let value = evaluate_value(
            ActionKind::EntityChange,
            "scheduledAfterDays",
            &self.delay,
            ctx,
        )?;
        let days = match &value {
            Some(Value::Number(number)) => number.as_i64(),
            Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
        .filter(|days| *days >= 0)
        .ok_or_else(|| ActionEvaluationError::InvalidValue {
            action: ActionKind::EntityChange,
            parameter: "scheduledAfterDays",
            value: value.as_ref().map(value_to_string).unwrap_or_default(),
        })?;
        let scheduled_time = Duration::try_days(days)
            .and_then(|delay| Utc::now().checked_add_signed(delay))
            .ok_or_else(|| ActionEvaluationError::InvalidValue {
                action: ActionKind::EntityChange,
                parameter: "scheduledAfterDays",
                value: days.to_string(),
            })?;
        Ok(EntityChange {
            operation: self.operation,
            scheduled_time,
        })
    }
}

/// Run another profile of the same family.
#[derive(Clone, Debug)]
pub struct IncludeProfile {
    pub profile: String,
}

impl IncludeProfile {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("profile", Text)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            profile: params.text(0)?,
        })
    }
}

/// Add (or replace) an attribute of a registration request.
#[derive(Clone, Debug)]
pub struct AddAttribute {
    pub name: String,
    pub group: String,
    pub value: CompiledExpression,
    pub visibility: AttributeVisibility,
}

impl AddAttribute {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("attributeName", Text),
        mandatory("group", Text),
        mandatory("expression", Expression),
        mandatory("visibility", Enumeration(AttributeVisibility::VALUES)),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            name: params.text(0)?,
            group: params.text(1)?,
            value: params.expression(2)?,
            visibility: params.enumeration(3)?,
        })
    }

    pub(crate) fn attribute(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Attribute>, ActionEvaluationError> {
        Ok(
            evaluate_value(ActionKind::AddAttribute, "expression", &self.value, ctx)?.map(
                |value| Attribute {
                    visibility: self.visibility,
                    translation_profile: Some(profile.to_string()),
                    ..Attribute::new(
                        self.name.as_str(),
                        self.group.as_str(),
                        value_to_strings(&value),
                    )
                },
            ),
        )
    }
}

/// Add group memberships to a registration request.
#[derive(Clone, Debug)]
pub struct AddToGroup {
    pub group: CompiledExpression,
}

impl AddToGroup {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("group", Expression)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            group: params.expression(0)?,
        })
    }

    pub(crate) fn groups(&self, ctx: &Context) -> Result<Vec<String>, ActionEvaluationError> {
        evaluate_values(ActionKind::AddToGroup, "group", &self.group, ctx)
    }
}

/// Remove group memberships matching the pattern from a registration request.
#[derive(Clone, Debug)]
pub struct FilterGroup {
    pub group: Regex,
}

impl FilterGroup {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("groupRegex", RegexParam)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            group: params.regex(0)?,
        })
    }
}

/// Assign attribute classes in a group.
#[derive(Clone, Debug)]
pub struct AddAttributeClass {
    pub group: String,
    pub class: CompiledExpression,
}

impl AddAttributeClass {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        mandatory("group", Text),
        mandatory("attributeClass", Expression),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            group: params.text(0)?,
            class: params.expression(1)?,
        })
    }

    pub(crate) fn classes(&self, ctx: &Context) -> Result<Vec<String>, ActionEvaluationError> {
        evaluate_values(
            ActionKind::AddAttributeClass,
            "attributeClass",
            &self.class,
            ctx,
        )
    }
}

#[derive(Clone, Debug)]
pub struct SetCredentialRequirement {
    pub credential_requirement: String,
}

impl SetCredentialRequirement {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("credentialRequirement", Text)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            credential_requirement: params.text(0)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SetEntityState {
    pub state: EntityState,
}

impl SetEntityState {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("entityState", Enumeration(EntityState::VALUES))];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            state: params.enumeration(0)?,
        })
    }
}

/// Decision taken on a request without administrator interaction.
#[derive(Clone, Debug)]
pub struct AutoProcess {
    pub action: AutomaticRequestAction,
}

impl AutoProcess {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("action", Enumeration(AutomaticRequestAction::VALUES))];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            action: params.enumeration(0)?,
        })
    }
}

/// URL computed by an expression (`redirect`, `confirmationRedirect`).
#[derive(Clone, Debug)]
pub struct RedirectUrl {
    pub url: CompiledExpression,
}

impl RedirectUrl {
    pub const PARAMETERS: &'static [ActionParameterDefinition] =
        &[mandatory("url", Expression)];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            url: params.expression(0)?,
        })
    }

    pub(crate) fn url(
        &self,
        kind: ActionKind,
        ctx: &Context,
    ) -> Result<Option<String>, ActionEvaluationError> {
        Ok(evaluate_value(kind, "url", &self.url, ctx)?.map(|value| value_to_string(&value)))
    }
}

/// Message presented after a request was submitted.
#[derive(Clone, Debug)]
pub struct SubmitMessage {
    pub caption: Option<String>,
    pub message: String,
}

impl SubmitMessage {
    pub const PARAMETERS: &'static [ActionParameterDefinition] = &[
        optional("caption", Text),
        mandatory("message", Text),
    ];

    pub fn from_parameters(params: &ActionParameters<'_>) -> Result<Self, ProfileDefinitionError> {
        Ok(Self {
            caption: params.optional_text(0),
            message: params.text(1)?,
        })
    }
}
