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
//! # Form profile actions
//!
//! Actions post-processing registration requests and enquiry responses.
use tracing::debug;

use crate::action::common::*;
use crate::action::{
    ActionEvaluationError, ActionFactory, ActionKind, ActionRegistry, RuleOutcome,
    TranslationAction,
};
use crate::context::Context;
use crate::result::{GroupParam, PostSubmitMessage, TranslatedRequest};
use crate::types::ProfileType;

/// Action of a registration or enquiry profile rule.
#[derive(Clone, Debug)]
pub enum FormAction {
    CreateIdentity(CreateIdentity),
    FilterIdentity(FilterIdentity),
    FilterAttribute(FilterAttribute),
    FilterAttributeValues(FilterAttributeValues),
    EntityChange(ScheduleEntityChange),
    Break,
    AddAttribute(AddAttribute),
    AddToGroup(AddToGroup),
    FilterGroup(FilterGroup),
    AddAttributeClass(AddAttributeClass),
    SetCredentialRequirement(SetCredentialRequirement),
    SetEntityState(SetEntityState),
    AutoProcess(AutoProcess),
    Redirect(RedirectUrl),
    ConfirmationRedirect(RedirectUrl),
    SubmitMessage(SubmitMessage),
}

impl TranslationAction for FormAction {
    type Output = TranslatedRequest;

    const PROFILE_TYPES: &'static [ProfileType] =
        &[ProfileType::Registration, ProfileType::Enquiry];

    fn kind(&self) -> ActionKind {
        match self {
            Self::CreateIdentity(_) => ActionKind::CreateIdentity,
            Self::FilterIdentity(_) => ActionKind::FilterIdentity,
            Self::FilterAttribute(_) => ActionKind::FilterAttribute,
            Self::FilterAttributeValues(_) => ActionKind::FilterAttributeValues,
            Self::EntityChange(_) => ActionKind::EntityChange,
            Self::Break => ActionKind::Break,
            Self::AddAttribute(_) => ActionKind::AddAttribute,
            Self::AddToGroup(_) => ActionKind::AddToGroup,
            Self::FilterGroup(_) => ActionKind::FilterGroup,
            Self::AddAttributeClass(_) => ActionKind::AddAttributeClass,
            Self::SetCredentialRequirement(_) => ActionKind::SetCredentialRequirement,
            Self::SetEntityState(_) => ActionKind::SetEntityState,
            Self::AutoProcess(_) => ActionKind::AutoProcess,
            Self::Redirect(_) => ActionKind::Redirect,
            Self::ConfirmationRedirect(_) => ActionKind::ConfirmationRedirect,
            Self::SubmitMessage(_) => ActionKind::SubmitMessage,
        }
    }

    fn invoke(
        &self,
        ctx: &Context,
        profile: &str,
        result: &mut TranslatedRequest,
    ) -> Result<RuleOutcome, ActionEvaluationError> {
        match self {
            Self::CreateIdentity(action) => {
                for identity in action.identities(ctx, profile)? {
                    result.add_identity(identity);
                }
            }
            Self::FilterIdentity(action) => {
                action.apply(result);
            }
            Self::FilterAttribute(action) => {
                action.apply(result);
            }
            Self::FilterAttributeValues(action) => {
                action.apply(result);
            }
            Self::EntityChange(action) => {
                let change = action.change(ctx)?;
                debug!(operation = ?change.operation, time = %change.scheduled_time, "entity change scheduled");
                result.set_entity_change(change);
            }
            Self::Break => return Ok(RuleOutcome::Break),
            Self::AddAttribute(action) => match action.attribute(ctx, profile)? {
                Some(attribute) => {
                    debug!(attribute = %attribute.name, "added attribute");
                    result.set_attribute(attribute);
                }
                None => debug!(attribute = %action.name, "attribute value is null, skipped"),
            },
            Self::AddToGroup(action) => {
                for group in action.groups(ctx)? {
                    debug!(%group, "added group membership");
                    result.add_group(GroupParam {
                        translation_profile: Some(profile.to_string()),
                        ..GroupParam::new(group)
                    });
                }
            }
            Self::FilterGroup(action) => {
                let removed = result.retain_groups(|g| !action.group.is_match(&g.group));
                debug!(removed, "filtered group memberships");
            }
            Self::AddAttributeClass(action) => {
                for class in action.classes(ctx)? {
                    debug!(group = %action.group, %class, "added attribute class");
                    result.add_attribute_class(action.group.as_str(), class);
                }
            }
            Self::SetCredentialRequirement(action) => {
                result.set_credential_requirement(action.credential_requirement.as_str());
            }
            Self::SetEntityState(action) => result.set_entity_state(action.state),
            Self::AutoProcess(action) => {
                debug!(action = ?action.action, "automatic processing decided");
                result.set_auto_action(action.action);
            }
            Self::Redirect(action) => {
                result.set_redirect_url(action.url(ActionKind::Redirect, ctx)?);
            }
            Self::ConfirmationRedirect(action) => {
                result.set_redirect_url(action.url(ActionKind::ConfirmationRedirect, ctx)?);
            }
            Self::SubmitMessage(action) => result.set_post_submit_message(PostSubmitMessage {
                caption: action.caption.clone(),
                message: action.message.clone(),
            }),
        }
        Ok(RuleOutcome::Continue)
    }
}

impl Default for ActionRegistry<FormAction> {
    fn default() -> Self {
        Self::new([
            ActionFactory::new(ActionKind::CreateIdentity, CreateIdentity::PARAMETERS, |p| {
                CreateIdentity::from_parameters(p).map(FormAction::CreateIdentity)
            }),
            ActionFactory::new(ActionKind::FilterIdentity, FilterIdentity::PARAMETERS, |p| {
                FilterIdentity::from_parameters(p).map(FormAction::FilterIdentity)
            }),
            ActionFactory::new(ActionKind::FilterAttribute, FilterAttribute::PARAMETERS, |p| {
                FilterAttribute::from_parameters(p).map(FormAction::FilterAttribute)
            }),
            ActionFactory::new(
                ActionKind::FilterAttributeValues,
                FilterAttributeValues::PARAMETERS,
                |p| FilterAttributeValues::from_parameters(p).map(FormAction::FilterAttributeValues),
            ),
            ActionFactory::new(
                ActionKind::EntityChange,
                ScheduleEntityChange::PARAMETERS,
                |p| ScheduleEntityChange::from_parameters(p).map(FormAction::EntityChange),
            ),
            ActionFactory::new(ActionKind::Break, &[], |_| Ok(FormAction::Break)),
            ActionFactory::new(ActionKind::AddAttribute, AddAttribute::PARAMETERS, |p| {
                AddAttribute::from_parameters(p).map(FormAction::AddAttribute)
            }),
            ActionFactory::new(ActionKind::AddToGroup, AddToGroup::PARAMETERS, |p| {
                AddToGroup::from_parameters(p).map(FormAction::AddToGroup)
            }),
            ActionFactory::new(ActionKind::FilterGroup, FilterGroup::PARAMETERS, |p| {
                FilterGroup::from_parameters(p).map(FormAction::FilterGroup)
            }),
            ActionFactory::new(
                ActionKind::AddAttributeClass,
                AddAttributeClass::PARAMETERS,
                |p| AddAttributeClass::from_parameters(p).map(FormAction::AddAttributeClass),
            ),
            ActionFactory::new(
                ActionKind::SetCredentialRequirement,
                SetCredentialRequirement::PARAMETERS,
                |p| {
                    SetCredentialRequirement::from_parameters(p)
                        .map(FormAction::SetCredentialRequirement)
                },
            ),
            ActionFactory::new(ActionKind::SetEntityState, SetEntityState::PARAMETERS, |p| {
                SetEntityState::from_parameters(p).map(FormAction::SetEntityState)
            }),
            ActionFactory::new(ActionKind::AutoProcess, AutoProcess::PARAMETERS, |p| {
                AutoProcess::from_parameters(p).map(FormAction::AutoProcess)
            }),
            ActionFactory::new(ActionKind::Redirect, RedirectUrl::PARAMETERS, |p| {
                RedirectUrl::from_parameters(p).map(FormAction::Redirect)
            }),
            ActionFactory::new(
                ActionKind::ConfirmationRedirect,
                RedirectUrl::PARAMETERS,
                |p| RedirectUrl::from_parameters(p).map(FormAction::ConfirmationRedirect),
            ),
            ActionFactory::new(ActionKind::SubmitMessage, SubmitMessage::PARAMETERS, |p| {
                SubmitMessage::from_parameters(p).map(FormAction::SubmitMessage)
            }),
        ])
    }
}
