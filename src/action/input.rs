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
//! # Input profile actions
//!
//! Actions mapping the data of a remote login onto the local identity store.
use tracing::debug;

use crate::action::common::*;
use crate::action::{
    ActionEvaluationError, ActionFactory, ActionKind, ActionRegistry, RuleOutcome,
    TranslationAction,
};
use crate::context::Context;
use crate::result::{MappedIdentity, MappingResult};
use crate::types::{IdentityEffectMode, ProfileType};

/// Action of an input profile rule.
#[derive(Clone, Debug)]
pub enum InputAction {
    CreateIdentity(CreateIdentity),
    FilterIdentity(FilterIdentity),
    FilterAttribute(FilterAttribute),
    FilterAttributeValues(FilterAttributeValues),
    MapIdentity(MapIdentity),
    MapAttribute(MapAttribute),
    MapGroup(MapGroup),
    EntityChange(ScheduleEntityChange),
    RemoveStaleData,
    IncludeProfile(IncludeProfile),
    Break,
}

impl TranslationAction for InputAction {
    type Output = MappingResult;

    const PROFILE_TYPES: &'static [ProfileType] = &[ProfileType::Input];

    fn kind(&self) -> ActionKind {
        match self {
            Self::CreateIdentity(_) => ActionKind::CreateIdentity,
            Self::FilterIdentity(_) => ActionKind::FilterIdentity,
            Self::FilterAttribute(_) => ActionKind::FilterAttribute,
            Self::FilterAttributeValues(_) => ActionKind::FilterAttributeValues,
            Self::MapIdentity(_) => ActionKind::MapIdentity,
            Self::MapAttribute(_) => ActionKind::MapAttribute,
            Self::MapGroup(_) => ActionKind::MapGroup,
            Self::EntityChange(_) => ActionKind::EntityChange,
            Self::RemoveStaleData => ActionKind::RemoveStaleData,
            Self::IncludeProfile(_) => ActionKind::IncludeProfile,
            Self::Break => ActionKind::Break,
        }
    }

    fn invoke(
        &self,
        ctx: &Context,
        profile: &str,
        result: &mut MappingResult,
    ) -> Result<RuleOutcome, ActionEvaluationError> {
        match self {
            Self::CreateIdentity(action) => {
                for identity in action.identities(ctx, profile)? {
                    debug!(identity_type = %identity.type_id, "mapped identity");
                    result.add_identity(MappedIdentity {
                        mode: IdentityEffectMode::CreateOrMatch,
                        identity,
                        credential_requirement: None,
                    });
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
            Self::MapIdentity(action) => {
                for mapped in action.identities(ctx, profile)? {
                    debug!(identity_type = %mapped.identity.type_id, mode = ?mapped.mode, "mapped identity");
                    result.add_identity(mapped);
                }
            }
            Self::MapAttribute(action) => match action.attribute(ctx, profile)? {
                Some(mapped) => {
                    debug!(attribute = %mapped.attribute.name, "mapped attribute");
                    result.add_attribute(mapped);
                }
                None => debug!(attribute = %action.name, "attribute value is null, skipped"),
            },
            Self::MapGroup(action) => {
                for mapped in action.groups(ctx, profile)? {
                    debug!(group = %mapped.group, "mapped group");
                    result.add_group(mapped);
                }
            }
            Self::EntityChange(action) => {
                let change = action.change(ctx)?;
                debug!(operation = ?change.operation, time = %change.scheduled_time, "entity change scheduled");
                result.add_entity_change(change);
            }
            Self::RemoveStaleData => result.set_clean_stale_data(),
            Self::IncludeProfile(action) => {
                return Ok(RuleOutcome::Include(action.profile.clone()));
            }
            Self::Break => return Ok(RuleOutcome::Break),
        }
        Ok(RuleOutcome::Continue)
    }
}

impl Default for ActionRegistry<InputAction> {
    fn default() -> Self {
        Self::new([
            ActionFactory::new(ActionKind::CreateIdentity, CreateIdentity::PARAMETERS, |p| {
                CreateIdentity::from_parameters(p).map(InputAction::CreateIdentity)
            }),
            ActionFactory::new(ActionKind::FilterIdentity, FilterIdentity::PARAMETERS, |p| {
                FilterIdentity::from_parameters(p).map(InputAction::FilterIdentity)
            }),
            ActionFactory::new(ActionKind::FilterAttribute, FilterAttribute::PARAMETERS, |p| {
                FilterAttribute::from_parameters(p).map(InputAction::FilterAttribute)
            }),
            ActionFactory::new(
                ActionKind::FilterAttributeValues,
                FilterAttributeValues::PARAMETERS,
                |p| FilterAttributeValues::from_parameters(p).map(InputAction::FilterAttributeValues),
            ),
            ActionFactory::new(ActionKind::MapIdentity, MapIdentity::PARAMETERS, |p| {
                MapIdentity::from_parameters(p).map(InputAction::MapIdentity)
            }),
            ActionFactory::new(ActionKind::MapAttribute, MapAttribute::PARAMETERS, |p| {
                MapAttribute::from_parameters(p).map(InputAction::MapAttribute)
            }),
            ActionFactory::new(ActionKind::MapGroup, MapGroup::PARAMETERS, |p| {
                MapGroup::from_parameters(p).map(InputAction::MapGroup)
            }),
            ActionFactory::new(
                ActionKind::EntityChange,
                ScheduleEntityChange::PARAMETERS,
                |p| ScheduleEntityChange::from_parameters(p).map(InputAction::EntityChange),
            ),
            ActionFactory::new(ActionKind::RemoveStaleData, &[], |_| {
                Ok(InputAction::RemoveStaleData)
            }),
            ActionFactory::new(ActionKind::IncludeProfile, IncludeProfile::PARAMETERS, |p| {
                IncludeProfile::from_parameters(p).map(InputAction::IncludeProfile)
            }),
            ActionFactory::new(ActionKind::Break, &[], |_| Ok(InputAction::Break)),
        ])
    }
}
