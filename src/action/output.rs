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
//! # Output profile actions
//!
//! Actions shaping the attributes and identities released to a relying
//! party.
use tracing::debug;

use crate::action::common::*;
use crate::action::{
    ActionEvaluationError, ActionFactory, ActionKind, ActionRegistry, RuleOutcome,
    TranslationAction,
};
use crate::context::Context;
use crate::result::ReleaseResult;
use crate::types::ProfileType;

/// Action of an output profile rule.
#[derive(Clone, Debug)]
pub enum OutputAction {
    CreateIdentity(CreateIdentity),
    FilterIdentity(FilterIdentity),
    CreateAttribute(CreateAttribute),
    FilterAttribute(FilterAttribute),
    FilterAttributeValues(FilterAttributeValues),
    UnfilterAttribute(UnfilterAttribute),
    IncludeProfile(IncludeProfile),
    Break,
}

impl TranslationAction for OutputAction {
    type Output = ReleaseResult;

    const PROFILE_TYPES: &'static [ProfileType] = &[ProfileType::Output];

    fn kind(&self) -> ActionKind {
        match self {
            Self::CreateIdentity(_) => ActionKind::CreateIdentity,
            Self::FilterIdentity(_) => ActionKind::FilterIdentity,
            Self::CreateAttribute(_) => ActionKind::CreateAttribute,
            Self::FilterAttribute(_) => ActionKind::FilterAttribute,
            Self::FilterAttributeValues(_) => ActionKind::FilterAttributeValues,
            Self::UnfilterAttribute(_) => ActionKind::UnfilterAttribute,
            Self::IncludeProfile(_) => ActionKind::IncludeProfile,
            Self::Break => ActionKind::Break,
        }
    }

    fn invoke(
        &self,
        ctx: &Context,
        profile: &str,
        result: &mut ReleaseResult,
    ) -> Result<RuleOutcome, ActionEvaluationError> {
        match self {
            Self::CreateIdentity(action) => {
                for identity in action.identities(ctx, profile)? {
                    if !result.add_identity(identity) {
                        debug!(identity_type = %action.identity_type, "identity already released");
                    }
                }
            }
            Self::FilterIdentity(action) => {
                action.apply(result);
            }
            Self::CreateAttribute(action) => match action.attribute(ctx, profile)? {
                Some(attribute) => {
                    debug!(attribute = %attribute.name, "released attribute");
                    result.set_attribute(attribute);
                }
                None => debug!(attribute = %action.name, "attribute value is null, skipped"),
            },
            Self::FilterAttribute(action) => {
                action.apply(result);
            }
            Self::FilterAttributeValues(action) => {
                action.apply(result);
            }
            Self::UnfilterAttribute(action) => {
                let restored = result.unfilter_attributes(&action.name);
                debug!(restored, "unfiltered attributes");
            }
            Self::IncludeProfile(action) => {
                return Ok(RuleOutcome::Include(action.profile.clone()));
            }
            Self::Break => return Ok(RuleOutcome::Break),
        }
        Ok(RuleOutcome::Continue)
    }
}

impl Default for ActionRegistry<OutputAction> {
    fn default() -> Self {
        Self::new([
            ActionFactory::new(ActionKind::CreateIdentity, CreateIdentity::PARAMETERS, |p| {
                CreateIdentity::from_parameters(p).map(OutputAction::CreateIdentity)
            }),
            ActionFactory::new(ActionKind::FilterIdentity, FilterIdentity::PARAMETERS, |p| {
                FilterIdentity::from_parameters(p).map(OutputAction::FilterIdentity)
            }),
            ActionFactory::new(ActionKind::CreateAttribute, CreateAttribute::PARAMETERS, |p| {
                CreateAttribute::from_parameters(p).map(OutputAction::CreateAttribute)
            }),
            ActionFactory::new(ActionKind::FilterAttribute, FilterAttribute::PARAMETERS, |p| {
                FilterAttribute::from_parameters(p).map(OutputAction::FilterAttribute)
            }),
            ActionFactory::new(
                ActionKind::FilterAttributeValues,
                FilterAttributeValues::PARAMETERS,
                |p| FilterAttributeValues::from_parameters(p).map(OutputAction::FilterAttributeValues),
            ),
            ActionFactory::new(
                ActionKind::UnfilterAttribute,
                UnfilterAttribute::PARAMETERS,
                |p| UnfilterAttribute::from_parameters(p).map(OutputAction::UnfilterAttribute),
            ),
            ActionFactory::new(ActionKind::IncludeProfile, IncludeProfile::PARAMETERS, |p| {
                IncludeProfile::from_parameters(p).map(OutputAction::IncludeProfile)
            }),
            ActionFactory::new(ActionKind::Break, &[], |_| Ok(OutputAction::Break)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::context::output::create_context;
    use crate::expression::ExpressionEvaluator;
    use crate::tests::translation_input;
    use crate::types::ActionDefinition;

    fn action(name: &str, parameters: &[&str]) -> OutputAction {
        ActionRegistry::<OutputAction>::default()
            .create(
                ProfileType::Output,
                &ActionDefinition::new(name, parameters.iter().copied()),
                &ExpressionEvaluator,
            )
            .unwrap()
    }

    fn released_after(actions: &[OutputAction]) -> ReleaseResult {
        let input = translation_input();
        let ctx = create_context(&input);
        let mut result = ReleaseResult::from_input(&input);
        for action in actions {
            let _ = action.invoke(&ctx, "p", &mut result).unwrap();
        }
        result
    }

    #[test]
    fn test_create_attribute_replaces() {
        let result = released_after(&[action("createAttribute", &["cn", "attr['cn'] + '!'"])]);
        assert_eq!(2, result.attributes().len());
        assert_eq!(vec!["John Doe!"], result.attributes()[0].values);
    }

    #[test]
    fn test_create_attribute_from_requester() {
        let result = released_after(&[action("createAttribute", &["org", "requesterAttrs['o']"])]);
        let org = &result.attributes()[2];
        assert_eq!("org", org.name);
        assert_eq!(vec!["Example"], org.values);
    }

    #[rstest]
    #[case(&["cn", "mail"], "c.*", 1)]
    #[case(&["cn", "mail"], ".*", 2)]
    #[case(&["cn", "mail"], "x", 0)]
    fn test_filter_then_unfilter(
        #[case] names: &[&str],
        #[case] pattern: &str,
        #[case] restored: usize,
    ) {
        let mut result = released_after(&[action("filterAttribute", &[".*"])]);
        assert!(result.attributes().is_empty());
        let unfilter = action("unfilterAttribute", &[pattern]);
        let ctx = create_context(&translation_input());
        let _ = unfilter.invoke(&ctx, "p", &mut result).unwrap();
        assert_eq!(restored, result.attributes().len());
        for attribute in result.attributes() {
            assert!(names.contains(&attribute.name.as_str()));
        }
    }

    #[test]
    fn test_create_identity_dedup() {
        let result = released_after(&[
            action("createIdentity", &["userName", "'jdoe'"]),
            action("createIdentity", &["userName", "'jdoe2'"]),
        ]);
        let values: Vec<_> = result.identities().iter().map(|i| i.value.as_str()).collect();
        assert_eq!(vec!["jdoe", "0a1b2c", "jdoe2"], values);
    }
}
