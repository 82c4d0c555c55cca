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
//! # Translation profiles
//!
//! A profile is an ordered, immutable list of rules built from a
//! [`TranslationProfileDefinition`]. Every rule couples a compiled condition
//! with an action of the profile family.
use tracing::debug;

use crate::action::{
    ActionEvaluationError, ActionRegistry, FormAction, InputAction, OutputAction, RuleOutcome,
    TranslationAction,
};
use crate::context::Context;
use crate::expression::{CompiledCondition, Evaluator};
use crate::types::{ProfileType, TranslationProfileDefinition};

pub mod error;
pub mod registry;

pub use error::ProfileDefinitionError;
pub use registry::ProfileRegistry;

/// Input profile.
pub type InputTranslationProfile = TranslationProfile<InputAction>;
/// Output profile.
pub type OutputTranslationProfile = TranslationProfile<OutputAction>;
/// Registration or enquiry profile.
pub type FormTranslationProfile = TranslationProfile<FormAction>;

/// Translation rule.
#[derive(Clone, Debug)]
pub struct Rule<A> {
    condition: CompiledCondition,
    action: A,
}

impl<A: TranslationAction> Rule<A> {
    pub fn new(condition: CompiledCondition, action: A) -> Self {
        Self { condition, action }
    }

    pub fn condition(&self) -> &CompiledCondition {
        &self.condition
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    /// Invoke the action when the condition holds.
    ///
    /// Returns `None` when the condition evaluated to false.
    pub fn invoke(
        &self,
        ctx: &Context,
        profile: &str,
        result: &mut A::Output,
    ) -> Result<Option<RuleOutcome>, ActionEvaluationError> {
        let applies =
            self.condition
                .evaluate(ctx)
                .map_err(|source| ActionEvaluationError::Condition {
                    condition: self.condition.source().to_string(),
                    source,
                })?;
        if !applies {
            debug!(condition = %self.condition.source(), "condition not met, rule skipped");
            return Ok(None);
        }
        debug!(condition = %self.condition.source(), "condition met, invoking action");
        self.action.invoke(ctx, profile, result).map(Some)
    }
}

/// Translation profile of a family.
#[derive(Clone, Debug)]
pub struct TranslationProfile<A> {
    name: String,
    description: Option<String>,
    profile_type: ProfileType,
    rules: Vec<Rule<A>>,
}

impl<A: TranslationAction> TranslationProfile<A> {
    pub fn new<S: Into<String>>(name: S, profile_type: ProfileType, rules: Vec<Rule<A>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            profile_type,
            rules,
        }
    }

    /// Build the profile out of its definition.
    ///
    /// Every rule is validated eagerly, the first broken rule fails the
    /// whole profile.
    pub fn build(
        definition: &TranslationProfileDefinition,
        actions: &ActionRegistry<A>,
        evaluator: &dyn Evaluator,
    ) -> Result<Self, ProfileDefinitionError> {
        if !A::supports(definition.profile_type) {
            return Err(ProfileDefinitionError::IncompatibleProfileType {
                expected: A::PROFILE_TYPES
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("/"),
                found: definition.profile_type,
            });
        }
        let rules = definition
            .rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| {
                evaluator
                    .compile_condition(&rule.condition)
                    .and_then(|condition| {
                        actions
                            .create(definition.profile_type, &rule.action, evaluator)
                            .map(|action| Rule::new(condition, action))
                    })
                    .map_err(|source| ProfileDefinitionError::Rule {
                        profile: definition.name.clone(),
                        rule: idx + 1,
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            profile_type: definition.profile_type,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn profile_type(&self) -> ProfileType {
        self.profile_type
    }

    pub fn rules(&self) -> &[Rule<A>] {
        &self.rules
    }
}
