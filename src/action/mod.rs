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
//! # Translation actions
//!
//! Every rule of a profile carries one action. The catalogue of actions is
//! closed: each profile family has its own sum type ([`InputAction`],
//! [`OutputAction`], [`FormAction`]) over the validated parameter structs
//! defined in [`common`]. Actions are created from positional string
//! parameters by the [`ActionRegistry`](registry::ActionRegistry) of the
//! family when a profile is deployed and are immutable afterwards.
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod common;
pub mod error;
pub mod form;
pub mod input;
pub mod output;
pub mod registry;

pub use error::ActionEvaluationError;
pub use form::FormAction;
pub use input::InputAction;
pub use output::OutputAction;
pub use registry::{ActionFactory, ActionRegistry};

use crate::context::Context;
use crate::expression::{CompiledExpression, Evaluator, full_match_regex, value_to_strings};
use crate::profile::error::ProfileDefinitionError;
use crate::types::ProfileType;

/// Names of all action kinds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    CreateIdentity,
    FilterIdentity,
    CreateAttribute,
    FilterAttribute,
    FilterAttributeValues,
    UnfilterAttribute,
    MapIdentity,
    MapAttribute,
    MapGroup,
    EntityChange,
    RemoveStaleData,
    IncludeProfile,
    Break,
    AddAttribute,
    AddToGroup,
    FilterGroup,
    AddAttributeClass,
    SetCredentialRequirement,
    SetEntityState,
    AutoProcess,
    Redirect,
    ConfirmationRedirect,
    SubmitMessage,
}

impl ActionKind {
    /// Action name as used in profile definitions.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateIdentity => "createIdentity",
            Self::FilterIdentity => "filterIdentity",
            Self::CreateAttribute => "createAttribute",
            Self::FilterAttribute => "filterAttribute",
            Self::FilterAttributeValues => "filterAttributeValues",
            Self::UnfilterAttribute => "unfilterAttribute",
            Self::MapIdentity => "mapIdentity",
            Self::MapAttribute => "mapAttribute",
            Self::MapGroup => "mapGroup",
            Self::EntityChange => "entityChange",
            Self::RemoveStaleData => "removeStaleData",
            Self::IncludeProfile => "includeProfile",
            Self::Break => "break",
            Self::AddAttribute => "addAttribute",
            Self::AddToGroup => "addToGroup",
            Self::FilterGroup => "filterGroup",
            Self::AddAttributeClass => "addAttributeClass",
            Self::SetCredentialRequirement => "setCredentialRequirement",
            Self::SetEntityState => "setEntityState",
            Self::AutoProcess => "autoProcess",
            Self::Redirect => "redirect",
            Self::ConfirmationRedirect => "confirmationRedirect",
            Self::SubmitMessage => "submitMessage",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the executor should do after a rule fired.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum RuleOutcome {
    /// Proceed with the next rule.
    Continue,
    /// Stop evaluating the current profile.
    Break,
    /// Run the named profile against the same context and result, then
    /// proceed with the next rule.
    Include(String),
}

/// Action of a translation rule.
pub trait TranslationAction: fmt::Debug + Send + Sync + Sized + 'static {
    /// Result accumulator the action writes into.
    type Output;

    /// Profile types the action family can be used in.
    const PROFILE_TYPES: &'static [ProfileType];

    /// Kind of the action.
    fn kind(&self) -> ActionKind;

    /// Apply the action.
    ///
    /// The action only reads the context and only writes into `result`.
    fn invoke(
        &self,
        ctx: &Context,
        profile: &str,
        result: &mut Self::Output,
    ) -> Result<RuleOutcome, ActionEvaluationError>;

    /// Whether profiles of the type may contain actions of the family.
    fn supports(profile_type: ProfileType) -> bool {
        Self::PROFILE_TYPES.contains(&profile_type)
    }
}

/// Type of an action parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "values")]
pub enum ParameterKind {
    /// Free text taken literally.
    Text,
    /// Expression evaluated against the context.
    Expression,
    /// Regular expression matched against whole values.
    Regex,
    /// One of the listed values.
    Enumeration(&'static [&'static str]),
}

/// Metadata of an action parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActionParameterDefinition {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub mandatory: bool,
}

impl ActionParameterDefinition {
    pub const fn mandatory(name: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            kind,
            mandatory: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            kind,
            mandatory: false,
        }
    }
}

/// Positional parameters of an action being created, validated against the
/// parameter definitions of the action.
pub struct ActionParameters<'a> {
    kind: ActionKind,
    definitions: &'static [ActionParameterDefinition],
    values: &'a [Option<String>],
    evaluator: &'a dyn Evaluator,
}

impl<'a> ActionParameters<'a> {
    pub(crate) fn new(
        kind: ActionKind,
        definitions: &'static [ActionParameterDefinition],
        values: &'a [Option<String>],
        evaluator: &'a dyn Evaluator,
    ) -> Self {
        Self {
            kind,
            definitions,
            values,
            evaluator,
        }
    }

    fn name(&self, idx: usize) -> &'static str {
        self.definitions.get(idx).map(|d| d.name).unwrap_or("?")
    }

    /// Raw value, `None` for missing, `null` or empty parameters.
    pub fn raw(&self, idx: usize) -> Option<&'a str> {
        self.values
            .get(idx)
            .and_then(Option::as_deref)
            .filter(|v| !v.is_empty())
    }

    fn required(&self, idx: usize) -> Result<&'a str, ProfileDefinitionError> {
        self.raw(idx)
            .ok_or_else(|| ProfileDefinitionError::MissingParameter {
                action: self.kind,
                parameter: self.name(idx),
            })
    }

    /// Mandatory literal parameter.
    pub fn text(&self, idx: usize) -> Result<String, ProfileDefinitionError> {
        self.required(idx).map(String::from)
    }

    /// Optional literal parameter.
    pub fn optional_text(&self, idx: usize) -> Option<String> {
        self.raw(idx).map(String::from)
    }

    /// Mandatory expression parameter.
    pub fn expression(&self, idx: usize) -> Result<CompiledExpression, ProfileDefinitionError> {
        self.evaluator.compile_expression(self.required(idx)?)
    }

    fn compile_regex(&self, idx: usize, pattern: &str) -> Result<Regex, ProfileDefinitionError> {
        full_match_regex(pattern).map_err(|source| ProfileDefinitionError::InvalidRegex {
            action: self.kind,
            parameter: self.name(idx),
            source,
        })
    }

    /// Mandatory regular expression parameter (full match).
    pub fn regex(&self, idx: usize) -> Result<Regex, ProfileDefinitionError> {
        self.compile_regex(idx, self.required(idx)?)
    }

    /// Optional regular expression parameter (full match).
    pub fn optional_regex(&self, idx: usize) -> Result<Option<Regex>, ProfileDefinitionError> {
        self.raw(idx)
            .map(|pattern| self.compile_regex(idx, pattern))
            .transpose()
    }

    /// Mandatory enumeration parameter.
    pub fn enumeration<T: DeserializeOwned>(&self, idx: usize) -> Result<T, ProfileDefinitionError> {
        let raw = self.required(idx)?;
        serde_json::from_value(Value::String(raw.to_string())).map_err(|_| {
            let allowed = match self.definitions.get(idx).map(|d| d.kind) {
                Some(ParameterKind::Enumeration(values)) => values.join(", "),
                _ => String::new(),
            };
            ProfileDefinitionError::InvalidParameter {
                action: self.kind,
                parameter: self.name(idx),
                message: format!("`{raw}` is not one of: {allowed}"),
            }
        })
    }
}

/// Evaluate an action expression into the list of textual facts.
pub(crate) fn evaluate_values(
    kind: ActionKind,
    parameter: &'static str,
    expression: &CompiledExpression,
    ctx: &Context,
) -> Result<Vec<String>, ActionEvaluationError> {
    expression
        .evaluate(ctx)
        .map(|value| value_to_strings(&value))
        .map_err(|source| ActionEvaluationError::Expression {
            action: kind,
            parameter,
            source,
        })
}

/// Evaluate an action expression into a single optional value.
pub(crate) fn evaluate_value(
    kind: ActionKind,
    parameter: &'static str,
    expression: &CompiledExpression,
    ctx: &Context,
) -> Result<Option<Value>, ActionEvaluationError> {
    expression
        .evaluate(ctx)
        .map(|value| (!value.is_null()).then_some(value))
        .map_err(|source| ActionEvaluationError::Expression {
            action: kind,
            parameter,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ExpressionEvaluator;
    use crate::types::IdentityEffectMode;

    const DEFS: &[ActionParameterDefinition] = &[
        ActionParameterDefinition::mandatory("identityType", ParameterKind::Text),
        ActionParameterDefinition::optional("valueRegex", ParameterKind::Regex),
        ActionParameterDefinition::mandatory(
            "effectMode",
            ParameterKind::Enumeration(IdentityEffectMode::VALUES),
        ),
    ];

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            ActionKind::CreateIdentity,
            ActionKind::Break,
            ActionKind::AutoProcess,
            ActionKind::FilterAttributeValues,
        ] {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                Value::String(kind.name().into())
            );
        }
    }

    #[test]
    fn test_parameters() {
        let values = vec![Some("userName".into()), Some(String::new()), Some("MATCH".into())];
        let params = ActionParameters::new(
            ActionKind::MapIdentity,
            DEFS,
            &values,
            &ExpressionEvaluator,
        );
        assert_eq!("userName", params.text(0).unwrap());
        assert!(params.optional_regex(1).unwrap().is_none());
        assert_eq!(
            IdentityEffectMode::Match,
            params.enumeration::<IdentityEffectMode>(2).unwrap()
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let values = vec![None, Some("(".into()), Some("SOMETIMES".into())];
        let params = ActionParameters::new(
            ActionKind::MapIdentity,
            DEFS,
            &values,
            &ExpressionEvaluator,
        );
        assert!(matches!(
            params.text(0),
            Err(ProfileDefinitionError::MissingParameter {
                parameter: "identityType",
                ..
            })
        ));
        assert!(matches!(
            params.optional_regex(1),
            Err(ProfileDefinitionError::InvalidRegex {
                parameter: "valueRegex",
                ..
            })
        ));
        match params.enumeration::<IdentityEffectMode>(2) {
            Err(ProfileDefinitionError::InvalidParameter { message, .. }) => {
                assert!(message.contains("REQUIRE_MATCH"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
