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
//! # Action registry
//!
//! Catalogue of the action kinds available to a profile family.
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::action::{
    ActionKind, ActionParameterDefinition, ActionParameters, TranslationAction,
};
use crate::expression::Evaluator;
use crate::profile::error::ProfileDefinitionError;
use crate::types::{ActionDefinition, ProfileType};

/// Constructor of an action out of validated parameters.
pub type ActionConstructor<A> = fn(&ActionParameters<'_>) -> Result<A, ProfileDefinitionError>;

/// Factory of a single action kind.
#[derive(Clone, Serialize)]
#[serde(bound = "")]
pub struct ActionFactory<A> {
    pub kind: ActionKind,
    pub parameters: &'static [ActionParameterDefinition],
    #[serde(skip)]
    create: ActionConstructor<A>,
}

impl<A> ActionFactory<A> {
    pub const fn new(
        kind: ActionKind,
        parameters: &'static [ActionParameterDefinition],
        create: ActionConstructor<A>,
    ) -> Self {
        Self {
            kind,
            parameters,
            create,
        }
    }

    /// Create the action validating the parameters eagerly.
    pub fn create(
        &self,
        values: &[Option<String>],
        evaluator: &dyn Evaluator,
    ) -> Result<A, ProfileDefinitionError> {
        if values.len() != self.parameters.len() {
            return Err(ProfileDefinitionError::WrongArity {
                action: self.kind,
                expected: self.parameters.len(),
                found: values.len(),
            });
        }
        (self.create)(&ActionParameters::new(
            self.kind,
            self.parameters,
            values,
            evaluator,
        ))
    }
}

impl<A> fmt::Debug for ActionFactory<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFactory")
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Immutable map from action name to its factory.
#[derive(Debug)]
pub struct ActionRegistry<A> {
    factories: HashMap<&'static str, ActionFactory<A>>,
}

impl<A: TranslationAction> ActionRegistry<A> {
    pub fn new<I: IntoIterator<Item = ActionFactory<A>>>(factories: I) -> Self {
        Self {
            factories: factories
                .into_iter()
                .map(|factory| (factory.kind.name(), factory))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ActionFactory<A>> {
        self.factories.get(name)
    }

    /// Create the action of a rule of a profile of the given type.
    pub fn create(
        &self,
        profile_type: ProfileType,
        definition: &ActionDefinition,
        evaluator: &dyn Evaluator,
    ) -> Result<A, ProfileDefinitionError> {
        let Some(factory) = self.get(&definition.name) else {
            // Known kind which belongs to another profile family
            return Err(
                match serde_json::from_value::<ActionKind>(definition.name.clone().into()) {
                    Ok(action) => ProfileDefinitionError::IncompatibleAction {
                        action,
                        profile_type,
                    },
                    Err(_) => ProfileDefinitionError::UnknownAction {
                        name: definition.name.clone(),
                        profile_type,
                    },
                },
            );
        };
        factory.create(&definition.parameters, evaluator)
    }

    /// Factories ordered by action name.
    pub fn factories(&self) -> Vec<&ActionFactory<A>> {
        let mut factories: Vec<_> = self.factories.values().collect();
        factories.sort_by_key(|factory| factory.kind.name());
        factories
    }
}
