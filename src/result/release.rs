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
//! Result of an output profile.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::result::{FilterTarget, retain_counting};
use crate::types::{Attribute, Identity, TranslationInput};

/// Attributes and identities released to a relying party.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ReleaseResult {
    attributes: Vec<Attribute>,
    identities: Vec<Identity>,
    /// Attributes of the input, used to restore filtered attributes.
    #[serde(skip)]
    original_attributes: Vec<Attribute>,
}

impl ReleaseResult {
    /// Result seeded with everything the input would release by default.
    pub fn from_input(input: &TranslationInput) -> Self {
        Self {
            attributes: input.attributes.clone(),
            identities: input.entity.identities.clone(),
            original_attributes: input.attributes.clone(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Add the identity unless one with the same type and value is already
    /// released. Returns whether it was added.
    pub fn add_identity(&mut self, identity: Identity) -> bool {
        if self.identities.iter().any(|existing| existing.same_as(&identity)) {
            return false;
        }
        self.identities.push(identity);
        true
    }

    /// Release the attribute, replacing an attribute of the same name.
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.name == attribute.name)
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Restore original attributes with names matching the pattern which are
    /// not released anymore. Returns the number of restored attributes.
    pub fn unfilter_attributes(&mut self, name: &Regex) -> usize {
        let mut restored = 0;
        for original in &self.original_attributes {
            if !name.is_match(&original.name) {
                continue;
            }
            if self.attributes.iter().any(|a| a.name == original.name) {
                continue;
            }
            self.attributes.push(original.clone());
            restored += 1;
        }
        restored
    }
}

impl FilterTarget for ReleaseResult {
    fn retain_identities<F: FnMut(&Identity) -> bool>(&mut self, keep: F) -> usize {
        retain_counting(&mut self.identities, keep)
    }

    fn retain_attributes<F: FnMut(&Attribute) -> bool>(&mut self, keep: F) -> usize {
        retain_counting(&mut self.attributes, keep)
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }
}
