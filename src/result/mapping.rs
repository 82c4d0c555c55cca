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
//! Result of an input profile.

use serde::{Deserialize, Serialize};

use crate::result::{FilterTarget, retain_counting};
use crate::types::{
    Attribute, AttributeEffectMode, EntityChange, GroupEffectMode, Identity, IdentityEffectMode,
};

/// Identity to be applied to the local store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MappedIdentity {
    pub mode: IdentityEffectMode,
    pub identity: Identity,
    /// Credential requirement of a newly created entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_requirement: Option<String>,
}

/// Attribute to be applied to the local store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MappedAttribute {
    pub mode: AttributeEffectMode,
    pub attribute: Attribute,
}

/// Group membership to be applied to the local store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MappedGroup {
    pub mode: GroupEffectMode,
    /// Group path.
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_idp: Option<String>,
    pub translation_profile: String,
}

/// Facts produced by an input profile.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MappingResult {
    /// Identity provider the data came from.
    remote_idp: Option<String>,
    identities: Vec<MappedIdentity>,
    attributes: Vec<MappedAttribute>,
    groups: Vec<MappedGroup>,
    entity_changes: Vec<EntityChange>,
    /// Data created earlier from the same identity provider and profile,
    /// which is not part of this result, should be removed.
    clean_stale_data: bool,
}

impl MappingResult {
    pub fn new<S: Into<String>>(remote_idp: S) -> Self {
        Self {
            remote_idp: Some(remote_idp.into()),
            ..Default::default()
        }
    }

    pub fn remote_idp(&self) -> Option<&str> {
        self.remote_idp.as_deref()
    }

    pub fn identities(&self) -> &[MappedIdentity] {
        &self.identities
    }

    pub fn attributes(&self) -> &[MappedAttribute] {
        &self.attributes
    }

    pub fn groups(&self) -> &[MappedGroup] {
        &self.groups
    }

    pub fn entity_changes(&self) -> &[EntityChange] {
        &self.entity_changes
    }

    pub fn clean_stale_data(&self) -> bool {
        self.clean_stale_data
    }

    /// Add the identity unless one with the same type and value is already
    /// present. Returns whether it was added.
    pub fn add_identity(&mut self, mut mapped: MappedIdentity) -> bool {
        if self
            .identities
            .iter()
            .any(|existing| existing.identity.same_as(&mapped.identity))
        {
            return false;
        }
        if mapped.identity.remote_idp.is_none() {
            mapped.identity.remote_idp = self.remote_idp.clone();
        }
        self.identities.push(mapped);
        true
    }

    /// Add the attribute, replacing an earlier mapping of the same name in
    /// place.
    pub fn add_attribute(&mut self, mut mapped: MappedAttribute) {
        if mapped.attribute.remote_idp.is_none() {
            mapped.attribute.remote_idp = self.remote_idp.clone();
        }
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.attribute.name == mapped.attribute.name)
        {
            Some(existing) => *existing = mapped,
            None => self.attributes.push(mapped),
        }
    }

    /// Add the group unless it is already present. Returns whether it was
    /// added.
    pub fn add_group(&mut self, mut mapped: MappedGroup) -> bool {
        if self.groups.iter().any(|existing| existing.group == mapped.group) {
            return false;
        }
        if mapped.remote_idp.is_none() {
            mapped.remote_idp = self.remote_idp.clone();
        }
        self.groups.push(mapped);
        true
    }

    pub fn add_entity_change(&mut self, change: EntityChange) {
        self.entity_changes.push(change);
    }

    pub fn set_clean_stale_data(&mut self) {
        self.clean_stale_data = true;
    }
}

impl FilterTarget for MappingResult {
    fn retain_identities<F: FnMut(&Identity) -> bool>(&mut self, mut keep: F) -> usize {
        retain_counting(&mut self.identities, |mapped| keep(&mapped.identity))
    }

    fn retain_attributes<F: FnMut(&Attribute) -> bool>(&mut self, mut keep: F) -> usize {
        retain_counting(&mut self.attributes, |mapped| keep(&mapped.attribute))
    }

    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes
            .iter_mut()
            .map(|mapped| &mut mapped.attribute)
            .find(|attribute| attribute.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(type_id: &str, value: &str) -> MappedIdentity {
        MappedIdentity {
            mode: IdentityEffectMode::Match,
            identity: Identity::new(type_id, value),
            credential_requirement: None,
        }
    }

    #[test]
    fn test_identity_dedup_first_wins() {
        let mut result = MappingResult::new("idp");
        assert!(result.add_identity(identity("userName", "a")));
        let mut other = identity("userName", "a");
        other.mode = IdentityEffectMode::RequireMatch;
        assert!(!result.add_identity(other));
        assert!(result.add_identity(identity("email", "a")));
        assert_eq!(2, result.identities().len());
        assert_eq!(IdentityEffectMode::Match, result.identities()[0].mode);
        assert_eq!(Some("idp"), result.identities()[0].identity.remote_idp.as_deref());
    }

    #[test]
    fn test_attribute_replaced_in_place() {
        let mut result = MappingResult::new("idp");
        for (name, value) in [("cn", "a"), ("mail", "m"), ("cn", "b")] {
            result.add_attribute(MappedAttribute {
                mode: AttributeEffectMode::CreateOrUpdate,
                attribute: Attribute::new(name, "/", vec![value.into()]),
            });
        }
        let names: Vec<_> = result.attributes().iter().map(|a| a.attribute.name.as_str()).collect();
        assert_eq!(vec!["cn", "mail"], names);
        assert_eq!(vec!["b"], result.attributes()[0].attribute.values);
    }

    #[test]
    fn test_group_dedup() {
        let mut result = MappingResult::new("idp");
        let group = MappedGroup {
            mode: GroupEffectMode::AddIfGroupExists,
            group: "/staff".into(),
            remote_idp: None,
            translation_profile: "p".into(),
        };
        assert!(result.add_group(group.clone()));
        assert!(!result.add_group(group));
        assert_eq!(1, result.groups().len());
    }

    #[test]
    fn test_filter_target() {
        let mut result = MappingResult::new("idp");
        result.add_identity(identity("userName", "a"));
        result.add_identity(identity("email", "a@x"));
        assert_eq!(1, result.retain_identities(|id| id.type_id != "email"));
        assert_eq!(1, result.identities().len());
    }
}
