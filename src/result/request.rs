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
//! Result of a registration or enquiry profile.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::result::{FilterTarget, retain_counting};
use crate::types::{
    Attribute, AutomaticRequestAction, EntityChange, EntityState, Form, FormRequest, Identity,
};

/// Group membership of a request with its provenance.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GroupParam {
    /// Group path.
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_idp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_profile: Option<String>,
}

impl GroupParam {
    pub fn new<S: Into<String>>(group: S) -> Self {
        Self {
            group: group.into(),
            external_idp: None,
            translation_profile: None,
        }
    }
}

/// Message presented to the user after the request was submitted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PostSubmitMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub message: String,
}

/// Registration request as shaped by a form profile.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TranslatedRequest {
    identities: Vec<Identity>,
    attributes: Vec<Attribute>,
    groups: Vec<GroupParam>,
    /// Group path to the attribute classes assigned in it.
    attribute_classes: BTreeMap<String, BTreeSet<String>>,
    credential_requirement: String,
    entity_state: EntityState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_change: Option<EntityChange>,
    auto_action: AutomaticRequestAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    post_submit_message: Option<PostSubmitMessage>,
}

impl TranslatedRequest {
    /// Empty request with the given credential requirement.
    pub fn new<S: Into<String>>(credential_requirement: S) -> Self {
        Self {
            credential_requirement: credential_requirement.into(),
            ..Default::default()
        }
    }

    /// Request seeded with the data submitted for the form.
    ///
    /// Group selections are matched with the group parameters of the form
    /// by position, only selected groups become memberships.
    pub fn from_request(form: &Form, request: &FormRequest) -> Self {
        let mut translated = Self::new(form.default_credential_requirement.as_str());
        for identity in request.identities.iter().flatten() {
            translated.add_identity(identity.clone());
        }
        for attribute in request.attributes.iter().flatten() {
            translated.set_attribute(attribute.clone());
        }
        for (param, selection) in form.group_params.iter().zip(&request.group_selections) {
            if selection.selected {
                translated.add_group(GroupParam {
                    group: param.group_path.clone(),
                    external_idp: selection.external_idp.clone(),
                    translation_profile: selection.translation_profile.clone(),
                });
            }
        }
        translated
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn groups(&self) -> &[GroupParam] {
        &self.groups
    }

    pub fn attribute_classes(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.attribute_classes
    }

    pub fn credential_requirement(&self) -> &str {
        &self.credential_requirement
    }

    pub fn entity_state(&self) -> EntityState {
        self.entity_state
    }

    pub fn entity_change(&self) -> Option<&EntityChange> {
        self.entity_change.as_ref()
    }

    pub fn auto_action(&self) -> AutomaticRequestAction {
        self.auto_action
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    pub fn post_submit_message(&self) -> Option<&PostSubmitMessage> {
        self.post_submit_message.as_ref()
    }

    /// Add the identity unless one with the same type and value is present.
    pub fn add_identity(&mut self, identity: Identity) -> bool {
        if self.identities.iter().any(|existing| existing.same_as(&identity)) {
            return false;
        }
        self.identities.push(identity);
        true
    }

    /// Add the attribute, replacing an attribute with the same name.
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

    /// Add the membership unless the group is already present.
    pub fn add_group(&mut self, group: GroupParam) -> bool {
        if self.groups.iter().any(|existing| existing.group == group.group) {
            return false;
        }
        self.groups.push(group);
        true
    }

    /// Keep only the memberships matching the predicate.
    pub fn retain_groups<F: FnMut(&GroupParam) -> bool>(&mut self, keep: F) -> usize {
        retain_counting(&mut self.groups, keep)
    }

    pub fn add_attribute_class<G: Into<String>, C: Into<String>>(&mut self, group: G, class: C) {
        self.attribute_classes
            .entry(group.into())
            .or_default()
            .insert(class.into());
    }

    pub fn set_credential_requirement<S: Into<String>>(&mut self, credential_requirement: S) {
        self.credential_requirement = credential_requirement.into();
    }

    pub fn set_entity_state(&mut self, state: EntityState) {
        self.entity_state = state;
    }

    pub fn set_entity_change(&mut self, change: EntityChange) {
        self.entity_change = Some(change);
    }

    pub fn set_auto_action(&mut self, action: AutomaticRequestAction) {
        self.auto_action = action;
    }

    pub fn set_redirect_url(&mut self, url: Option<String>) {
        self.redirect_url = url;
    }

    pub fn set_post_submit_message(&mut self, message: PostSubmitMessage) {
        self.post_submit_message = Some(message);
    }
}

impl FilterTarget for TranslatedRequest {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{form, form_request};

    #[test]
    fn test_from_request() {
        let translated = TranslatedRequest::from_request(&form(), &form_request());
        assert_eq!("cr-default", translated.credential_requirement());
        assert_eq!(2, translated.identities().len());
        // Not provided attribute is skipped
        assert_eq!(1, translated.attributes().len());
        assert_eq!(
            vec![GroupParam {
                group: "/staff".into(),
                external_idp: Some("https://idp.example.com".into()),
                translation_profile: Some("remote".into()),
            }],
            translated.groups()
        );
        assert_eq!(AutomaticRequestAction::None, translated.auto_action());
    }

    #[test]
    fn test_attribute_classes() {
        let mut translated = TranslatedRequest::new("cr");
        translated.add_attribute_class("/", "person");
        translated.add_attribute_class("/", "person");
        translated.add_attribute_class("/staff", "employee");
        assert_eq!(1, translated.attribute_classes()["/"].len());
        assert_eq!(2, translated.attribute_classes().len());
    }

    #[test]
    fn test_serialize() {
        let mut translated = TranslatedRequest::new("cr");
        translated.set_redirect_url(Some("https://example.com".into()));
        let json = serde_json::to_value(&translated).unwrap();
        assert_eq!("https://example.com", json["redirect_url"]);
        assert_eq!("none", json["auto_action"]);
        assert_eq!("valid", json["entity_state"]);
    }
}
