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

use serde_json::{Value, json};

use openstack_keystone_translation::config::Config;
use openstack_keystone_translation::engine::TranslationEngine;
use openstack_keystone_translation::types::*;

pub fn engine() -> TranslationEngine {
    TranslationEngine::new(Config::default())
}

/// Deploy a profile built of `(condition, action, parameters)` rules.
pub fn deploy(
    engine: &TranslationEngine,
    profile_type: &str,
    name: &str,
    rules: &[(&str, &str, Value)],
) {
    let rules: Vec<Value> = rules
        .iter()
        .map(|(condition, action, parameters)| {
            json!({"condition": condition, "action": {"name": action, "parameters": parameters}})
        })
        .collect();
    let definition: TranslationProfileDefinition =
        serde_json::from_value(json!({"name": name, "type": profile_type, "rules": rules}))
            .unwrap();
    engine.deploy(&definition).unwrap();
}

pub fn remote_input(user: &str) -> RemotelyAuthenticatedInput {
    RemotelyAuthenticatedInput {
        idp: "https://idp.example.com".into(),
        identities: vec![RemoteIdentity {
            name: user.into(),
            identity_type: "userName".into(),
        }],
        attributes: vec![RemoteAttribute {
            name: "mail".into(),
            values: vec![format!("{user}@example.com")],
        }],
        groups: vec![RemoteGroupMembership {
            group: "staff".into(),
        }],
    }
}

pub fn release_input() -> TranslationInput {
    TranslationInput {
        entity: Entity {
            id: "e-1".into(),
            state: EntityState::Valid,
            identities: vec![
                Identity::new("userName", "jdoe"),
                Identity::new("persistent", "0a1b2c"),
            ],
        },
        attributes: vec![
            Attribute::new("cn", "/", vec!["John Doe".into()]),
            Attribute::new(
                "a1",
                "/",
                vec!["v1".into(), "v2".into(), "v3".into(), "v22".into()],
            ),
        ],
        groups: vec!["/".into(), "/staff".into()],
        chosen_group: "/".into(),
        requester: "https://sp.example.com".into(),
        protocol: "SAML2".into(),
        protocol_subtype: "SAML2 WebSSO".into(),
        ..Default::default()
    }
}

pub fn attribute_names(attributes: &[Attribute]) -> Vec<&str> {
    attributes.iter().map(|a| a.name.as_str()).collect()
}
