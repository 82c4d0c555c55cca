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

use serde_json::json;

use openstack_keystone_translation::error::TranslationEngineError;
use openstack_keystone_translation::profile::error::ProfileDefinitionError;
use openstack_keystone_translation::types::{
    GroupEffectMode, IdentityEffectMode, ProfileType,
};

use crate::common::{deploy, engine, remote_input};

#[test]
fn test_map_login() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "remote",
        &[
            (
                "idsByType contains 'userName'",
                "mapIdentity",
                json!(["userName", "id", null, "CREATE_OR_MATCH"]),
            ),
            (
                "groups contains 'staff'",
                "mapGroup",
                json!(["'/staff'", "CREATE_GROUP_IF_MISSING"]),
            ),
            (
                "true",
                "mapAttribute",
                json!(["email", "/", "attr['mail']", "full", "CREATE_OR_UPDATE"]),
            ),
            ("true", "entityChange", json!(["DISABLE", "30"])),
        ],
    );
    let result = engine.translate_input("remote", &remote_input("jdoe")).unwrap();
    assert_eq!("jdoe", result.identities()[0].identity.value);
    assert_eq!(IdentityEffectMode::CreateOrMatch, result.identities()[0].mode);
    assert_eq!(GroupEffectMode::CreateGroupIfMissing, result.groups()[0].mode);
    assert_eq!("remote", result.groups()[0].translation_profile);
    assert_eq!(
        vec!["jdoe@example.com"],
        result.attributes()[0].attribute.values
    );
    assert_eq!(1, result.entity_changes().len());
}

#[test]
fn test_break_stops_only_included_profile() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "groups",
        &[
            ("true", "mapGroup", json!(["'/a'", "ADD_IF_GROUP_EXISTS"])),
            ("true", "break", json!([])),
            ("true", "mapGroup", json!(["'/b'", "ADD_IF_GROUP_EXISTS"])),
        ],
    );
    deploy(
        &engine,
        "INPUT",
        "main",
        &[
            ("true", "includeProfile", json!(["groups"])),
            ("true", "mapGroup", json!(["'/c'", "ADD_IF_GROUP_EXISTS"])),
        ],
    );
    let result = engine.translate_input("main", &remote_input("jdoe")).unwrap();
    let groups: Vec<_> = result.groups().iter().map(|g| g.group.as_str()).collect();
    assert_eq!(vec!["/a", "/c"], groups);
}

#[test]
fn test_arity_checked_at_deploy() {
    let engine = engine();
    let definition = serde_json::from_value(json!({
        "name": "broken",
        "type": "INPUT",
        "rules": [
            {"action": {"name": "mapGroup", "parameters": ["'/a'", "ADD_IF_GROUP_EXISTS"]}},
            {"action": {"name": "mapGroup", "parameters": ["'/a'"]}}
        ]
    }))
    .unwrap();
    match engine.deploy(&definition) {
        Err(TranslationEngineError::ProfileDefinition {
            source: ProfileDefinitionError::Rule { rule, source, .. },
        }) => {
            assert_eq!(2, rule);
            assert!(matches!(
                *source,
                ProfileDefinitionError::WrongArity {
                    expected: 2,
                    found: 1,
                    ..
                }
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(engine.list_profiles(ProfileType::Input).is_empty());
}

#[test]
fn test_output_action_rejected_in_input_profile() {
    let engine = engine();
    let definition = serde_json::from_value(json!({
        "name": "wrong",
        "type": "INPUT",
        "rules": [{"action": {"name": "createAttribute", "parameters": ["a", "'1'"]}}]
    }))
    .unwrap();
    assert!(matches!(
        engine.deploy(&definition),
        Err(TranslationEngineError::ProfileDefinition { .. })
    ));
}

#[test]
fn test_evaluation_error_fails_closed() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "remote",
        &[
            ("true", "mapGroup", json!(["'/a'", "ADD_IF_GROUP_EXISTS"])),
            ("idp", "break", json!([])),
        ],
    );
    assert!(matches!(
        engine.translate_input("remote", &remote_input("jdoe")),
        Err(TranslationEngineError::Translation { .. })
    ));
}

#[test]
fn test_create_identity_twice_maps_once() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "remote",
        &[
            ("true", "createIdentity", json!(["userName", "id"])),
            ("true", "createIdentity", json!(["userName", "id"])),
        ],
    );
    let result = engine.translate_input("remote", &remote_input("jdoe")).unwrap();
    assert_eq!(1, result.identities().len());
    assert_eq!("userName", result.identities()[0].identity.type_id);
}
