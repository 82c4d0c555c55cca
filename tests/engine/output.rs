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
use openstack_keystone_translation::types::ProfileType;

use crate::common::{attribute_names, deploy, engine, release_input};

#[test]
fn test_rule_order_matters() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "create-then-filter",
        &[
            ("true", "createAttribute", json!(["x", "'1'"])),
            ("true", "filterAttribute", json!(["x"])),
        ],
    );
    deploy(
        &engine,
        "OUTPUT",
        "filter-then-create",
        &[
            ("true", "filterAttribute", json!(["x"])),
            ("true", "createAttribute", json!(["x", "'1'"])),
        ],
    );
    let first = engine
        .translate_output("create-then-filter", &release_input())
        .unwrap();
    assert_eq!(vec!["cn", "a1"], attribute_names(first.attributes()));
    let second = engine
        .translate_output("filter-then-create", &release_input())
        .unwrap();
    assert_eq!(vec!["cn", "a1", "x"], attribute_names(second.attributes()));
}

#[test]
fn test_filter_identity_without_parameters_removes_all() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[("true", "filterIdentity", json!([null, null]))],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    assert!(result.identities().is_empty());
    assert_eq!(2, result.attributes().len());
}

#[test]
fn test_filter_identity_by_type() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[("true", "filterIdentity", json!(["persistent", null]))],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    let values: Vec<_> = result.identities().iter().map(|i| i.value.as_str()).collect();
    assert_eq!(vec!["jdoe"], values);
}

#[test]
fn test_filter_attribute_values_idempotent() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "once",
        &[("true", "filterAttributeValues", json!(["a1", "v[23].*"]))],
    );
    deploy(
        &engine,
        "OUTPUT",
        "twice",
        &[
            ("true", "filterAttributeValues", json!(["a1", "v[23].*"])),
            ("true", "filterAttributeValues", json!(["a1", "v[23].*"])),
        ],
    );
    let once = engine.translate_output("once", &release_input()).unwrap();
    assert_eq!(vec!["v1"], once.attributes()[1].values);
    assert_eq!(vec!["John Doe"], once.attributes()[0].values);
    let twice = engine.translate_output("twice", &release_input()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_filter_attribute_values_keeps_emptied_attribute() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[("true", "filterAttributeValues", json!(["a1", ".*"]))],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    assert_eq!(vec!["cn", "a1"], attribute_names(result.attributes()));
    assert!(result.attributes()[1].values.is_empty());
}

#[test]
fn test_create_identity_dedup() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[
            ("true", "createIdentity", json!(["userName", "'jdoe'"])),
            ("true", "createIdentity", json!(["email", "'jdoe@example.com'"])),
            ("true", "createIdentity", json!(["email", "'jdoe@example.com'"])),
        ],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    let values: Vec<_> = result.identities().iter().map(|i| i.value.as_str()).collect();
    assert_eq!(vec!["jdoe", "0a1b2c", "jdoe@example.com"], values);
}

#[test]
fn test_unfilter_restores_originals_once() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[
            ("true", "filterAttribute", json!([".*"])),
            ("true", "unfilterAttribute", json!(["a.*"])),
            ("true", "unfilterAttribute", json!(["a.*"])),
        ],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    assert_eq!(vec!["a1"], attribute_names(result.attributes()));
    assert_eq!(4, result.attributes()[0].values.len());
}

#[test]
fn test_break_skips_remaining_rules() {
    let engine = engine();
    deploy(
        &engine,
        "OUTPUT",
        "p",
        &[
            ("requester == 'https://sp.example.com'", "break", json!([])),
            ("true", "filterAttribute", json!(["cn"])),
        ],
    );
    let result = engine.translate_output("p", &release_input()).unwrap();
    assert_eq!(vec!["cn", "a1"], attribute_names(result.attributes()));
}

#[test]
fn test_filter_identity_with_extra_parameter_is_rejected() {
    let engine = engine();
    let definition = serde_json::from_value(json!({
        "name": "p",
        "type": "OUTPUT",
        "rules": [{"action": {"name": "filterIdentity", "parameters": ["userName", ".*", "x"]}}]
    }))
    .unwrap();
    assert!(matches!(
        engine.deploy(&definition),
        Err(TranslationEngineError::ProfileDefinition { .. })
    ));
    assert!(engine.list_profiles(ProfileType::Output).is_empty());
}
