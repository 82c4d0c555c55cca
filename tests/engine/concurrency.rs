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
use std::thread;

use openstack_keystone_translation::types::ProfileType;

use crate::common::{deploy, engine, remote_input};

#[test]
fn test_concurrent_invocations_do_not_share_results() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "remote",
        &[
            ("true", "mapIdentity", json!(["userName", "id", null, "MATCH"])),
            (
                "true",
                "mapAttribute",
                json!(["email", "/", "attr['mail']", "full", "CREATE_OR_UPDATE"]),
            ),
        ],
    );
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let engine = &engine;
                scope.spawn(move || {
                    for round in 0..50 {
                        let user = format!("user-{worker}-{round}");
                        let result = engine.translate_input("remote", &remote_input(&user)).unwrap();
                        assert_eq!(1, result.identities().len());
                        assert_eq!(user, result.identities()[0].identity.value);
                        assert_eq!(
                            vec![format!("{user}@example.com")],
                            result.attributes()[0].attribute.values
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}

#[test]
fn test_redeploy_during_invocations() {
    let engine = engine();
    deploy(
        &engine,
        "INPUT",
        "remote",
        &[("true", "mapGroup", json!(["'/v1'", "ADD_IF_GROUP_EXISTS"]))],
    );
    thread::scope(|scope| {
        let reader = scope.spawn(|| {
            for _ in 0..100 {
                let result = engine.translate_input("remote", &remote_input("jdoe")).unwrap();
                // Every run sees exactly one complete version of the profile
                assert_eq!(1, result.groups().len());
                let group = result.groups()[0].group.as_str();
                assert!(group == "/v1" || group == "/v2", "unexpected {group}");
            }
        });
        for _ in 0..20 {
            deploy(
                &engine,
                "INPUT",
                "remote",
                &[("true", "mapGroup", json!(["'/v2'", "ADD_IF_GROUP_EXISTS"]))],
            );
        }
        reader.join().unwrap();
    });
    assert_eq!(vec!["remote"], engine.list_profiles(ProfileType::Input));
}
