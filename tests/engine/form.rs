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

use openstack_keystone_translation::engine::TranslationEngine;
use openstack_keystone_translation::types::*;

use crate::common::{deploy, engine};

fn form() -> Form {
    Form {
        name: "signup".into(),
        default_credential_requirement: "password".into(),
        identity_params: vec![IdentityRegistrationParam {
            identity_type: "email".into(),
            retrieval: ParameterRetrievalSettings::Interactive,
        }],
        group_params: vec![GroupRegistrationParam {
            group_path: "/staff".into(),
            retrieval: ParameterRetrievalSettings::Interactive,
        }],
        ..Default::default()
    }
}

fn request(email: &str) -> FormRequest {
    FormRequest {
        identities: vec![Some(Identity::new("email", email))],
        group_selections: vec![GroupSelection {
            selected: true,
            ..Default::default()
        }],
        agreements: vec![true],
        ..Default::default()
    }
}

fn deploy_registration(engine: &TranslationEngine) {
    deploy(
        engine,
        "REGISTRATION",
        "reg",
        &[
            (
                "idsByType['email'][0].endsWith('@example.com')",
                "autoProcess",
                json!(["accept"]),
            ),
            ("true", "addToGroup", json!(["'/users'"])),
            ("true", "redirect", json!(["'https://portal.example.com/' + status"])),
            (
                "true",
                "submitMessage",
                json!([null, "Thank you for signing up"]),
            ),
            ("true", "confirmationRedirect", json!(["''"])),
        ],
    );
}

#[test]
fn test_translate_request() {
    let engine = engine();
    deploy_registration(&engine);
    let result = engine
        .translate_form_request(
            ProfileType::Registration,
            "reg",
            &form(),
            &request("jdoe@example.com"),
            &RegistrationContext::default(),
        )
        .unwrap();
    let groups: Vec<_> = result.groups().iter().map(|g| g.group.as_str()).collect();
    assert_eq!(vec!["/staff", "/users"], groups);
    assert_eq!("password", result.credential_requirement());
    assert_eq!(AutomaticRequestAction::Accept, result.auto_action());
    assert_eq!(
        Some("https://portal.example.com/submitted"),
        result.redirect_url()
    );
}

#[test]
fn test_side_channels() {
    let engine = engine();
    deploy_registration(&engine);
    let registration = RegistrationContext::default();
    let auto = |email: &str| {
        engine
            .auto_process_action(
                ProfileType::Registration,
                "reg",
                &form(),
                &request(email),
                &registration,
                RequestSubmitStatus::Submitted,
            )
            .unwrap()
    };
    assert_eq!(Some(AutomaticRequestAction::Accept), auto("jdoe@example.com"));
    assert_eq!(Some(AutomaticRequestAction::None), auto("jdoe@other.org"));

    assert_eq!(
        Some("https://portal.example.com/notSubmitted".to_string()),
        engine
            .post_cancel_redirect_url(ProfileType::Registration, "reg", &form(), &registration)
            .unwrap()
    );

    let message = engine
        .post_submit_message(
            ProfileType::Registration,
            "reg",
            &form(),
            &request("jdoe@example.com"),
            &registration,
        )
        .unwrap()
        .unwrap();
    assert_eq!(None, message.caption);
    assert_eq!("Thank you for signing up", message.message);

    let confirmed = ConfirmedElement::identity(&Identity::new("email", "jdoe@example.com"));
    assert_eq!(
        None,
        engine
            .post_confirmation_redirect_url(
                ProfileType::Registration,
                "reg",
                &form(),
                &request("jdoe@example.com"),
                &registration,
                &confirmed,
            )
            .unwrap()
    );
}

#[test]
fn test_side_channel_ignores_failing_rules_of_other_kinds() {
    let engine = engine();
    deploy(
        &engine,
        "ENQUIRY",
        "enq",
        &[
            ("unknownVariable", "setEntityState", json!(["disabled"])),
            ("true", "autoProcess", json!(["drop"])),
        ],
    );
    assert_eq!(
        Some(AutomaticRequestAction::Drop),
        engine
            .auto_process_action(
                ProfileType::Enquiry,
                "enq",
                &form(),
                &request("jdoe@example.com"),
                &RegistrationContext::default(),
                RequestSubmitStatus::Submitted,
            )
            .unwrap()
    );
    // The full translation evaluates every rule
    assert!(
        engine
            .translate_form_request(
                ProfileType::Enquiry,
                "enq",
                &form(),
                &request("jdoe@example.com"),
                &RegistrationContext::default(),
            )
            .is_err()
    );
}
