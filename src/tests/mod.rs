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
//! Shared unit test fixtures.

use crate::types::*;

/// Remote login with two identities, three attributes and two groups.
pub(crate) fn remote_input() -> RemotelyAuthenticatedInput {
    RemotelyAuthenticatedInput {
        idp: "https://idp.example.com".into(),
        identities: vec![
            RemoteIdentity {
                name: "jdoe".into(),
                identity_type: "userName".into(),
            },
            RemoteIdentity {
                name: "jdoe@example.com".into(),
                identity_type: "email".into(),
            },
        ],
        attributes: vec![
            RemoteAttribute {
                name: "cn".into(),
                values: vec!["John Doe".into()],
            },
            RemoteAttribute {
                name: "memberOf".into(),
                values: vec!["staff".into(), "admins".into()],
            },
            RemoteAttribute {
                name: "empty".into(),
                values: Vec::new(),
            },
        ],
        groups: vec![
            RemoteGroupMembership {
                group: "staff".into(),
            },
            RemoteGroupMembership {
                group: "admins".into(),
            },
        ],
    }
}

/// Entity released to `https://sp.example.com` without a login session.
pub(crate) fn translation_input() -> TranslationInput {
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
            Attribute::new("mail", "/", vec!["jdoe@example.com".into()]),
        ],
        groups: ["/", "/staff", "/staff/ops", "/staff/ops/oncall", "/other"]
            .into_iter()
            .map(String::from)
            .collect(),
        chosen_group: "/staff".into(),
        requester: "https://sp.example.com".into(),
        requester_attributes: vec![Attribute::new("o", "/", vec!["Example".into()])],
        protocol: "SAML2".into(),
        protocol_subtype: "SAML2 WebSSO".into(),
        import_status: [("ldap".to_string(), "notApplicable".to_string())].into(),
        login: None,
    }
}

/// Registration form mixing interactive and automatic parameters.
pub(crate) fn form() -> Form {
    Form {
        name: "signup".into(),
        default_credential_requirement: "cr-default".into(),
        identity_params: vec![
            IdentityRegistrationParam {
                identity_type: "userName".into(),
                retrieval: ParameterRetrievalSettings::Interactive,
            },
            IdentityRegistrationParam {
                identity_type: "email".into(),
                retrieval: ParameterRetrievalSettings::Automatic,
            },
        ],
        attribute_params: vec![
            AttributeRegistrationParam {
                attribute_type: "cn".into(),
                group: "/".into(),
                retrieval: ParameterRetrievalSettings::Interactive,
            },
            AttributeRegistrationParam {
                attribute_type: "mail".into(),
                group: "/".into(),
                retrieval: ParameterRetrievalSettings::Automatic,
            },
        ],
        group_params: vec![
            GroupRegistrationParam {
                group_path: "/staff".into(),
                retrieval: ParameterRetrievalSettings::Automatic,
            },
            GroupRegistrationParam {
                group_path: "/other".into(),
                retrieval: ParameterRetrievalSettings::Interactive,
            },
        ],
    }
}

/// Request filled in from [`form`], the second attribute was not provided.
pub(crate) fn form_request() -> FormRequest {
    FormRequest {
        request_id: Some("req-1".into()),
        identities: vec![
            Some(Identity::new("userName", "jdoe")),
            Some(Identity::new("email", "jdoe@example.com")),
        ],
        attributes: vec![Some(Attribute::new("cn", "/", vec!["John Doe".into()])), None],
        group_selections: vec![
            GroupSelection {
                selected: true,
                external_idp: Some("https://idp.example.com".into()),
                translation_profile: Some("remote".into()),
            },
            GroupSelection::default(),
        ],
        agreements: vec![true, false],
        user_locale: Some("en".into()),
    }
}
