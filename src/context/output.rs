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
//! Context of output profiles.
//!
//! | Variable            | Content                                             |
//! |---------------------|-----------------------------------------------------|
//! | `protocol`          | protocol name                                       |
//! | `protocolSubtype`   | protocol flavour                                    |
//! | `requester`         | relying party name                                  |
//! | `attr`, `attrs`     | released attributes, first value and all values     |
//! | `attrObj`           | released attributes as typed values                 |
//! | `requesterAttr`, `requesterAttrObj`, `requesterAttrs` | attributes of the relying party |
//! | `idsByType`         | identity type to the list of identity values        |
//! | `importStatus`      | importer to the outcome of its user import          |
//! | `groups`            | group paths of the entity                           |
//! | `groupsObj`         | group path to `{path, name, parent}`                |
//! | `usedGroup`         | group chosen by the relying party                   |
//! | `subGroups`         | groups of the entity below `usedGroup`              |
//! | `authenticatedWith` | identities used to log in                           |
//! | `idp`               | remote identity provider, `_LOCAL` for local logins |
//! | `authentications`   | authenticators used to log in                       |
//! | `mfa`, `twoStepAuthn` | whether more than one authenticator was used      |
//! | `amr`               | authentication methods, with `mfa` when several     |
//! | `upstreamIdP`, `upstreamProtocol`, `upstreamACRs` | upstream authentication context |
//!
//! `attrObj` holds the list of values of an attribute with every value which
//! is a JSON document parsed, or `""` when the attribute has no values.
//!
//! Without a login session `authenticatedWith`, `authentications` and `amr`
//! are empty, `idp` is `null` and `mfa` is `false`.
use serde_json::{Map, Value, json};

use crate::context::{Context, grouped};
use crate::types::{Attribute, LoginSessionInfo, TranslationInput, is_child_group, parent_group};

/// `idp` value of a session which was not established by a remote login.
pub const LOCAL_IDP: &str = "_LOCAL";

/// Upstream protocol reported when the login was not remote.
pub const DEFAULT_UPSTREAM_PROTOCOL: &str = "local";

/// `amr` entry added when more than one authentication method was used.
pub const MULTI_FACTOR_METHOD: &str = "mfa";

struct AttributeMaps {
    attr: Map<String, Value>,
    attr_obj: Map<String, Value>,
    attrs: Map<String, Value>,
}

fn typed_value(value: &str) -> Value {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Null) | Err(_) => Value::from(value),
        Ok(typed) => typed,
    }
}

fn attribute_maps(attributes: &[Attribute]) -> AttributeMaps {
    let mut maps = AttributeMaps {
        attr: Map::new(),
        attr_obj: Map::new(),
        attrs: Map::new(),
    };
    for attribute in attributes {
        let name = &attribute.name;
        maps.attr
            .insert(name.clone(), Value::from(attribute.first_value()));
        maps.attr_obj.insert(
            name.clone(),
            if attribute.values.is_empty() {
                Value::from("")
            } else {
                attribute.values.iter().map(|v| typed_value(v)).collect()
            },
        );
        maps.attrs
            .insert(name.clone(), Value::from(attribute.values.clone()));
    }
    maps
}

fn group_object(path: &str) -> Value {
    let name = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("/");
    json!({
        "path": path,
        "name": name,
        "parent": parent_group(path),
    })
}

/// Distinct authentication methods in use order, flagged as multi factor
/// when there is more than one.
fn authentication_methods(login: &LoginSessionInfo) -> Vec<Value> {
    let mut methods: Vec<&str> = Vec::new();
    for method in &login.authentication_methods {
        if !methods.contains(&method.as_str()) {
            methods.push(method);
        }
    }
    if methods.len() > 1 && !methods.contains(&MULTI_FACTOR_METHOD) {
        methods.push(MULTI_FACTOR_METHOD);
    }
    methods.into_iter().map(Value::from).collect()
}

/// Build the context of an output profile invocation.
pub fn create_context(input: &TranslationInput) -> Context {
    let released = attribute_maps(&input.attributes);
    let requester = attribute_maps(&input.requester_attributes);

    let sub_groups: Vec<Value> = input
        .groups
        .iter()
        .filter(|group| is_child_group(group, &input.chosen_group))
        .map(|group| Value::from(group.as_str()))
        .collect();

    let mut builder = Context::builder()
        .insert("protocol", input.protocol.as_str())
        .insert("protocolSubtype", input.protocol_subtype.as_str())
        .insert("requester", input.requester.as_str())
        .insert("attr", released.attr)
        .insert("attrObj", released.attr_obj)
        .insert("attrs", released.attrs)
        .insert("requesterAttr", requester.attr)
        .insert("requesterAttrObj", requester.attr_obj)
        .insert("requesterAttrs", requester.attrs)
        .insert(
            "idsByType",
            grouped(
                input
                    .entity
                    .identities
                    .iter()
                    .map(|id| (id.type_id.as_str(), id.value.as_str())),
            ),
        )
        .insert(
            "importStatus",
            input
                .import_status
                .iter()
                .map(|(importer, status)| (importer.clone(), Value::from(status.as_str())))
                .collect::<Map<String, Value>>(),
        )
        .insert("groups", Value::from(input.groups.clone()))
        .insert(
            "groupsObj",
            input
                .groups
                .iter()
                .map(|path| (path.clone(), group_object(path)))
                .collect::<Map<String, Value>>(),
        )
        .insert("usedGroup", input.chosen_group.as_str())
        .insert("subGroups", sub_groups);

    builder = match &input.login {
        Some(login) => {
            let upstream = login.upstream.as_ref();
            builder
                .insert(
                    "authenticatedWith",
                    Value::from(login.authenticated_identities.clone()),
                )
                .insert("idp", login.remote_idp.as_deref().unwrap_or(LOCAL_IDP))
                .insert("authentications", Value::from(login.authenticators.clone()))
                .insert("mfa", login.authenticators.len() > 1)
                .insert("twoStepAuthn", login.authenticators.len() > 1)
                .insert("amr", authentication_methods(login))
                .insert(
                    "upstreamIdP",
                    upstream
                        .and_then(|u| u.remote_idp.as_deref())
                        .map(Value::from)
                        .unwrap_or_default(),
                )
                .insert(
                    "upstreamProtocol",
                    upstream
                        .map(|u| u.protocol.as_str())
                        .unwrap_or(DEFAULT_UPSTREAM_PROTOCOL),
                )
                .insert(
                    "upstreamACRs",
                    Value::from(
                        upstream
                            .map(|u| u.class_references.clone())
                            .unwrap_or_default(),
                    ),
                )
        }
        None => builder
            .insert("authenticatedWith", Value::Array(Vec::new()))
            .insert("idp", Value::Null)
            .insert("authentications", Value::Array(Vec::new()))
            .insert("mfa", false)
            .insert("twoStepAuthn", false)
            .insert("amr", Value::Array(Vec::new()))
            .insert("upstreamIdP", Value::Null)
            .insert("upstreamProtocol", DEFAULT_UPSTREAM_PROTOCOL)
            .insert("upstreamACRs", Value::Array(Vec::new())),
    };

    builder.build()
}
