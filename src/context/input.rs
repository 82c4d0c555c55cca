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
//! Context of input profiles.
//!
//! | Variable    | Content                                                  |
//! |-------------|----------------------------------------------------------|
//! | `idp`       | name of the remote identity provider                     |
//! | `attr`      | attribute name to its first value (or `""`)              |
//! | `attrs`     | attribute name to the list of its values                 |
//! | `id`        | value of the first remote identity (`null` without any)  |
//! | `idType`    | type of the first remote identity (`null` without any)   |
//! | `idsByType` | identity type to the list of identity values             |
//! | `groups`    | list of remote group names                               |
use serde_json::{Map, Value};

use crate::context::{Context, grouped};
use crate::types::RemotelyAuthenticatedInput;

/// Build the context of an input profile invocation.
pub fn create_context(input: &RemotelyAuthenticatedInput) -> Context {
    let mut attr = Map::new();
    let mut attrs = Map::new();
    for attribute in &input.attributes {
        attr.insert(
            attribute.name.clone(),
            Value::from(attribute.values.first().cloned().unwrap_or_default()),
        );
        attrs.insert(attribute.name.clone(), Value::from(attribute.values.clone()));
    }

    let first = input.identities.first();

    Context::builder()
        .insert("idp", input.idp.as_str())
        .insert("attr", attr)
        .insert("attrs", attrs)
        .insert("id", first.map(|id| Value::from(id.name.as_str())).unwrap_or_default())
        .insert(
            "idType",
            first
                .map(|id| Value::from(id.identity_type.as_str()))
                .unwrap_or_default(),
        )
        .insert(
            "idsByType",
            grouped(
                input
                    .identities
                    .iter()
                    .map(|id| (id.identity_type.as_str(), id.name.as_str())),
            ),
        )
        .insert(
            "groups",
            input
                .groups
                .iter()
                .map(|g| Value::from(g.group.as_str()))
                .collect::<Vec<_>>(),
        )
        .build()
}
