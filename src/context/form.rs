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
//! Context of registration and enquiry profiles.
//!
//! Every context carries `status` (`submitted` or `notSubmitted`),
//! `triggered` (the triggering mode), `onIdpEndpoint` and `registrationForm`.
//! When a request is available the context additionally carries:
//!
//! | Variable               | Content                                         |
//! |------------------------|-------------------------------------------------|
//! | `idsByType`            | identity type to the submitted values           |
//! | `ridsByType`           | same, limited to automatically retrieved params |
//! | `attr`, `attrs`        | attribute name to first value / all values      |
//! | `rattr`, `rattrs`      | same, limited to automatically retrieved params |
//! | `groups`, `rgroups`    | selected group paths                            |
//! | `agrs`                 | agreement acceptance as `"true"`/`"false"`      |
//! | `userLocale`           | locale of the submitting user                   |
//! | `requestId`            | request identifier                              |
//!
//! Post confirmation evaluations also carry `confirmedElementType`,
//! `confirmedElementName` and `confirmedElementValue`.
use serde_json::{Map, Value};

use crate::context::{Context, ContextBuilder, grouped};
use crate::types::{
    ConfirmedElement, Form, FormRequest, ParameterRetrievalSettings, RegistrationContext,
    RequestSubmitStatus,
};

fn enum_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn base_builder(
    form: &Form,
    status: RequestSubmitStatus,
    registration: &RegistrationContext,
) -> ContextBuilder {
    Context::builder()
        .insert("status", enum_value(&status))
        .insert("triggered", enum_value(&registration.triggering_mode))
        .insert("onIdpEndpoint", registration.on_idp_endpoint)
        .insert("registrationForm", form.name.as_str())
}

/// Build the context used when no request exists (cancelled form).
pub fn create_base_context(
    form: &Form,
    status: RequestSubmitStatus,
    registration: &RegistrationContext,
) -> Context {
    base_builder(form, status, registration).build()
}

fn is_automatic(retrieval: Option<ParameterRetrievalSettings>) -> bool {
    retrieval.is_some_and(|r| r.is_automatic_only())
}

/// Build the context of a form profile invocation for a submitted request.
pub fn create_context(
    form: &Form,
    request: &FormRequest,
    status: RequestSubmitStatus,
    registration: &RegistrationContext,
    confirmed: Option<&ConfirmedElement>,
) -> Context {
    let mut attr = Map::new();
    let mut attrs = Map::new();
    let mut rattr = Map::new();
    let mut rattrs = Map::new();
    for (idx, attribute) in request.attributes.iter().enumerate() {
        let Some(attribute) = attribute else {
            continue;
        };
        let first = Value::from(attribute.first_value());
        let values = Value::from(attribute.values.clone());
        if is_automatic(form.attribute_params.get(idx).map(|p| p.retrieval)) {
            rattr.insert(attribute.name.clone(), first.clone());
            rattrs.insert(attribute.name.clone(), values.clone());
        }
        attr.insert(attribute.name.clone(), first);
        attrs.insert(attribute.name.clone(), values);
    }

    let submitted_ids = || {
        request
            .identities
            .iter()
            .enumerate()
            .filter_map(|(idx, identity)| identity.as_ref().map(|id| (idx, id)))
    };
    let ids_by_type = grouped(
        submitted_ids().map(|(_, id)| (id.type_id.as_str(), id.value.as_str())),
    );
    let rids_by_type = grouped(
        submitted_ids()
            .filter(|(idx, _)| is_automatic(form.identity_params.get(*idx).map(|p| p.retrieval)))
            .map(|(_, id)| (id.type_id.as_str(), id.value.as_str())),
    );

    let mut groups = Vec::new();
    let mut rgroups = Vec::new();
    for (param, selection) in form.group_params.iter().zip(&request.group_selections) {
        if !selection.selected {
            continue;
        }
        groups.push(Value::from(param.group_path.as_str()));
        if param.retrieval.is_automatic_only() {
            rgroups.push(Value::from(param.group_path.as_str()));
        }
    }

    let agreements: Vec<Value> = request
        .agreements
        .iter()
        .map(|accepted| Value::from(accepted.to_string()))
        .collect();

    let mut builder = base_builder(form, status, registration)
        .insert("userLocale", request.user_locale.clone())
        .insert("requestId", request.request_id.clone())
        .insert("attr", attr)
        .insert("attrs", attrs)
        .insert("rattr", rattr)
        .insert("rattrs", rattrs)
        .insert("idsByType", ids_by_type)
        .insert("ridsByType", rids_by_type)
        .insert("groups", groups)
        .insert("rgroups", rgroups)
        .insert("agrs", agreements);

    if let Some(confirmed) = confirmed {
        builder = builder
            .insert("confirmedElementType", enum_value(&confirmed.element_type))
            .insert("confirmedElementName", confirmed.name.as_str())
            .insert("confirmedElementValue", confirmed.value.as_str());
    }

    builder.build()
}
