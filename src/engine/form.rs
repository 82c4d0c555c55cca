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
//! # Form profile invocation
//!
//! Besides the translation of a submitted request a form profile is queried
//! for single decisions (side channels): the automatic processing action,
//! the redirect after submission or cancellation, the redirect after an
//! element confirmation and the message shown after submission. A side
//! channel only runs the rules with the matching action.
use tracing::trace;

use crate::action::{ActionKind, FormAction};
use crate::context::Context;
use crate::context::form::{create_base_context, create_context};
use crate::engine::error::TranslationError;
use crate::engine::executor::Executor;
use crate::profile::TranslationProfile;
use crate::result::{PostSubmitMessage, TranslatedRequest};
use crate::types::{
    AutomaticRequestAction, ConfirmedElement, Form, FormRequest, RegistrationContext,
    RequestSubmitStatus,
};

fn dump(executor: &Executor<'_, FormAction>, ctx: &Context) {
    if executor.settings().dump_context {
        trace!("Form profile context:\n{}", ctx);
    }
}

/// Translate the submitted request.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn translate_request(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    request: &FormRequest,
    registration: &RegistrationContext,
) -> Result<TranslatedRequest, TranslationError> {
    let ctx = create_context(
        form,
        request,
        RequestSubmitStatus::Submitted,
        registration,
        None,
    );
    dump(executor, &ctx);
    let mut result = TranslatedRequest::from_request(form, request);
    executor.execute(profile, &ctx, &mut result)?;
    Ok(result)
}

/// Automatic processing action for the request in the given status.
///
/// `None` when the profile could not be evaluated.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn auto_process_action(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    request: &FormRequest,
    registration: &RegistrationContext,
    status: RequestSubmitStatus,
) -> Result<Option<AutomaticRequestAction>, TranslationError> {
    let ctx = create_context(form, request, status, registration, None);
    dump(executor, &ctx);
    executor.extract(
        profile,
        &ctx,
        TranslatedRequest::from_request(form, request),
        ActionKind::AutoProcess,
        |result| Some(result.auto_action()),
    )
}

/// Where to redirect after the request was submitted.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn post_submit_redirect_url(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    request: &FormRequest,
    registration: &RegistrationContext,
) -> Result<Option<String>, TranslationError> {
    let ctx = create_context(
        form,
        request,
        RequestSubmitStatus::Submitted,
        registration,
        None,
    );
    dump(executor, &ctx);
    executor.extract(
        profile,
        &ctx,
        TranslatedRequest::from_request(form, request),
        ActionKind::Redirect,
        |result| result.redirect_url().map(String::from),
    )
}

/// Where to redirect after the form was cancelled. Only the base context
/// is available as nothing was submitted.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn post_cancel_redirect_url(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    registration: &RegistrationContext,
) -> Result<Option<String>, TranslationError> {
    let ctx = create_base_context(form, RequestSubmitStatus::NotSubmitted, registration);
    dump(executor, &ctx);
    executor.extract(
        profile,
        &ctx,
        TranslatedRequest::new(form.default_credential_requirement.as_str()),
        ActionKind::Redirect,
        |result| result.redirect_url().map(String::from),
    )
}

/// Where to redirect after an element of the request was confirmed. An
/// empty URL is reported as no URL.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn post_confirmation_redirect_url(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    request: &FormRequest,
    registration: &RegistrationContext,
    confirmed: &ConfirmedElement,
) -> Result<Option<String>, TranslationError> {
    let ctx = create_context(
        form,
        request,
        RequestSubmitStatus::Submitted,
        registration,
        Some(confirmed),
    );
    dump(executor, &ctx);
    executor.extract(
        profile,
        &ctx,
        TranslatedRequest::from_request(form, request),
        ActionKind::ConfirmationRedirect,
        |result| {
            result
                .redirect_url()
                .filter(|url| !url.is_empty())
                .map(String::from)
        },
    )
}

/// Message presented after the request was submitted.
#[tracing::instrument(level = "info", skip_all, fields(profile = %profile.name(), form = %form.name))]
pub fn post_submit_message(
    executor: &Executor<'_, FormAction>,
    profile: &TranslationProfile<FormAction>,
    form: &Form,
    request: &FormRequest,
    registration: &RegistrationContext,
) -> Result<Option<PostSubmitMessage>, TranslationError> {
    let ctx = create_context(
        form,
        request,
        RequestSubmitStatus::Submitted,
        registration,
        None,
    );
    dump(executor, &ctx);
    executor.extract(
        profile,
        &ctx,
        TranslatedRequest::from_request(form, request),
        ActionKind::SubmitMessage,
        |result| result.post_submit_message().cloned(),
    )
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::action::ActionRegistry;
    use crate::config::TranslationSection;
    use crate::expression::ExpressionEvaluator;
    use crate::tests::{form, form_request};
    use crate::types::{Identity, TranslationProfileDefinition};

    fn profile(rules: serde_json::Value) -> TranslationProfile<FormAction> {
        let definition: TranslationProfileDefinition = serde_json::from_value(serde_json::json!({
            "name": "reg",
            "type": "REGISTRATION",
            "rules": rules,
        }))
        .unwrap();
        TranslationProfile::build(&definition, &ActionRegistry::default(), &ExpressionEvaluator)
            .unwrap()
    }

    fn rule(condition: &str, name: &str, parameters: &[&str]) -> serde_json::Value {
        serde_json::json!({"condition": condition, "action": {"name": name, "parameters": parameters}})
    }

    #[test]
    fn test_translate_request() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule("agrs[1] == 'false'", "setEntityState", &["disabled"]),
            rule("true", "filterAttribute", &["cn"]),
            rule("status == 'submitted'", "addToGroup", &["'/members'"]),
        ]));
        let result = translate_request(
            &Executor::new(&settings),
            &profile,
            &form(),
            &form_request(),
            &RegistrationContext::default(),
        )
        .unwrap();
        assert_eq!(crate::types::EntityState::Disabled, result.entity_state());
        assert!(result.attributes().is_empty());
        let groups: Vec<_> = result.groups().iter().map(|g| g.group.as_str()).collect();
        assert_eq!(vec!["/staff", "/members"], groups);
    }

    #[test]
    fn test_auto_process_by_status() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule("status == 'submitted'", "autoProcess", &["accept"]),
            rule("true", "break", &[]),
            rule("status == 'notSubmitted'", "autoProcess", &["drop"]),
        ]));
        let executor = Executor::new(&settings);
        let run = |status| {
            auto_process_action(
                &executor,
                &profile,
                &form(),
                &form_request(),
                &RegistrationContext::default(),
                status,
            )
            .unwrap()
        };
        // The break rule is filtered out of the side channel
        assert_eq!(Some(AutomaticRequestAction::Accept), run(RequestSubmitStatus::Submitted));
        assert_eq!(Some(AutomaticRequestAction::Drop), run(RequestSubmitStatus::NotSubmitted));
    }

    #[test]
    fn test_auto_process_default() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([]));
        assert_eq!(
            Some(AutomaticRequestAction::None),
            auto_process_action(
                &Executor::new(&settings),
                &profile,
                &form(),
                &form_request(),
                &RegistrationContext::default(),
                RequestSubmitStatus::Submitted,
            )
            .unwrap()
        );
    }

    #[test]
    #[traced_test]
    fn test_redirect_fails_open() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule("true", "redirect", &["attr['cn'].substring(100)"]),
        ]));
        assert_eq!(
            None,
            post_submit_redirect_url(
                &Executor::new(&settings),
                &profile,
                &form(),
                &form_request(),
                &RegistrationContext::default(),
            )
            .unwrap()
        );
        assert!(logs_contain("couldn't establish value from profile"));
    }

    #[test]
    fn test_cancel_redirect_uses_base_context() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule(
                "status == 'notSubmitted' && registrationForm == 'signup'",
                "redirect",
                &["'https://example.com/cancelled'"],
            ),
        ]));
        assert_eq!(
            Some("https://example.com/cancelled".to_string()),
            post_cancel_redirect_url(
                &Executor::new(&settings),
                &profile,
                &form(),
                &RegistrationContext::default(),
            )
            .unwrap()
        );
    }

    #[test]
    fn test_confirmation_redirect() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule(
                "confirmedElementType == 'identity'",
                "confirmationRedirect",
                &["'https://example.com/?' + confirmedElementValue"],
            ),
            rule("confirmedElementType == 'attribute'", "confirmationRedirect", &["''"]),
            // Not part of the confirmation side channel
            rule("true", "redirect", &["'https://example.com/other'"]),
        ]));
        let executor = Executor::new(&settings);
        let confirm = |confirmed: &ConfirmedElement| {
            post_confirmation_redirect_url(
                &executor,
                &profile,
                &form(),
                &form_request(),
                &RegistrationContext::default(),
                confirmed,
            )
            .unwrap()
        };
        assert_eq!(
            Some("https://example.com/?jdoe@example.com".to_string()),
            confirm(&ConfirmedElement::identity(&Identity::new(
                "email",
                "jdoe@example.com"
            )))
        );
        assert_eq!(
            None,
            confirm(&ConfirmedElement::attribute(&crate::types::Attribute::new(
                "mail",
                "/",
                vec!["x".into()]
            )))
        );
    }

    #[test]
    fn test_post_submit_message() {
        let settings = TranslationSection::default();
        let profile = profile(serde_json::json!([
            rule("true", "submitMessage", &["Thanks", "We will get back to you"]),
        ]));
        let message = post_submit_message(
            &Executor::new(&settings),
            &profile,
            &form(),
            &form_request(),
            &RegistrationContext::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(Some("Thanks"), message.caption.as_deref());
    }
}
