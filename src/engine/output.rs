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
//! Output profile invocation.

use tracing::{debug, trace};

use crate::action::OutputAction;
use crate::context::output::create_context;
use crate::engine::error::TranslationError;
use crate::engine::executor::Executor;
use crate::profile::TranslationProfile;
use crate::result::ReleaseResult;
use crate::types::TranslationInput;

/// Shape the data released to the requester with the output profile.
///
/// The result starts with everything the input carries, rules filter and
/// extend it.
#[tracing::instrument(level = "info", skip(executor, profile, input), fields(profile = %profile.name(), requester = %input.requester))]
pub fn translate(
    executor: &Executor<'_, OutputAction>,
    profile: &TranslationProfile<OutputAction>,
    input: &TranslationInput,
) -> Result<ReleaseResult, TranslationError> {
    let ctx = create_context(input);
    if executor.settings().dump_context {
        trace!("Output profile context:\n{}", ctx);
    }
    let mut result = ReleaseResult::from_input(input);
    executor.execute(profile, &ctx, &mut result)?;
    debug!(
        identities = result.identities().len(),
        attributes = result.attributes().len(),
        "output translation finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;
    use crate::config::TranslationSection;
    use crate::expression::ExpressionEvaluator;
    use crate::tests::translation_input;
    use crate::types::{LoginSessionInfo, TranslationProfileDefinition};

    fn profile() -> TranslationProfile<OutputAction> {
        let definition: TranslationProfileDefinition = serde_json::from_value(serde_json::json!({
            "name": "release",
            "type": "OUTPUT",
            "rules": [
                {"condition": "idp == null", "action": {"name": "filterAttribute", "parameters": ["mail"]}},
                {"condition": "subGroups contains '/staff/ops'", "action": {
                    "name": "createAttribute", "parameters": ["role", "'operator'"]}},
                {"condition": "mfa", "action": {
                    "name": "createAttribute", "parameters": ["acr", "'mfa'"]}}
            ]
        }))
        .unwrap();
        TranslationProfile::build(&definition, &ActionRegistry::default(), &ExpressionEvaluator)
            .unwrap()
    }

    #[test]
    fn test_translate_without_session() {
        let settings = TranslationSection::default();
        let result = translate(&Executor::new(&settings), &profile(), &translation_input()).unwrap();
        let names: Vec<_> = result.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(vec!["cn", "role"], names);
        assert_eq!(2, result.identities().len());
    }

    #[test]
    fn test_translate_with_mfa_session() {
        let settings = TranslationSection::default();
        let mut input = translation_input();
        input.login = Some(LoginSessionInfo {
            authenticated_identities: vec!["jdoe".into()],
            remote_idp: None,
            authenticators: vec!["pwd".into(), "otp".into()],
            authentication_methods: vec!["pwd".into(), "otp".into()],
            upstream: None,
        });
        let result = translate(&Executor::new(&settings), &profile(), &input).unwrap();
        let names: Vec<_> = result.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(vec!["cn", "mail", "role", "acr"], names);
    }
}
