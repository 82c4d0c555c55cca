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
//! Input profile invocation.

use tracing::{debug, trace};

use crate::action::InputAction;
use crate::context::input::create_context;
use crate::engine::error::TranslationError;
use crate::engine::executor::Executor;
use crate::profile::TranslationProfile;
use crate::result::MappingResult;
use crate::types::RemotelyAuthenticatedInput;

/// Map the data of a remote login with the input profile.
#[tracing::instrument(level = "info", skip(executor, profile, input), fields(profile = %profile.name(), idp = %input.idp))]
pub fn translate(
    executor: &Executor<'_, InputAction>,
    profile: &TranslationProfile<InputAction>,
    input: &RemotelyAuthenticatedInput,
) -> Result<MappingResult, TranslationError> {
    debug!("Input received from remote source:\n{}", input.text_dump());
    let ctx = create_context(input);
    if executor.settings().dump_context {
        trace!("Input profile context:\n{}", ctx);
    }
    let mut result = MappingResult::new(input.idp.as_str());
    executor.execute(profile, &ctx, &mut result)?;
    debug!(
        identities = result.identities().len(),
        attributes = result.attributes().len(),
        groups = result.groups().len(),
        "input translation finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;
    use crate::config::TranslationSection;
    use crate::expression::ExpressionEvaluator;
    use crate::tests::remote_input;
    use crate::types::TranslationProfileDefinition;

    #[test]
    fn test_translate() {
        let definition: TranslationProfileDefinition = serde_json::from_value(serde_json::json!({
            "name": "remote",
            "type": "INPUT",
            "rules": [
                {"condition": "idsByType contains 'userName'", "action": {
                    "name": "mapIdentity",
                    "parameters": ["userName", "idsByType['userName']", null, "CREATE_OR_MATCH"]}},
                {"condition": "attrs['memberOf'] contains 'admins'", "action": {
                    "name": "mapGroup", "parameters": ["'/admins'", "ADD_IF_GROUP_EXISTS"]}},
                {"action": {"name": "mapAttribute",
                    "parameters": ["cn", "/", "attr['cn']", "full", "CREATE_OR_UPDATE"]}},
                {"condition": "idp ~= 'https://.*'", "action": {"name": "removeStaleData"}}
            ]
        }))
        .unwrap();
        let profile =
            TranslationProfile::build(&definition, &ActionRegistry::default(), &ExpressionEvaluator)
                .unwrap();
        let settings = TranslationSection {
            dump_context: true,
            ..Default::default()
        };
        let result = translate(&Executor::new(&settings), &profile, &remote_input()).unwrap();
        assert_eq!(Some("https://idp.example.com"), result.remote_idp());
        assert_eq!("jdoe", result.identities()[0].identity.value);
        assert_eq!(
            Some("https://idp.example.com"),
            result.identities()[0].identity.remote_idp.as_deref()
        );
        assert_eq!("/admins", result.groups()[0].group);
        assert_eq!(vec!["John Doe"], result.attributes()[0].attribute.values);
        assert!(result.clean_stale_data());
    }
}
