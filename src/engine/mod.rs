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
//! # Translation engine
//!
//! [`TranslationEngine`] holds the action catalogues, the deployed profiles
//! of every type and the engine configuration. Profiles are addressed by
//! type and name, every invocation gets a fresh context and result.
//!
//! The invocation entry points of the families live in [`input`],
//! [`output`] and [`form`] and can be used without the facade given an
//! [`Executor`] and a built profile.
use std::sync::Arc;

use crate::action::{ActionRegistry, FormAction, InputAction, OutputAction};
use crate::config::Config;
use crate::error::TranslationEngineError;
use crate::expression::{Evaluator, ExpressionEvaluator};
use crate::profile::{ProfileRegistry, TranslationProfile};
use crate::result::{MappingResult, PostSubmitMessage, ReleaseResult, TranslatedRequest};
use crate::types::{
    AutomaticRequestAction, ConfirmedElement, Form, FormRequest, ProfileType,
    RegistrationContext, RemotelyAuthenticatedInput, RequestSubmitStatus,
    TranslationInput, TranslationProfileDefinition,
};

pub mod error;
pub mod executor;
pub mod form;
pub mod input;
pub mod output;

pub use error::TranslationError;
pub use executor::{Executor, ProfileResolver};

/// Translation engine.
pub struct TranslationEngine {
    config: Config,
    evaluator: Arc<dyn Evaluator>,
    input_actions: ActionRegistry<InputAction>,
    output_actions: ActionRegistry<OutputAction>,
    form_actions: ActionRegistry<FormAction>,
    input_profiles: ProfileRegistry<InputAction>,
    output_profiles: ProfileRegistry<OutputAction>,
    registration_profiles: ProfileRegistry<FormAction>,
    enquiry_profiles: ProfileRegistry<FormAction>,
}

impl TranslationEngine {
    pub fn new(config: Config) -> Self {
        Self::with_evaluator(config, Arc::new(ExpressionEvaluator))
    }

    /// Engine compiling conditions and expressions with the given evaluator.
    pub fn with_evaluator(config: Config, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            config,
            evaluator,
            input_actions: ActionRegistry::default(),
            output_actions: ActionRegistry::default(),
            form_actions: ActionRegistry::default(),
            input_profiles: ProfileRegistry::default(),
            output_profiles: ProfileRegistry::default(),
            registration_profiles: ProfileRegistry::default(),
            enquiry_profiles: ProfileRegistry::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn input_actions(&self) -> &ActionRegistry<InputAction> {
        &self.input_actions
    }

    pub fn output_actions(&self) -> &ActionRegistry<OutputAction> {
        &self.output_actions
    }

    pub fn form_actions(&self) -> &ActionRegistry<FormAction> {
        &self.form_actions
    }

    fn form_profiles(&self, profile_type: ProfileType) -> &ProfileRegistry<FormAction> {
        match profile_type {
            ProfileType::Enquiry => &self.enquiry_profiles,
            _ => &self.registration_profiles,
        }
    }

    /// Build and install an input profile.
    pub fn deploy_input(
        &self,
        definition: &TranslationProfileDefinition,
    ) -> Result<(), TranslationEngineError> {
        let profile =
            TranslationProfile::build(definition, &self.input_actions, self.evaluator.as_ref())?;
        self.input_profiles.deploy(profile);
        Ok(())
    }

    /// Build and install an output profile.
    pub fn deploy_output(
        &self,
        definition: &TranslationProfileDefinition,
    ) -> Result<(), TranslationEngineError> {
        let profile =
            TranslationProfile::build(definition, &self.output_actions, self.evaluator.as_ref())?;
        self.output_profiles.deploy(profile);
        Ok(())
    }

    /// Build and install a registration or enquiry profile.
    pub fn deploy_form(
        &self,
        definition: &TranslationProfileDefinition,
    ) -> Result<(), TranslationEngineError> {
        let profile =
            TranslationProfile::build(definition, &self.form_actions, self.evaluator.as_ref())?;
        self.form_profiles(profile.profile_type()).deploy(profile);
        Ok(())
    }

    /// Build and install a profile of any type.
    ///
    /// A broken definition leaves the previously deployed version in place.
    pub fn deploy(
        &self,
        definition: &TranslationProfileDefinition,
    ) -> Result<(), TranslationEngineError> {
        match definition.profile_type {
            ProfileType::Input => self.deploy_input(definition),
            ProfileType::Output => self.deploy_output(definition),
            ProfileType::Registration | ProfileType::Enquiry => self.deploy_form(definition),
        }
    }

    /// Build and install a profile out of its JSON definition.
    pub fn deploy_json(&self, definition: &str) -> Result<(), TranslationEngineError> {
        self.deploy(&serde_json::from_str(definition)?)
    }

    /// Remove a profile, return whether it was deployed.
    pub fn remove_profile(&self, profile_type: ProfileType, name: &str) -> bool {
        match profile_type {
            ProfileType::Input => self.input_profiles.remove(name).is_some(),
            ProfileType::Output => self.output_profiles.remove(name).is_some(),
            ProfileType::Registration | ProfileType::Enquiry => {
                self.form_profiles(profile_type).remove(name).is_some()
            }
        }
    }

    /// Names of the deployed profiles of the type.
    pub fn list_profiles(&self, profile_type: ProfileType) -> Vec<String> {
        match profile_type {
            ProfileType::Input => self.input_profiles.list(),
            ProfileType::Output => self.output_profiles.list(),
            ProfileType::Registration | ProfileType::Enquiry => {
                self.form_profiles(profile_type).list()
            }
        }
    }

    fn not_found(profile_type: ProfileType, name: &str) -> TranslationEngineError {
        TranslationEngineError::ProfileNotFound {
            profile_type,
            name: name.to_string(),
        }
    }

    pub fn input_profile(
        &self,
        name: &str,
    ) -> Result<Arc<TranslationProfile<InputAction>>, TranslationEngineError> {
        self.input_profiles
            .get(name)
            .ok_or_else(|| Self::not_found(ProfileType::Input, name))
    }

    pub fn output_profile(
        &self,
        name: &str,
    ) -> Result<Arc<TranslationProfile<OutputAction>>, TranslationEngineError> {
        self.output_profiles
            .get(name)
            .ok_or_else(|| Self::not_found(ProfileType::Output, name))
    }

    /// Registration or enquiry profile.
    pub fn form_profile(
        &self,
        profile_type: ProfileType,
        name: &str,
    ) -> Result<Arc<TranslationProfile<FormAction>>, TranslationEngineError> {
        match profile_type {
            ProfileType::Registration | ProfileType::Enquiry => self
                .form_profiles(profile_type)
                .get(name)
                .ok_or_else(|| Self::not_found(profile_type, name)),
            _ => Err(Self::not_found(profile_type, name)),
        }
    }

    pub fn input_executor(&self) -> Executor<'_, InputAction> {
        Executor::new(&self.config.translation).with_resolver(&self.input_profiles)
    }

    pub fn output_executor(&self) -> Executor<'_, OutputAction> {
        Executor::new(&self.config.translation).with_resolver(&self.output_profiles)
    }

    pub fn form_executor(&self, profile_type: ProfileType) -> Executor<'_, FormAction> {
        Executor::new(&self.config.translation).with_resolver(self.form_profiles(profile_type))
    }

    /// Map the data of a remote login with the named input profile.
    pub fn translate_input(
        &self,
        profile: &str,
        input: &RemotelyAuthenticatedInput,
    ) -> Result<MappingResult, TranslationEngineError> {
        let profile = self.input_profile(profile)?;
        Ok(input::translate(&self.input_executor(), &profile, input)?)
    }

    /// Shape the released data with the named output profile.
    pub fn translate_output(
        &self,
        profile: &str,
        input: &TranslationInput,
    ) -> Result<ReleaseResult, TranslationEngineError> {
        let profile = self.output_profile(profile)?;
        Ok(output::translate(&self.output_executor(), &profile, input)?)
    }

    /// Translate a submitted request with the named registration or enquiry
    /// profile.
    pub fn translate_form_request(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        request: &FormRequest,
        registration: &RegistrationContext,
    ) -> Result<TranslatedRequest, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::translate_request(
            &self.form_executor(profile_type),
            &profile,
            form,
            request,
            registration,
        )?)
    }

    pub fn auto_process_action(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        request: &FormRequest,
        registration: &RegistrationContext,
        status: RequestSubmitStatus,
    ) -> Result<Option<AutomaticRequestAction>, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::auto_process_action(
            &self.form_executor(profile_type),
            &profile,
            form,
            request,
            registration,
            status,
        )?)
    }

    pub fn post_submit_redirect_url(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        request: &FormRequest,
        registration: &RegistrationContext,
    ) -> Result<Option<String>, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::post_submit_redirect_url(
            &self.form_executor(profile_type),
            &profile,
            form,
            request,
            registration,
        )?)
    }

    pub fn post_cancel_redirect_url(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        registration: &RegistrationContext,
    ) -> Result<Option<String>, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::post_cancel_redirect_url(
            &self.form_executor(profile_type),
            &profile,
            form,
            registration,
        )?)
    }

    pub fn post_confirmation_redirect_url(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        request: &FormRequest,
        registration: &RegistrationContext,
        confirmed: &ConfirmedElement,
    ) -> Result<Option<String>, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::post_confirmation_redirect_url(
            &self.form_executor(profile_type),
            &profile,
            form,
            request,
            registration,
            confirmed,
        )?)
    }

    pub fn post_submit_message(
        &self,
        profile_type: ProfileType,
        profile: &str,
        form: &Form,
        request: &FormRequest,
        registration: &RegistrationContext,
    ) -> Result<Option<PostSubmitMessage>, TranslationEngineError> {
        let profile = self.form_profile(profile_type, profile)?;
        Ok(form::post_submit_message(
            &self.form_executor(profile_type),
            &profile,
            form,
            request,
            registration,
        )?)
    }
}
