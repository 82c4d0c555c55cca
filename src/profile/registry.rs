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
//! # Profile registry
//!
//! Deployed profiles of one family by name. Deploying replaces the shared
//! pointer under the name, invocations which already resolved a profile keep
//! running the version they started with.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::action::TranslationAction;
use crate::engine::ProfileResolver;
use crate::profile::TranslationProfile;

#[derive(Debug)]
pub struct ProfileRegistry<A> {
    profiles: RwLock<HashMap<String, Arc<TranslationProfile<A>>>>,
}

impl<A> Default for ProfileRegistry<A> {
    fn default() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: TranslationAction> ProfileRegistry<A> {
    /// Install the profile, returning the replaced version.
    pub fn deploy(&self, profile: TranslationProfile<A>) -> Option<Arc<TranslationProfile<A>>> {
        let name = profile.name().to_string();
        let previous = self.profiles.write().insert(name.clone(), Arc::new(profile));
        info!(profile = %name, replaced = previous.is_some(), "translation profile deployed");
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<TranslationProfile<A>>> {
        self.profiles.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Arc<TranslationProfile<A>>> {
        let removed = self.profiles.write().remove(name);
        if removed.is_some() {
            info!(profile = %name, "translation profile removed");
        }
        removed
    }

    /// Names of the deployed profiles, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.profiles.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<A: TranslationAction> ProfileResolver<A> for ProfileRegistry<A> {
    fn resolve(&self, name: &str) -> Option<Arc<TranslationProfile<A>>> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::OutputAction;
    use crate::profile::Rule;
    use crate::expression::CompiledCondition;
    use crate::types::ProfileType;

    fn profile(name: &str, rules: usize) -> TranslationProfile<OutputAction> {
        TranslationProfile::new(
            name,
            ProfileType::Output,
            (0..rules)
                .map(|_| Rule::new(CompiledCondition::always(), OutputAction::Break))
                .collect(),
        )
    }

    #[test]
    fn test_deploy_replaces() {
        let registry = ProfileRegistry::default();
        assert!(registry.deploy(profile("a", 1)).is_none());
        let in_flight = registry.get("a").unwrap();
        let previous = registry.deploy(profile("a", 2)).unwrap();
        assert!(Arc::ptr_eq(&in_flight, &previous));
        assert_eq!(1, in_flight.rules().len());
        assert_eq!(2, registry.get("a").unwrap().rules().len());
    }

    #[test]
    fn test_list_and_remove() {
        let registry = ProfileRegistry::default();
        registry.deploy(profile("b", 0));
        registry.deploy(profile("a", 0));
        assert_eq!(vec!["a", "b"], registry.list());
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.resolve("a").is_none());
        assert!(registry.resolve("b").is_some());
    }
}
