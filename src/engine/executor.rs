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
//! # Profile executor
//!
//! Runs the rules of a profile strictly in declaration order against one
//! context and one result accumulator. A `break` stops the profile it is
//! declared in, an `includeProfile` runs the referenced profile of the same
//! family in place.
use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use crate::action::{ActionKind, RuleOutcome, TranslationAction};
use crate::config::TranslationSection;
use crate::context::Context;
use crate::engine::error::TranslationError;
use crate::profile::TranslationProfile;

/// Lookup of profiles referenced by `includeProfile` actions.
pub trait ProfileResolver<A>: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<TranslationProfile<A>>>;
}

/// Executor of profiles of one family.
pub struct Executor<'a, A> {
    resolver: Option<&'a dyn ProfileResolver<A>>,
    settings: &'a TranslationSection,
}

impl<'a, A: TranslationAction> Executor<'a, A> {
    pub fn new(settings: &'a TranslationSection) -> Self {
        Self {
            resolver: None,
            settings,
        }
    }

    /// Resolve included profiles with the given resolver. Without one every
    /// `includeProfile` fails.
    pub fn with_resolver(mut self, resolver: &'a dyn ProfileResolver<A>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn settings(&self) -> &TranslationSection {
        self.settings
    }

    /// Run all rules of the profile.
    pub fn execute(
        &self,
        profile: &TranslationProfile<A>,
        ctx: &Context,
        result: &mut A::Output,
    ) -> Result<(), TranslationError> {
        self.run(profile, ctx, result, None, 0)
    }

    /// Run only the rules with actions of the given kind. Rules of other
    /// kinds are not evaluated at all, their conditions included.
    pub fn execute_filtered(
        &self,
        profile: &TranslationProfile<A>,
        ctx: &Context,
        result: &mut A::Output,
        filter: ActionKind,
    ) -> Result<(), TranslationError> {
        self.run(profile, ctx, result, Some(filter), 0)
    }

    /// Run a side channel extraction.
    ///
    /// Failures are logged and reported as no value unless strict side
    /// channels are configured.
    pub fn extract<T, F>(
        &self,
        profile: &TranslationProfile<A>,
        ctx: &Context,
        mut result: A::Output,
        filter: ActionKind,
        extract: F,
    ) -> Result<Option<T>, TranslationError>
    where
        F: FnOnce(A::Output) -> Option<T>,
    {
        match self.execute_filtered(profile, ctx, &mut result, filter) {
            Ok(()) => Ok(extract(result)),
            Err(err) if !self.settings.strict_side_channels => {
                warn!(
                    profile = %profile.name(),
                    action = %filter,
                    error = %err,
                    "couldn't establish value from profile"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn run(
        &self,
        profile: &TranslationProfile<A>,
        ctx: &Context,
        result: &mut A::Output,
        filter: Option<ActionKind>,
        depth: usize,
    ) -> Result<(), TranslationError> {
        let _profile_span = debug_span!("profile", name = %profile.name(), depth).entered();
        for (idx, rule) in profile.rules().iter().enumerate() {
            let kind = rule.action().kind();
            if filter.is_some_and(|filter| filter != kind) {
                continue;
            }
            let number = idx + 1;
            let _rule_span = debug_span!("rule", rule = number, action = %kind).entered();
            let outcome = rule.invoke(ctx, profile.name(), result).map_err(|source| {
                TranslationError::Evaluation {
                    profile: profile.name().to_string(),
                    rule: number,
                    source,
                }
            })?;
            match outcome {
                None | Some(RuleOutcome::Continue) => {}
                Some(RuleOutcome::Break) => {
                    debug!("break, skipping remaining rules");
                    break;
                }
                Some(RuleOutcome::Include(name)) => {
                    if depth >= self.settings.max_include_depth {
                        return Err(TranslationError::IncludeDepthExceeded {
                            profile: profile.name().to_string(),
                            rule: number,
                            depth: self.settings.max_include_depth,
                        });
                    }
                    let included = self
                        .resolver
                        .and_then(|resolver| resolver.resolve(&name))
                        .ok_or_else(|| TranslationError::IncludedProfileNotFound {
                            profile: profile.name().to_string(),
                            rule: number,
                            included: name.clone(),
                        })?;
                    debug!(included = %name, "including profile");
                    self.run(&included, ctx, result, filter, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use tracing_test::traced_test;

    use super::mock::MockOutputProfileResolver;
    use super::*;
    use crate::action::{ActionEvaluationError, ActionRegistry, OutputAction};
    use crate::context::output::create_context;
    use crate::expression::{EvaluationError, ExpressionEvaluator};
    use crate::result::ReleaseResult;
    use crate::tests::translation_input;
    use crate::types::{
        ActionDefinition, ProfileType, TranslationProfileDefinition, TranslationRuleDefinition,
    };

    fn profile(name: &str, rules: &[(&str, &str, &[&str])]) -> TranslationProfile<OutputAction> {
        let definition = TranslationProfileDefinition::builder()
            .name(name)
            .profile_type(ProfileType::Output)
            .rules(
                rules
                    .iter()
                    .map(|(condition, action, params)| {
                        TranslationRuleDefinition::new(
                            *condition,
                            ActionDefinition::new(*action, params.iter().copied()),
                        )
                    })
                    .collect::<Vec<_>>(),
            )
            .build()
            .unwrap();
        TranslationProfile::build(&definition, &ActionRegistry::default(), &ExpressionEvaluator)
            .unwrap()
    }

    fn run(
        executor: &Executor<'_, OutputAction>,
        profile: &TranslationProfile<OutputAction>,
    ) -> Result<ReleaseResult, TranslationError> {
        let input = translation_input();
        let mut result = ReleaseResult::from_input(&input);
        executor.execute(profile, &create_context(&input), &mut result)?;
        Ok(result)
    }

    fn attribute_names(result: &ReleaseResult) -> Vec<&str> {
        result.attributes().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    #[traced_test]
    fn test_break_stops_profile() {
        let settings = TranslationSection::default();
        let profile = profile(
            "p",
            &[
                ("true", "createAttribute", &["a", "'1'"]),
                ("protocol == 'SAML2'", "break", &[]),
                ("true", "createAttribute", &["b", "'2'"]),
            ],
        );
        let result = run(&Executor::new(&settings), &profile).unwrap();
        assert_eq!(vec!["cn", "mail", "a"], attribute_names(&result));
        assert!(logs_contain("break, skipping remaining rules"));
    }

    #[test]
    fn test_break_in_included_profile() {
        let settings = TranslationSection::default();
        let included = Arc::new(profile(
            "inc",
            &[
                ("true", "createAttribute", &["x", "'1'"]),
                ("true", "break", &[]),
                ("true", "createAttribute", &["y", "'1'"]),
            ],
        ));
        let mut resolver = MockOutputProfileResolver::new();
        resolver
            .expect_resolve()
            .with(eq("inc"))
            .times(1)
            .returning(move |_| Some(included.clone()));
        let main = profile(
            "main",
            &[
                ("true", "includeProfile", &["inc"]),
                ("true", "createAttribute", &["z", "'1'"]),
            ],
        );
        let result = run(&Executor::new(&settings).with_resolver(&resolver), &main).unwrap();
        assert_eq!(vec!["cn", "mail", "x", "z"], attribute_names(&result));
    }

    #[test]
    fn test_include_not_found() {
        let settings = TranslationSection::default();
        let mut resolver = MockOutputProfileResolver::new();
        resolver.expect_resolve().returning(|_| None);
        let main = profile("main", &[("true", "includeProfile", &["missing"])]);
        assert_eq!(
            Err(TranslationError::IncludedProfileNotFound {
                profile: "main".into(),
                rule: 1,
                included: "missing".into(),
            }),
            run(&Executor::new(&settings).with_resolver(&resolver), &main)
        );
    }

    #[test]
    fn test_include_cycle_bounded() {
        let settings = TranslationSection {
            max_include_depth: 3,
            ..Default::default()
        };
        let looping = Arc::new(profile(
            "loop",
            &[
                ("true", "createIdentity", &["n", "'x'"]),
                ("true", "includeProfile", &["loop"]),
            ],
        ));
        let mut resolver = MockOutputProfileResolver::new();
        let resolved = looping.clone();
        resolver
            .expect_resolve()
            .times(3)
            .returning(move |_| Some(resolved.clone()));
        assert!(matches!(
            run(&Executor::new(&settings).with_resolver(&resolver), &looping),
            Err(TranslationError::IncludeDepthExceeded { depth: 3, .. })
        ));
    }

    #[test]
    fn test_evaluation_error_reports_rule() {
        let settings = TranslationSection::default();
        let profile = profile(
            "p",
            &[
                ("true", "createAttribute", &["a", "'1'"]),
                ("protocol", "break", &[]),
            ],
        );
        match run(&Executor::new(&settings), &profile) {
            Err(TranslationError::Evaluation {
                profile,
                rule,
                source: ActionEvaluationError::Condition { source, .. },
            }) => {
                assert_eq!("p", profile);
                assert_eq!(2, rule);
                assert_eq!(EvaluationError::NotBoolean("SAML2".into()), source);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_filtered_skips_other_conditions() {
        let settings = TranslationSection::default();
        // The broken condition is never evaluated
        let profile = profile(
            "p",
            &[
                ("protocol", "createAttribute", &["a", "'1'"]),
                ("true", "filterAttribute", &["cn"]),
            ],
        );
        let input = translation_input();
        let mut result = ReleaseResult::from_input(&input);
        Executor::new(&settings)
            .execute_filtered(
                &profile,
                &create_context(&input),
                &mut result,
                ActionKind::FilterAttribute,
            )
            .unwrap();
        assert_eq!(vec!["mail"], attribute_names(&result));
    }

    #[test]
    #[traced_test]
    fn test_extract_fail_open() {
        let profile = profile("p", &[("1 / 0 == 1", "filterAttribute", &["cn"])]);
        let input = translation_input();
        let ctx = create_context(&input);

        let lenient = TranslationSection::default();
        let value = Executor::new(&lenient)
            .extract(
                &profile,
                &ctx,
                ReleaseResult::from_input(&input),
                ActionKind::FilterAttribute,
                |result| Some(result.attributes().len()),
            )
            .unwrap();
        assert_eq!(None, value);
        assert!(logs_contain("couldn't establish value from profile"));

        let strict = TranslationSection {
            strict_side_channels: true,
            ..Default::default()
        };
        assert!(
            Executor::new(&strict)
                .extract(
                    &profile,
                    &ctx,
                    ReleaseResult::from_input(&input),
                    ActionKind::FilterAttribute,
                    |result| Some(result.attributes().len()),
                )
                .is_err()
        );
    }
}
