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
//! # Translation error
use thiserror::Error;

use crate::action::ActionEvaluationError;

/// Error aborting a profile invocation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TranslationError {
    /// Rule evaluation failed.
    #[error("profile `{profile}` rule {rule}: {source}")]
    Evaluation {
        /// Profile name.
        profile: String,
        /// 1-based rule index.
        rule: usize,
        /// The source of the error.
        source: ActionEvaluationError,
    },

    /// Profile referenced by `includeProfile` is not deployed.
    #[error("profile `{profile}` rule {rule} includes unknown profile `{included}`")]
    IncludedProfileNotFound {
        /// Including profile.
        profile: String,
        /// 1-based rule index.
        rule: usize,
        /// Included profile name.
        included: String,
    },

    /// Profiles include each other deeper than allowed.
    #[error("profile `{profile}` rule {rule}: include depth {depth} exceeded")]
    IncludeDepthExceeded {
        /// Including profile.
        profile: String,
        /// 1-based rule index.
        rule: usize,
        /// Maximal include depth.
        depth: usize,
    },
}
