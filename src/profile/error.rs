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
//! # Profile definition error
use thiserror::Error;

use crate::action::ActionKind;
use crate::expression::SyntaxError;
use crate::types::ProfileType;

/// Error detected while building a profile out of its definition.
///
/// Raised at deploy time. A profile failing with this error is never
/// installed and the previously deployed version stays in effect.
#[derive(Debug, Error)]
pub enum ProfileDefinitionError {
    /// Action name is not known for the profile family.
    #[error("unknown action `{name}` for {profile_type} profiles")]
    UnknownAction {
        /// Action name.
        name: String,
        /// Profile type.
        profile_type: ProfileType,
    },

    /// Action is known but not allowed in profiles of the type.
    #[error("action `{action}` is not supported in {profile_type} profiles")]
    IncompatibleAction {
        /// Action kind.
        action: ActionKind,
        /// Profile type.
        profile_type: ProfileType,
    },

    /// Profile type does not match the family the profile is built for.
    #[error("{found} profile can not be used as {expected} profile")]
    IncompatibleProfileType {
        /// Expected profile type(s).
        expected: String,
        /// Actual profile type.
        found: ProfileType,
    },

    /// Wrong number of action parameters.
    #[error("action `{action}` expects {expected} parameters, {found} given")]
    WrongArity {
        /// Action kind.
        action: ActionKind,
        /// Expected parameter count.
        expected: usize,
        /// Given parameter count.
        found: usize,
    },

    /// Mandatory parameter is missing.
    #[error("action `{action}` requires parameter `{parameter}`")]
    MissingParameter {
        /// Action kind.
        action: ActionKind,
        /// Parameter name.
        parameter: &'static str,
    },

    /// Parameter value is not allowed.
    #[error("action `{action}` parameter `{parameter}`: {message}")]
    InvalidParameter {
        /// Action kind.
        action: ActionKind,
        /// Parameter name.
        parameter: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// Regular expression parameter does not compile.
    #[error("action `{action}` parameter `{parameter}` is not a valid regular expression")]
    InvalidRegex {
        /// Action kind.
        action: ActionKind,
        /// Parameter name.
        parameter: &'static str,
        /// The source of the error.
        source: regex::Error,
    },

    /// Condition or value expression does not compile.
    #[error("invalid expression `{expression}`: {source}")]
    Expression {
        /// Expression source.
        expression: String,
        /// The source of the error.
        source: SyntaxError,
    },

    /// Error in a rule of a profile.
    #[error("profile `{profile}` rule {rule}: {source}")]
    Rule {
        /// Profile name.
        profile: String,
        /// 1-based rule index.
        rule: usize,
        /// The source of the error.
        source: Box<ProfileDefinitionError>,
    },

    /// Profile definition can not be deserialized.
    #[error("profile definition deserialization error: {}", source)]
    Json {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },
}
