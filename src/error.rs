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
//! # Error
//!
//! Errors reported by the translation engine facade.
use thiserror::Error;

use crate::engine::error::TranslationError;
use crate::profile::error::ProfileDefinitionError;
use crate::types::ProfileType;

/// Translation engine error.
#[derive(Debug, Error)]
pub enum TranslationEngineError {
    #[error(transparent)]
    ProfileDefinition {
        #[from]
        source: ProfileDefinitionError,
    },

    #[error(transparent)]
    Translation {
        #[from]
        source: TranslationError,
    },

    /// No profile of the type is deployed under the name.
    #[error("{profile_type} profile `{name}` is not deployed")]
    ProfileNotFound {
        /// Profile type.
        profile_type: ProfileType,
        /// Profile name.
        name: String,
    },

    #[error(transparent)]
    IO {
        #[from]
        source: std::io::Error,
    },

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    JsonError {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },
}
