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

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::types::identity::Identity;

/// Entity (a user or a service principal) with its identities.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct Entity {
    /// Entity ID.
    pub id: String,

    /// Entity state.
    #[builder(default)]
    #[serde(default)]
    pub state: EntityState,

    /// Identities of the entity.
    #[builder(default)]
    #[serde(default)]
    pub identities: Vec<Identity>,
}

/// Entity state.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityState {
    #[default]
    Valid,
    Disabled,
    AuthenticationDisabled,
}

impl EntityState {
    pub const VALUES: &'static [&'static str] = &["valid", "disabled", "authenticationDisabled"];
}

/// Operation scheduled on an entity.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityScheduledOperation {
    /// Disable the entity.
    Disable,
    /// Remove the entity.
    Remove,
}

impl EntityScheduledOperation {
    pub const VALUES: &'static [&'static str] = &["DISABLE", "REMOVE"];
}

/// Scheduled change of an entity.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EntityChange {
    /// Operation to perform.
    pub operation: EntityScheduledOperation,
    /// When the operation should happen.
    pub scheduled_time: DateTime<Utc>,
}
