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

//! # Keystone translation profiles
//!
//! Federated and self-service identity flows never hand the incoming data
//! directly to the identity store. Every remote login, every attribute
//! release towards a relying party and every registration or enquiry request
//! passes through a *translation profile*: an ordered list of rules, each one
//! a boolean condition written in a small expression language and a typed
//! action that contributes facts to a result object.
//!
//! The crate provides:
//!
//! - the embedded expression language ([expression]) behind a narrow
//!   [Evaluator](expression::Evaluator) trait,
//!
//! - the closed catalogue of actions per profile family ([action]) together
//!   with the registry validating their parameters when a profile is
//!   deployed,
//!
//! - immutable compiled profiles and the registry holding the currently
//!   deployed version of every profile ([profile]),
//!
//! - the builders of the per invocation fact bags ([context]) and the
//!   accumulators receiving the outcome ([result]),
//!
//! - the executor and the [TranslationEngine](engine::TranslationEngine)
//!   facade ([engine]).
//!
//! Profiles, rules and actions are immutable once built and are shared across
//! any number of concurrent invocations. Every invocation works on its own
//! context and its own result object, so no locking happens while rules are
//! evaluated.

pub mod action;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod expression;
pub mod profile;
pub mod result;
pub mod types;

#[cfg(test)]
mod tests;
