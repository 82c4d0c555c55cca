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
//! # Identity store value types
//!
//! Types exchanged with the collaborators of the engine: the inputs of the
//! three profile families and the declarative profile definitions.
pub mod attribute;
pub mod entity;
pub mod form;
pub mod group;
pub mod identity;
pub mod input;
pub mod output;
pub mod profile;

pub use attribute::*;
pub use entity::*;
pub use form::*;
pub use group::*;
pub use identity::*;
pub use input::*;
pub use output::*;
pub use profile::*;
