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
//! # Translation results
//!
//! Per invocation accumulators the actions write into. They are handed over
//! to the caller (and serialized for external collaborators) once the
//! profile finished.
use crate::types::{Attribute, Identity};

pub mod mapping;
pub mod release;
pub mod request;

pub use mapping::*;
pub use release::*;
pub use request::*;

/// Identity and attribute collections the filtering actions operate on.
pub trait FilterTarget {
    /// Keep only the identities matching the predicate, return the number of
    /// removed entries.
    fn retain_identities<F: FnMut(&Identity) -> bool>(&mut self, keep: F) -> usize;

    /// Keep only the attributes matching the predicate, return the number of
    /// removed entries.
    fn retain_attributes<F: FnMut(&Attribute) -> bool>(&mut self, keep: F) -> usize;

    /// Attribute with the given name.
    fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute>;
}

/// Retain helper returning the number of removed elements.
pub(crate) fn retain_counting<T, F: FnMut(&T) -> bool>(items: &mut Vec<T>, keep: F) -> usize {
    let before = items.len();
    items.retain(keep);
    before - items.len()
}
