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
//! # Execution context
//!
//! The context is the immutable bag of named facts rule conditions and
//! action expressions are evaluated against. A fresh context is built for
//! every invocation from the invocation input by the family specific
//! builders in the submodules.
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub mod form;
pub mod input;
pub mod output;

/// Immutable name to value map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    variables: Map<String, Value>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Value of the variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Whether the variable is defined (possibly as `null`).
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variable names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Context content as JSON object.
    pub fn as_json(&self) -> Value {
        Value::Object(self.variables.clone())
    }
}

impl fmt::Display for Context {
    /// One `name = value` line per variable, sorted by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted: BTreeMap<_, _> = self.variables.iter().collect();
        for (idx, (name, value)) in sorted.into_iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}

/// Builder of the [`Context`].
#[derive(Clone, Debug, Default)]
pub struct ContextBuilder {
    variables: Map<String, Value>,
}

impl ContextBuilder {
    /// Set the variable, replacing a previous value.
    pub fn insert<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Context {
        Context {
            variables: self.variables,
        }
    }
}

/// Map of name to list of values preserving the first-seen order of names.
pub(crate) fn grouped<'a, I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut map = Map::new();
    for (key, value) in pairs {
        if let Value::Array(values) = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            values.push(Value::from(value));
        }
    }
    Value::Object(map)
}
