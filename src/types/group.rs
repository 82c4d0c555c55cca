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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Group membership reported by the remote identity provider.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct RemoteGroupMembership {
    /// Group name as named by the remote side.
    pub group: String,
}

/// Effect of a mapped group membership on the local store.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupEffectMode {
    /// Fail when the group does not exist.
    RequireExistingGroup,
    /// Add the membership only when the group exists.
    #[default]
    AddIfGroupExists,
    /// Create the group when it is missing.
    CreateGroupIfMissing,
}

impl GroupEffectMode {
    pub const VALUES: &'static [&'static str] = &[
        "REQUIRE_EXISTING_GROUP",
        "ADD_IF_GROUP_EXISTS",
        "CREATE_GROUP_IF_MISSING",
    ];
}

/// Whether `path` is a group strictly below `parent`.
///
/// Group paths are slash separated with `/` being the root group.
pub fn is_child_group(path: &str, parent: &str) -> bool {
    if path == parent {
        return false;
    }
    if parent == "/" {
        return path.starts_with('/');
    }
    path.strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

/// Parent of a group path, `None` for the root group.
pub fn parent_group(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.trim_end_matches('/').rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_child_group() {
        assert!(is_child_group("/a", "/"));
        assert!(is_child_group("/a/b", "/a"));
        assert!(is_child_group("/a/b/c", "/a"));
        assert!(!is_child_group("/a", "/a"));
        assert!(!is_child_group("/ab", "/a"));
        assert!(!is_child_group("/", "/"));
        assert!(!is_child_group("/b", "/a"));
    }

    #[test]
    fn test_parent_group() {
        assert_eq!(None, parent_group("/"));
        assert_eq!(Some("/"), parent_group("/a"));
        assert_eq!(Some("/a"), parent_group("/a/b"));
        assert_eq!(Some("/a/b"), parent_group("/a/b/c"));
        assert_eq!(None, parent_group("a"));
    }
}
