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

use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options
    #[serde(rename = "DEFAULT")]
    pub default: Option<DefaultSection>,

    /// Translation engine
    #[serde(default)]
    pub translation: TranslationSection,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DefaultSection {
    /// Debug logging
    pub debug: Option<bool>,
}

/// Translation engine configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct TranslationSection {
    /// How deep `includeProfile` actions may nest before the invocation is
    /// aborted.
    #[serde(default = "default_max_include_depth")]
    pub max_include_depth: usize,

    /// Propagate errors of side channel extractions (automatic processing,
    /// redirects, post submit message) instead of logging them and
    /// reporting no value.
    #[serde(default)]
    pub strict_side_channels: bool,

    /// Trace the complete context of every invocation.
    #[serde(default)]
    pub dump_context: bool,
}

impl Default for TranslationSection {
    fn default() -> Self {
        Self {
            max_include_depth: default_max_include_depth(),
            strict_side_channels: false,
            dump_context: false,
        }
    }
}

fn default_max_include_depth() -> usize {
    8
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder
            .set_default("translation.max_include_depth", "8")?
            .set_default("translation.strict_side_channels", "false")?
            .set_default("translation.dump_context", "false")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
