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
//! Translation profile tool.
//!
//! Entry point of the `keystone-tprofile` binary used to inspect the action
//! catalogue, validate profile definitions and dry run profiles against
//! sample data.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result};
use eyre::{WrapErr, eyre};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_keystone_translation::config::Config;
use openstack_keystone_translation::engine::TranslationEngine;
use openstack_keystone_translation::types::{
    ConfirmedElement, Form, FormRequest, ProfileType, RegistrationContext,
    RemotelyAuthenticatedInput, RequestSubmitStatus, TranslationInput,
    TranslationProfileDefinition,
};

/// Keystone translation profile tool.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the keystone config file.
    #[arg(short, long, default_value = "/etc/keystone/keystone.conf")]
    config: PathBuf,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the actions available to a profile type with their parameters.
    Actions {
        #[arg(short = 't', long = "type", value_enum)]
        profile_type: ProfileTypeArg,
    },

    /// Validate profile definitions.
    Validate {
        /// Profile definition files (json).
        #[arg(required = true)]
        profiles: Vec<PathBuf>,
    },

    /// Run an input profile against a remote login.
    Input {
        #[command(flatten)]
        profiles: ProfileOpts,

        /// Remote login data (json).
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Run an output profile against released entity data.
    Output {
        #[command(flatten)]
        profiles: ProfileOpts,

        /// Released entity data (json).
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Run a registration or enquiry profile against a request.
    Form {
        #[command(flatten)]
        profiles: ProfileOpts,

        /// Form definition (json).
        #[arg(long)]
        form: PathBuf,

        /// Submitted request (json). Not needed for `cancel-redirect`.
        #[arg(long)]
        request: Option<PathBuf>,

        /// Submission circumstances (json).
        #[arg(long)]
        registration: Option<PathBuf>,

        /// Confirmed element (json), used by `confirmation-redirect`.
        #[arg(long)]
        confirmed: Option<PathBuf>,

        /// Request status for `auto-action`.
        #[arg(long, value_enum, default_value_t = StatusArg::Submitted)]
        status: StatusArg,

        #[arg(long, value_enum, default_value_t = FormQuery::Translate)]
        query: FormQuery,
    },
}

#[derive(Debug, clap::Args)]
struct ProfileOpts {
    /// Profile definition files (json), all are deployed so that included
    /// profiles can be resolved.
    #[arg(short, long = "profile", required = true)]
    profiles: Vec<PathBuf>,

    /// Name of the profile to run. Defaults to the first given profile.
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum ProfileTypeArg {
    Input,
    Output,
    Registration,
    Enquiry,
}

impl From<ProfileTypeArg> for ProfileType {
    fn from(value: ProfileTypeArg) -> Self {
        match value {
            ProfileTypeArg::Input => Self::Input,
            ProfileTypeArg::Output => Self::Output,
            ProfileTypeArg::Registration => Self::Registration,
            ProfileTypeArg::Enquiry => Self::Enquiry,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum StatusArg {
    Submitted,
    NotSubmitted,
}

impl From<StatusArg> for RequestSubmitStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Submitted => Self::Submitted,
            StatusArg::NotSubmitted => Self::NotSubmitted,
        }
    }
}

/// What to ask a form profile.
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum FormQuery {
    /// Translate the submitted request.
    Translate,
    /// Automatic processing action.
    AutoAction,
    SubmitRedirect,
    CancelRedirect,
    ConfirmationRedirect,
    SubmitMessage,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Report> {
    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Report> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Deploy all given profiles and return the type and name of the one to run.
fn deploy(
    engine: &TranslationEngine,
    opts: &ProfileOpts,
) -> Result<(ProfileType, String), Report> {
    let mut selected: Option<(ProfileType, String)> = None;
    for path in &opts.profiles {
        let definition: TranslationProfileDefinition = read_json(path)?;
        engine
            .deploy(&definition)
            .wrap_err_with(|| format!("deploying {}", path.display()))?;
        debug!(profile = %definition.name, path = %path.display(), "profile deployed");
        let matches = opts.name.as_ref().is_none_or(|name| *name == definition.name);
        if selected.is_none() && matches {
            selected = Some((definition.profile_type, definition.name));
        }
    }
    selected.ok_or_else(|| eyre!("profile {:?} is not among the given files", opts.name))
}

fn expect_type(actual: ProfileType, expected: &[ProfileType]) -> Result<(), Report> {
    if expected.contains(&actual) {
        Ok(())
    } else {
        Err(eyre!("{actual} profile can't be used here"))
    }
}

/// Default log level from the `-v` count, raised to debug by `[DEFAULT] debug`.
fn log_level(verbose: u8, debug: bool) -> LevelFilter {
    match (verbose, debug) {
        (0, false) => LevelFilter::WARN,
        (1, false) => LevelFilter::INFO,
        (0..=2, _) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let cfg = Config::new(args.config.clone())?;
    let debug = cfg.default.as_ref().and_then(|d| d.debug).unwrap_or(false);
    let filter = Targets::new().with_default(log_level(args.verbose, debug));

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(log_layer).init();

    let engine = TranslationEngine::new(cfg);

    match args.command {
        Command::Actions { profile_type } => match ProfileType::from(profile_type) {
            ProfileType::Input => print_json(&engine.input_actions().factories())?,
            ProfileType::Output => print_json(&engine.output_actions().factories())?,
            ProfileType::Registration | ProfileType::Enquiry => {
                print_json(&engine.form_actions().factories())?
            }
        },
        Command::Validate { profiles } => {
            for path in &profiles {
                let definition: TranslationProfileDefinition = read_json(path)?;
                engine
                    .deploy(&definition)
                    .wrap_err_with(|| format!("validating {}", path.display()))?;
                info!(profile = %definition.name, "profile is valid");
                println!(
                    "{}: {} profile `{}` is valid",
                    path.display(),
                    definition.profile_type,
                    definition.name
                );
            }
        }
        Command::Input { profiles, data } => {
            let (profile_type, name) = deploy(&engine, &profiles)?;
            expect_type(profile_type, &[ProfileType::Input])?;
            let input: RemotelyAuthenticatedInput = read_json(&data)?;
            print_json(&engine.translate_input(&name, &input)?)?;
        }
        Command::Output { profiles, data } => {
            let (profile_type, name) = deploy(&engine, &profiles)?;
            expect_type(profile_type, &[ProfileType::Output])?;
            let input: TranslationInput = read_json(&data)?;
            print_json(&engine.translate_output(&name, &input)?)?;
        }
        Command::Form {
            profiles,
            form,
            request,
            registration,
            confirmed,
            status,
            query,
        } => {
            let (profile_type, name) = deploy(&engine, &profiles)?;
            expect_type(profile_type, &[ProfileType::Registration, ProfileType::Enquiry])?;
            let form: Form = read_json(&form)?;
            let registration: RegistrationContext = match registration {
                Some(path) => read_json(&path)?,
                None => RegistrationContext::default(),
            };
            if query == FormQuery::CancelRedirect {
                print_json(&engine.post_cancel_redirect_url(
                    profile_type,
                    &name,
                    &form,
                    &registration,
                )?)?;
                return Ok(());
            }
            let request: FormRequest = read_json(
                request
                    .as_deref()
                    .ok_or_else(|| eyre!("--request is required for {query:?}"))?,
            )?;
            match query {
                FormQuery::Translate => print_json(&engine.translate_form_request(
                    profile_type,
                    &name,
                    &form,
                    &request,
                    &registration,
                )?)?,
                FormQuery::AutoAction => print_json(&engine.auto_process_action(
                    profile_type,
                    &name,
                    &form,
                    &request,
                    &registration,
                    status.into(),
                )?)?,
                FormQuery::SubmitRedirect => print_json(&engine.post_submit_redirect_url(
                    profile_type,
                    &name,
                    &form,
                    &request,
                    &registration,
                )?)?,
                FormQuery::ConfirmationRedirect => {
                    let confirmed: ConfirmedElement = read_json(
                        confirmed
                            .as_deref()
                            .ok_or_else(|| eyre!("--confirmed is required for {query:?}"))?,
                    )?;
                    print_json(&engine.post_confirmation_redirect_url(
                        profile_type,
                        &name,
                        &form,
                        &request,
                        &registration,
                        &confirmed,
                    )?)?
                }
                FormQuery::SubmitMessage => print_json(&engine.post_submit_message(
                    profile_type,
                    &name,
                    &form,
                    &request,
                    &registration,
                )?)?,
                FormQuery::CancelRedirect => {}
            }
        }
    }
    Ok(())
}
