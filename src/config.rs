// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pennywise", "pennywise"));

pub const DATA_DIR_ENV: &str = "PENNYWISE_DATA_DIR";
pub const LOG_ENV: &str = "PENNYWISE_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "pennywise=debug,info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolves settings from CLI flags, then environment, then defaults.
    pub fn resolve(data_dir_flag: Option<&str>, verbose: bool) -> Result<Self> {
        let data_dir = match data_dir_flag
            .map(str::to_string)
            .or_else(|| env::var(DATA_DIR_ENV).ok())
            .filter(|s| !s.trim().is_empty())
        {
            Some(dir) => PathBuf::from(dir.trim()),
            None => default_data_dir()?,
        };
        let log_filter = if verbose {
            VERBOSE_LOG_FILTER.to_string()
        } else {
            env::var(LOG_ENV)
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
        };
        Ok(Self {
            data_dir,
            log_filter,
        })
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}
