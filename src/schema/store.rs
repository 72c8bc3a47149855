use std::{fs, path::Path};
use tracing::info;

use super::types::{DatasetProfile, MissingPolicy};
use crate::clean::default_value;
use crate::error::ConfigError;
use crate::validate::Rule;

/// Load dataset profiles from a YAML list, replacing the built-in ones.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<DatasetProfile>, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let profiles = parse_profiles(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    for p in &profiles {
        check_profile(p)?;
    }
    info!(path = %path.display(), count = profiles.len(), "loaded profiles");
    Ok(profiles)
}

pub fn parse_profiles(yaml: &str) -> Result<Vec<DatasetProfile>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Reject profiles that would silently do nothing useful.
pub fn check_profile(profile: &DatasetProfile) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        profile: profile.name.clone(),
        message,
    };

    if profile.input_file.trim().is_empty() {
        return Err(invalid("input_file is empty".into()));
    }
    if let Some(c) = profile.read.delimiter {
        if !c.is_ascii() {
            return Err(invalid(format!("delimiter {:?} is not ASCII", c)));
        }
    }
    for policy in &profile.missing {
        if let MissingPolicy::FillDefault { column, value } = policy {
            if default_value(profile, column, value).is_none() {
                return Err(invalid(format!(
                    "default {:?} does not fit column `{}`",
                    value, column
                )));
            }
        }
    }
    for rule in &profile.rules {
        if let Rule::MaxIncompleteRatio { ratio } = rule {
            if !(0.0..=1.0).contains(ratio) {
                return Err(invalid(format!("ratio {} outside [0, 1]", ratio)));
            }
        }
    }
    Ok(())
}
