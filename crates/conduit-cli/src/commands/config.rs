use std::io::Write;
use std::path::{Path, PathBuf};

use conduit_core::api::normalize_base_url;
use conduit_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            name,
            api_base_url,
            session_dir,
            no_activate,
        } => {
            let path = default_config_path().map_err(CliError::Config)?;
            run_config_init(
                &path,
                name.as_deref().or(global_profile),
                api_base_url,
                session_dir,
                no_activate,
                out,
            )
        }
    }
}

pub fn run_config_init(
    path: &Path,
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    session_dir: Option<PathBuf>,
    no_activate: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load_from_path(path).map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let api_base_url = normalize_text_option(api_base_url)
        .map(|url| normalize_base_url(&url))
        .transpose()
        .map_err(|error| CliError::Config(error.to_string()))?;

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = api_base_url {
        profile.api_base_url = Some(url);
    }
    if let Some(dir) = session_dir {
        profile.data_dir = Some(dir);
    }
    let api_label = profile
        .api_base_url()
        .unwrap_or_else(|| "(default)".to_string());

    if !no_activate || config.active_profile.is_none() {
        config.active_profile = Some(profile_name.clone());
    }
    config.save_to_path(path).map_err(CliError::Config)?;

    writeln!(out, "Saved profile '{profile_name}' to {}", path.display())?;
    writeln!(out, "  api: {api_label}")?;
    if config.active_profile.as_deref() == Some(profile_name.as_str()) {
        writeln!(out, "  active: yes")?;
    }
    Ok(())
}
