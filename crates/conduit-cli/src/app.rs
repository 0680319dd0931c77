//! Application root: resolves settings and owns the store, client and storage.

use std::env;
use std::path::PathBuf;

use conduit_core::api::{ConduitApi, HttpTransport, Transport, DEFAULT_API_BASE_URL};
use conduit_core::persist::{self, FileStorage, KeyValueStorage, PersistenceBridge};
use conduit_core::util::normalize_text_option;
use conduit_core::{AuthUser, RootState, Store};

use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub const API_URL_ENV: &str = "CONDUIT_API_URL";
pub const DATA_DIR_ENV: &str = "CONDUIT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Flags win over the environment, which wins over the active profile.
    pub fn resolve(
        api_url: Option<String>,
        data_dir: Option<PathBuf>,
        profile: Option<&str>,
    ) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(profile);
        let profile = config.profile(&profile_name);
        tracing::debug!("Using profile '{}'", profile_name);

        let api_url = resolve_api_url(
            api_url,
            env::var(API_URL_ENV).ok(),
            profile.and_then(|profile| profile.api_base_url()),
        );
        let data_dir = data_dir
            .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .or_else(|| profile.and_then(|profile| profile.data_dir.clone()))
            .map_or_else(default_data_dir, Ok)?;

        Ok(Self { api_url, data_dir })
    }
}

pub fn resolve_api_url(
    explicit: Option<String>,
    from_env: Option<String>,
    from_profile: Option<String>,
) -> String {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(from_env))
        .or(from_profile)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn default_data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("conduit"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

/// Store, API client and storage for one CLI invocation.
pub struct App<S: KeyValueStorage, T: Transport> {
    pub store: Store,
    pub api: ConduitApi<T>,
    pub storage: S,
}

impl App<FileStorage, HttpTransport> {
    pub fn open(settings: &Settings) -> Result<Self, CliError> {
        let storage = FileStorage::open(&settings.data_dir)?;
        let api = ConduitApi::new(&settings.api_url)?;
        Ok(Self::new(api, storage))
    }
}

impl<S: KeyValueStorage, T: Transport> App<S, T> {
    /// Rehydrate the persisted session and mirror every change back into it.
    pub fn new(api: ConduitApi<T>, storage: S) -> Self {
        let initial = persist::load_state(&storage).unwrap_or_default();
        let store = Store::new(initial).subscribe(PersistenceBridge::new(storage.clone()));
        Self {
            store,
            api,
            storage,
        }
    }

    pub const fn state(&self) -> &RootState {
        self.store.state()
    }

    /// Token of the signed-in user, falling back to the mirrored raw token.
    pub fn token(&self) -> Option<String> {
        self.state()
            .token()
            .map(ToString::to_string)
            .or_else(|| persist::load_token(&self.storage))
    }

    pub fn require_user(&self) -> Result<&AuthUser, CliError> {
        let user = &self.state().user;
        if !user.is_authenticated() {
            return Err(CliError::NotSignedIn);
        }
        user.user.as_ref().ok_or(CliError::NotSignedIn)
    }

    pub fn articles_error(&self) -> CliError {
        request_error(self.state().articles.error.as_deref())
    }

    pub fn user_error(&self) -> CliError {
        request_error(self.state().user.error.as_deref())
    }
}

fn request_error(message: Option<&str>) -> CliError {
    CliError::Request(message.unwrap_or("unknown error").to_string())
}
