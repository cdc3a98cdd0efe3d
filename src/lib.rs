// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::path::{Path, PathBuf};
use anyhow::{bail, Result};
use application::{DocumentSync, SyncReport};
use domain::SyncError;
use infrastructure::config::mask_token;
use infrastructure::{ConfigStore, DocBaseClient, Settings, TomlConfigStore};
use ports::NoticePresenter;
use tracing::{debug, error};
use crate::cli::args::{Args, Command, ConfigAction};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting docbase-sync with arguments");

    let store = TomlConfigStore::new(config_path(args.config.as_deref())?);
    let presenter = NoticePresenter::new();

    match args.command {
        Command::Pull { path } => {
            let result = load_settings(&store).and_then(|settings| pull_document(&settings, &path));
            report(&presenter, "pull", result)
        }
        Command::Push { path, create } => {
            let result = load_settings(&store)
                .and_then(|settings| push_document(&settings, &path, create));
            report(&presenter, "push", result)
        }
        Command::Config { action } => run_config(&store, action),
    }
}

/// Print the notice for a finished operation; failures become the error message
fn report(
    presenter: &NoticePresenter,
    action: &str,
    result: Result<SyncReport, SyncError>,
) -> Result<()> {
    match result {
        Ok(report) => {
            println!("{}", presenter.success(&report));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "{} failed", action);
            bail!(presenter.failure(action, &e))
        }
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            debug!(?path, "Using provided config path");
            Ok(path.to_path_buf())
        }
        None => Ok(TomlConfigStore::default_path()?),
    }
}

/// Load settings once per operation, with environment overrides applied
pub fn load_settings(store: &impl ConfigStore) -> Result<Settings, SyncError> {
    let settings = store.load()?.docbase.with_env_overrides();
    settings.validate()?;
    Ok(settings)
}

pub fn pull_document(settings: &Settings, path: &Path) -> Result<SyncReport, SyncError> {
    let client = DocBaseClient::new(settings)?;
    DocumentSync::new(client).pull(path)
}

pub fn push_document(settings: &Settings, path: &Path, create: bool) -> Result<SyncReport, SyncError> {
    let client = DocBaseClient::new(settings)?;
    DocumentSync::new(client).push(path, create)
}

fn run_config(store: &TomlConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = store.load()?.docbase;
            println!("config:       {}", store.path().display());
            println!("team_id:      {}", settings.team_id);
            println!("access_token: {}", mask_token(&settings.access_token));
            println!("base_url:     {}", settings.base_url);
            println!("timeout_secs: {}", settings.timeout_secs);
            Ok(())
        }
        ConfigAction::Set {
            token,
            team,
            base_url,
            timeout_secs,
        } => {
            if token.is_none() && team.is_none() && base_url.is_none() && timeout_secs.is_none() {
                bail!("Nothing to set. Pass --token, --team, --base-url or --timeout-secs.");
            }
            let mut config = store.load()?;
            apply_settings(&mut config.docbase, token, team, base_url, timeout_secs)?;
            store.save(&config)?;
            println!("Settings saved to {}.", store.path().display());
            Ok(())
        }
    }
}

pub fn apply_settings(
    settings: &mut Settings,
    token: Option<String>,
    team: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<(), SyncError> {
    if let Some(token) = token {
        settings.access_token = token.trim().to_string();
    }
    if let Some(team) = team {
        settings.team_id = team.trim().to_string();
    }
    if let Some(base_url) = base_url {
        settings.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(timeout_secs) = timeout_secs {
        if timeout_secs == 0 {
            return Err(SyncError::Config("timeout must be at least one second".to_string()));
        }
        settings.timeout_secs = timeout_secs;
    }
    Ok(())
}
