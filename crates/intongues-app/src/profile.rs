use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use intongues_config::Config;
use serde::{Deserialize, Serialize};

/// Platform data folder, `~/.local/share/intongues` on Linux
pub fn app_root() -> anyhow::Result<PathBuf> {
    let base = dirs::data_local_dir().context("No local data directory on this platform")?;
    Ok(base.join("intongues"))
}

fn profiles_dir(root: &Path) -> PathBuf {
    root.join("profiles")
}

/// Path of a named profile. Names are plain file stems, so separators and
/// dot names are rejected.
pub fn profile_path(root: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', ':'])
        || name.chars().any(char::is_control);
    if invalid {
        anyhow::bail!("Invalid profile name '{name}'");
    }
    Ok(profiles_dir(root).join(format!("{name}.json")))
}

/// Default location of the JSON document store
pub fn data_dir(root: &Path) -> PathBuf {
    root.join("data")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Initialize the profiles folder and the main profile if missing.
/// Returns the main profile path when it was just created.
pub fn init_user_config(root: &Path) -> anyhow::Result<Option<PathBuf>> {
    let dir = profiles_dir(root);
    fs::create_dir_all(&dir).with_context(|| format!("Creating {}", dir.display()))?;

    let main_profile = dir.join("main.json");
    if main_profile.exists() {
        return Ok(None);
    }

    write_profile(&main_profile, "main", Config::default())?;
    Ok(Some(main_profile))
}

fn write_profile(path: &Path, name: &str, config: Config) -> anyhow::Result<()> {
    let profile = Profile {
        name: name.into(),
        value: config,
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("Writing profile {}", path.display()))?;
    Ok(())
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let profile: Profile =
        serde_json::from_str(&data).with_context(|| format!("Parsing profile {}", path.display()))?;
    Ok(profile.value)
}

fn load_stored_profile(root: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profile_path(root, name)?;
    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile");
    let main_file = profile_path(root, "main")?;
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::new())
    }
}

/// Load a profile by name, falling back to main and then to defaults.
/// Environment overrides are applied last.
pub fn load_user_profile(root: &Path, name: &str) -> anyhow::Result<Config> {
    Ok(load_stored_profile(root, name)?.with_env_overrides())
}

/// Add a new profile cloned from main
pub fn add_profile_from_default(root: &Path, new_name: &str) -> anyhow::Result<PathBuf> {
    let base = load_stored_profile(root, "main")?;
    let file = profile_path(root, new_name)?;
    write_profile(&file, new_name, base)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_creates_main_profile() {
        let root = tempfile::tempdir().unwrap();
        let created = init_user_config(root.path()).unwrap();

        let main = root.path().join("profiles").join("main.json");
        assert_eq!(created.as_deref(), Some(main.as_path()));
        assert!(main.exists());
        assert!(init_user_config(root.path()).unwrap().is_none());

        let profile: Profile = serde_json::from_str(&fs::read_to_string(main).unwrap()).unwrap();
        assert_eq!(profile.name, "main");
        assert_eq!(profile.value.review.default_deck, "core:any");
    }

    #[test]
    fn missing_profile_falls_back_to_main() {
        let root = tempfile::tempdir().unwrap();
        init_user_config(root.path()).unwrap();

        let main = root.path().join("profiles").join("main.json");
        let mut config = Config::default();
        config.srs.history_limit = 7;
        write_profile(&main, "main", config).unwrap();

        let loaded = load_user_profile(root.path(), "work").unwrap();
        assert_eq!(loaded.srs.history_limit, 7);

        let added = add_profile_from_default(root.path(), "work").unwrap();
        assert!(added.ends_with("profiles/work.json"));
        assert_eq!(load_user_profile(root.path(), "work").unwrap().srs.history_limit, 7);
    }

    #[test]
    fn profile_names_stay_inside_profiles_dir() {
        let root = tempfile::tempdir().unwrap();
        init_user_config(root.path()).unwrap();

        for name in ["../../x", "a/b", "a\\b", "..", ".hidden", ""] {
            assert!(profile_path(root.path(), name).is_err(), "{name:?} accepted");
            assert!(add_profile_from_default(root.path(), name).is_err());
        }
        assert!(!root.path().join("x.json").exists());

        let path = profile_path(root.path(), "work-2").unwrap();
        assert_eq!(path, root.path().join("profiles").join("work-2.json"));
    }
}
