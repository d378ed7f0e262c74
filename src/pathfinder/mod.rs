use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    themes::ThemeConfig,
    VcThemeResult,
};

/// Vencord's theme folder inside the user's profile.
///
/// `%APPDATA%/Vencord/themes` on Windows, `$XDG_CONFIG_HOME/Vencord/themes` or
/// `$HOME/.config/Vencord/themes` elsewhere. Falls back to `./themes` when none of these
/// variables is set.
pub fn default_themes_dir() -> PathBuf {
    themes_dir_from(
        std::env::var_os("APPDATA").map(PathBuf::from),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn themes_dir_from(
    appdata: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    let config_dir = appdata
        .or(xdg_config_home)
        .or_else(|| home.map(|home| home.join(".config")));

    match config_dir {
        Some(config_dir) => config_dir.join("Vencord").join("themes"),
        None => {
            warn!("No profile directory found, looking for themes in `./themes`");

            PathBuf::from("themes")
        }
    }
}

/// Finds the theme's CSS file inside `themes_dir`.
///
/// Candidates are the `*.css` files whose name carries the theme name or alias; the first
/// one in name order wins.
pub async fn discover_theme_file(themes_dir: &Path, theme: &ThemeConfig) -> VcThemeResult<PathBuf> {
    let mut entries = tokio::fs::read_dir(themes_dir).await.map_err(|err| {
        VcThemeError::raise_general_runtime_error(
            ErrorKind::ThemesDirReadFailed,
            &format!("Could not read the themes folder {:?}: {}", themes_dir, err),
            ErrorAction::Fix,
        )
    })?;

    let mut candidates = vec![];

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_css = path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("css"))
                    .unwrap_or(false);

                if is_css && theme.is_matching_file_name(&path) {
                    candidates.push(path);
                }
            }
            Ok(None) => break,
            Err(err) => {
                return Err(VcThemeError::raise_general_runtime_error(
                    ErrorKind::ThemesDirReadFailed,
                    &format!("Could not read the themes folder {:?}: {}", themes_dir, err),
                    ErrorAction::Fix,
                ));
            }
        }
    }

    candidates.sort();
    debug!("Theme file candidates for `{}`: {:?}", theme.get_display_name(), candidates);

    match candidates.into_iter().next() {
        Some(path) => {
            info!("Using theme file {:?}", path);

            Ok(path)
        }
        None => Err(VcThemeError::raise_general_runtime_error(
            ErrorKind::ThemeFileNotFound,
            &format!(
                "No CSS file for the {} theme was found in {:?}. Pass the file path explicitly.",
                theme.get_display_name(),
                themes_dir
            ),
            ErrorAction::Fix,
        )),
    }
}
