use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

/// How the lines of a theme file are grouped while scanning for backdrops.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub enum SectionLayout {
    /// Every line belongs to the same, unnamed section.
    Flat,
    /// `.theme-dark` and `.theme-light` markers open dark and light sections.
    DarkLight,
}

/// Which lines compete with each other when a backdrop is activated.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub enum ActivationScope {
    /// The whole file is one scope; section markers are ignored.
    Global,
    /// Each section keeps its own active backdrop.
    PerSection,
}

fn flat_by_default() -> SectionLayout {
    SectionLayout::Flat
}

fn global_by_default() -> ActivationScope {
    ActivationScope::Global
}

/// Static description of a supported theme: its names and the CSS custom property
/// that declares its backdrops.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ThemeConfig {
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(rename = "fileAlias")]
    file_alias: String,
    #[serde(rename = "backdropProperty")]
    backdrop_property: String,
    #[serde(rename = "sections", default = "flat_by_default")]
    section_layout: SectionLayout,
    #[serde(rename = "activationScope", default = "global_by_default")]
    activation_scope: ActivationScope,
}

impl ThemeConfig {
    pub fn new(
        display_name: &str,
        file_alias: &str,
        backdrop_property: &str,
        section_layout: SectionLayout,
        activation_scope: ActivationScope,
    ) -> Self {
        Self {
            display_name: display_name.to_string(),
            file_alias: file_alias.to_string(),
            backdrop_property: backdrop_property.to_string(),
            section_layout,
            activation_scope,
        }
    }

    pub fn get_display_name(&self) -> &str {
        &self.display_name
    }

    pub fn get_file_alias(&self) -> &str {
        &self.file_alias
    }

    pub fn get_backdrop_property(&self) -> &str {
        &self.backdrop_property
    }

    pub fn get_section_layout(&self) -> SectionLayout {
        self.section_layout
    }

    pub fn get_activation_scope(&self) -> ActivationScope {
        self.activation_scope
    }

    /// True when `name` is this theme's display name or file alias, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();

        name == self.display_name.to_lowercase() || name == self.file_alias.to_lowercase()
    }

    /// Checks whether a CSS file name carries this theme's display name or alias.
    ///
    /// Vencord theme files are named after the theme (`DiscordPlus.theme.css`), so a file
    /// that mentions neither name is most likely the wrong one.
    pub fn is_matching_file_name(&self, file_path: &Path) -> bool {
        let file_name = match file_path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return false,
        };

        file_name.contains(&self.display_name.to_lowercase())
            || file_name.contains(&self.file_alias.to_lowercase())
    }

    /// The commented declaration used when a backdrop is added to the file.
    pub fn commented_declaration(&self, url: &str) -> String {
        format!("/*{}: url({});*/", self.backdrop_property, url)
    }
}

/// The themes VCTheme knows without any configuration.
pub fn builtin_themes() -> Vec<ThemeConfig> {
    vec![
        ThemeConfig::new(
            "Discord+",
            "DiscordPlus",
            "--dplus-backdrop",
            SectionLayout::DarkLight,
            ActivationScope::PerSection,
        ),
        ThemeConfig::new(
            "SoftX",
            "SoftX",
            "--background-image",
            SectionLayout::Flat,
            ActivationScope::Global,
        ),
        ThemeConfig::new(
            "ClearVision",
            "ClearVision",
            "--background-image",
            SectionLayout::Flat,
            ActivationScope::Global,
        ),
    ]
}

/// Merges configured themes over the built-in table.
///
/// A configured theme whose display name matches a built-in one replaces it in place,
/// any other configured theme is appended.
pub fn resolve_themes(configured: &[ThemeConfig]) -> Vec<ThemeConfig> {
    let mut themes = builtin_themes();

    for theme in configured {
        match themes
            .iter_mut()
            .find(|builtin| builtin.matches_name(&theme.display_name))
        {
            Some(builtin) => {
                info!("Overriding built-in theme `{}`", theme.display_name);

                *builtin = theme.clone();
            }
            None => {
                info!("Registering configured theme `{}`", theme.display_name);

                themes.push(theme.clone());
            }
        }
    }

    debug!("Resolved {} themes", themes.len());

    themes
}

/// Looks a theme up by display name or file alias.
pub fn find_theme(themes: &[ThemeConfig], name: &str) -> VcThemeResult<ThemeConfig> {
    themes
        .iter()
        .find(|theme| theme.matches_name(name))
        .cloned()
        .ok_or_else(|| {
            let available = themes
                .iter()
                .map(|theme| theme.display_name.clone())
                .collect::<Vec<_>>()
                .join(", ");

            VcThemeError::raise_general_runtime_error(
                ErrorKind::UnknownTheme,
                &format!("Unknown theme `{}`. Available themes: {}", name, available),
                ErrorAction::Fix,
            )
        })
}
