use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    backdropper::{sections::SectionTarget, validate_backdrop_url, BackdropEntry, Backdropper, DeletedBackdrop},
    cssdoc::CssDocument,
    error::{ErrorAction, ErrorKind, VcThemeError},
    themes::{ActivationScope, ThemeConfig},
    VcThemeResult,
};

/// Where the session stands in the backdrop lifecycle.
#[derive(Clone, PartialEq, Debug)]
pub enum SessionState {
    NoFileLoaded,
    FileLoaded,
    BackdropActive(String),
}

/// What opening a theme file produced.
#[derive(Clone, PartialEq, Debug)]
pub struct OpenedThemeFile {
    pub path: PathBuf,
    pub entries: Vec<BackdropEntry>,
    /// False when the file name mentions neither the theme name nor its alias.
    pub name_matches_theme: bool,
}

/// What a deletion changed besides removing the backdrop.
#[derive(Clone, PartialEq, Debug)]
pub struct DeletionOutcome {
    /// Backdrops activated in place of the deleted one, in section order.
    pub replacements: Vec<String>,
    /// Set when the deletion was saved but no replacement could be activated.
    pub activation_warning: Option<VcThemeError>,
}

/// What a restore put back.
#[derive(Clone, PartialEq, Debug)]
pub struct RestorationOutcome {
    pub url: String,
    /// Set when the lines were restored but the backdrop could not be activated again.
    pub activation_warning: Option<VcThemeError>,
}

/// Editing session over one theme file.
///
/// Every operation reloads the file, rewrites it and saves it again; the session itself only
/// remembers which file is loaded, the backdrop the user selected and the last deletion.
#[derive(Clone, PartialEq, Debug)]
pub struct BackdropSession {
    backdropper: Backdropper,
    css_file_path: Option<PathBuf>,
    active_backdrop: Option<String>,
    last_deleted: Option<DeletedBackdrop>,
    section_target: SectionTarget,
}

impl BackdropSession {
    pub fn new(theme: ThemeConfig) -> Self {
        Self {
            backdropper: Backdropper::new(theme),
            css_file_path: None,
            active_backdrop: None,
            last_deleted: None,
            section_target: SectionTarget::All,
        }
    }

    pub fn get_theme(&self) -> &ThemeConfig {
        self.backdropper.get_theme()
    }

    pub fn get_css_file_path(&self) -> Option<&Path> {
        self.css_file_path.as_deref()
    }

    pub fn get_active_backdrop(&self) -> Option<&str> {
        self.active_backdrop.as_deref()
    }

    pub fn get_last_deleted(&self) -> Option<&DeletedBackdrop> {
        self.last_deleted.as_ref()
    }

    pub fn get_section_target(&self) -> SectionTarget {
        self.section_target
    }

    pub fn state(&self) -> SessionState {
        match (&self.css_file_path, &self.active_backdrop) {
            (None, _) => SessionState::NoFileLoaded,
            (Some(_), None) => SessionState::FileLoaded,
            (Some(_), Some(url)) => SessionState::BackdropActive(url.clone()),
        }
    }

    /// Rotates the sections a selection applies to. Themes whose activation ignores
    /// sections always stay on `SectionTarget::All`.
    pub fn cycle_section_target(&mut self) -> SectionTarget {
        if self.get_theme().get_activation_scope() == ActivationScope::PerSection {
            self.section_target = self.section_target.cycle();
        }

        self.section_target
    }

    /// Loads a theme file and makes it the session's file.
    ///
    /// Selecting a new file forgets the previous selection and the restore buffer.
    pub async fn open_file(&mut self, path: &Path) -> VcThemeResult<OpenedThemeFile> {
        let document = CssDocument::load(path).await?;
        let entries = self.backdropper.extract_entries(document.get_lines());
        let name_matches_theme = self.get_theme().is_matching_file_name(path);

        if !name_matches_theme {
            warn!(
                "The file {:?} does not match the expected theme `{}`",
                path,
                self.get_theme().get_file_alias()
            );
        }

        info!("Loaded {} backdrops from {:?}", entries.len(), path);

        self.css_file_path = Some(path.to_path_buf());
        self.active_backdrop = None;
        self.last_deleted = None;

        Ok(OpenedThemeFile {
            path: path.to_path_buf(),
            entries,
            name_matches_theme,
        })
    }

    /// Current backdrops of the loaded file, read fresh from disk.
    pub async fn backdrops(&self) -> VcThemeResult<Vec<BackdropEntry>> {
        let document = self.load_document().await?;

        Ok(self.backdropper.extract_entries(document.get_lines()))
    }

    /// Same as `backdrops`, for reads triggered by an outside modification of the file.
    pub async fn reload_backdrops(&self) -> VcThemeResult<Vec<BackdropEntry>> {
        let path = self.loaded_path()?;
        let document = CssDocument::reload(path).await?;

        Ok(self.backdropper.extract_entries(document.get_lines()))
    }

    pub async fn select_backdrop(&mut self, url: &str) -> VcThemeResult<()> {
        let mut document = self.load_document().await?;
        let lines = self
            .backdropper
            .activate_backdrop(document.get_lines(), url, self.section_target)?;

        document.replace_lines(lines);
        document.save().await?;

        self.active_backdrop = Some(url.to_string());

        Ok(())
    }

    pub async fn add_backdrop(&mut self, url: &str) -> VcThemeResult<()> {
        let path = self.loaded_path()?.to_path_buf();

        validate_backdrop_url(url)?;

        let mut document = CssDocument::load(&path).await?;
        let lines = self.backdropper.insert_backdrop(document.get_lines(), url)?;

        document.replace_lines(lines);
        document.save().await
    }

    /// Fails when `url` may not be deleted, so a front end can check before asking the user.
    pub async fn ensure_deletable(&self, url: &str) -> VcThemeResult<()> {
        let document = self.load_document().await?;

        self.backdropper.ensure_deletable(document.get_lines(), url)
    }

    /// Deletes every declaration of `url` and keeps them for one restore.
    ///
    /// In every section where the deleted backdrop was active, the first remaining backdrop
    /// of that section becomes active. The deletion is saved even when no replacement can be
    /// activated; that failure comes back as `activation_warning`.
    pub async fn delete_backdrop(&mut self, url: &str) -> VcThemeResult<DeletionOutcome> {
        let mut document = self.load_document().await?;
        let vacated = self.backdropper.active_sections(document.get_lines(), url);
        let (lines, deleted) = self.backdropper.delete_backdrop(document.get_lines(), url)?;

        let activation = self.backdropper.activate_first_backdrops(&lines, &vacated);
        let (lines, replacements, activation_warning) = match activation {
            Ok((activated_lines, replacements)) => (activated_lines, replacements, None),
            Err(err) => {
                warn!(
                    "Deleted `{}` but could not activate a replacement: {}",
                    url,
                    err.get_message()
                );

                (lines, vec![], Some(err))
            }
        };

        document.replace_lines(lines);
        document.save().await?;

        self.last_deleted = Some(deleted);

        if self.active_backdrop.as_deref() == Some(url) || !vacated.is_empty() {
            self.active_backdrop = replacements.first().cloned();
        }

        Ok(DeletionOutcome {
            replacements,
            activation_warning,
        })
    }

    /// Puts the most recently deleted backdrop back and clears the restore buffer.
    ///
    /// A backdrop that was active when deleted becomes active again in the sections it was
    /// active in. Once the restored lines are saved the buffer stays empty; a failed
    /// re-activation comes back as `activation_warning`.
    pub async fn restore_last(&mut self) -> VcThemeResult<RestorationOutcome> {
        let deleted = self.last_deleted.take().ok_or_else(|| {
            VcThemeError::raise_general_backdrop_error(
                ErrorKind::NothingToRestore,
                "No backdrop has been deleted recently.",
                ErrorAction::Notify,
            )
        })?;

        let mut document = match self.load_document().await {
            Ok(document) => document,
            Err(err) => {
                self.last_deleted = Some(deleted);

                return Err(err);
            }
        };

        let url = deleted.get_url().to_string();
        let lines = self
            .backdropper
            .restore_backdrop(document.get_lines(), &deleted);

        let sections = if deleted.was_active() {
            self.backdropper.active_sections(&lines, &url)
        } else {
            vec![]
        };

        let activation = self.backdropper.activate_in_sections(&lines, &url, &sections);
        let (lines, activation_warning) = match activation {
            Ok(activated_lines) => (activated_lines, None),
            Err(err) => {
                warn!(
                    "Restored `{}` but could not activate it again: {}",
                    url,
                    err.get_message()
                );

                (lines, Some(err))
            }
        };

        document.replace_lines(lines);

        if let Err(err) = document.save().await {
            self.last_deleted = Some(deleted);

            return Err(err);
        }

        if !sections.is_empty() && activation_warning.is_none() {
            self.active_backdrop = Some(url.clone());
        }

        Ok(RestorationOutcome {
            url,
            activation_warning,
        })
    }

    fn loaded_path(&self) -> VcThemeResult<&Path> {
        match self.css_file_path.as_deref() {
            Some(path) if path.exists() => Ok(path),
            _ => Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::FileNotLoaded,
                "Please load a CSS file before editing backdrops.",
                ErrorAction::Fix,
            )),
        }
    }

    async fn load_document(&self) -> VcThemeResult<CssDocument> {
        let path = self.loaded_path()?;

        CssDocument::load(path).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        backdropper::sections::{Section, SectionTarget},
        error::ErrorKind,
        session::{BackdropSession, SessionState},
        themes::{builtin_themes, find_theme},
    };

    const DISCORD_PLUS_CSS: &str = "\
.theme-dark {
  --dplus-backdrop: url(https://a.com/one.png);
  /*--dplus-backdrop: url(https://a.com/two.jpg);*/
}
.theme-light {
  --dplus-backdrop: url(https://a.com/one.png);
  /*--dplus-backdrop: url(https://a.com/two.jpg);*/
}
";

    async fn theme_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "vctheme_session_{}_DiscordPlus.theme.css",
            rand::random::<u64>()
        ));

        tokio::fs::write(&path, contents).await.unwrap();

        path
    }

    async fn read(path: &PathBuf) -> String {
        tokio::fs::read_to_string(path).await.unwrap()
    }

    fn discord_plus_session() -> BackdropSession {
        BackdropSession::new(find_theme(&builtin_themes(), "Discord+").unwrap())
    }

    #[tokio::test]
    async fn operations_require_a_loaded_file() {
        let mut session = discord_plus_session();

        assert_eq!(session.state(), SessionState::NoFileLoaded);

        let add = session.add_backdrop("https://a.com/three.png").await;
        let select = session.select_backdrop("https://a.com/one.png").await;
        let restore = session.restore_last().await;

        assert_eq!(add.unwrap_err().get_kind(), ErrorKind::FileNotLoaded);
        assert_eq!(select.unwrap_err().get_kind(), ErrorKind::FileNotLoaded);
        assert_eq!(restore.unwrap_err().get_kind(), ErrorKind::NothingToRestore);
    }

    #[tokio::test]
    async fn lifecycle_from_open_to_active() {
        let path = theme_file(DISCORD_PLUS_CSS).await;
        let mut session = discord_plus_session();

        let opened = session.open_file(&path).await.unwrap();

        assert!(opened.name_matches_theme);
        assert_eq!(opened.entries.len(), 2);
        assert_eq!(session.state(), SessionState::FileLoaded);

        session.select_backdrop("https://a.com/two.jpg").await.unwrap();

        assert_eq!(
            session.state(),
            SessionState::BackdropActive("https://a.com/two.jpg".to_string())
        );
        assert_eq!(
            read(&path).await,
            DISCORD_PLUS_CSS
                .replace(
                    "  --dplus-backdrop: url(https://a.com/one.png);",
                    "  /*--dplus-backdrop: url(https://a.com/one.png);*/"
                )
                .replace(
                    "  /*--dplus-backdrop: url(https://a.com/two.jpg);*/",
                    "  --dplus-backdrop: url(https://a.com/two.jpg);"
                )
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn section_target_restricts_selection() {
        let path = theme_file(DISCORD_PLUS_CSS).await;
        let mut session = discord_plus_session();
        session.open_file(&path).await.unwrap();

        assert_eq!(
            session.cycle_section_target(),
            SectionTarget::Only(Section::Dark)
        );
        assert_eq!(
            session.cycle_section_target(),
            SectionTarget::Only(Section::Light)
        );

        session.select_backdrop("https://a.com/two.jpg").await.unwrap();

        let lines = read(&path).await;
        let lines = lines.lines().collect::<Vec<_>>();

        assert_eq!(lines[1], "  --dplus-backdrop: url(https://a.com/one.png);");
        assert_eq!(lines[5], "  /*--dplus-backdrop: url(https://a.com/one.png);*/");
        assert_eq!(lines[6], "  --dplus-backdrop: url(https://a.com/two.jpg);");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_add_leaves_the_file_unchanged() {
        let path = theme_file(DISCORD_PLUS_CSS).await;
        let mut session = discord_plus_session();
        session.open_file(&path).await.unwrap();

        let duplicate = session.add_backdrop("https://a.com/two.jpg").await;
        let invalid = session.add_backdrop("https://a.com/two.svg").await;

        assert_eq!(
            duplicate.unwrap_err().get_kind(),
            ErrorKind::DuplicateBackdropUrl
        );
        assert_eq!(invalid.unwrap_err().get_kind(), ErrorKind::InvalidBackdropUrl);
        assert_eq!(read(&path).await, DISCORD_PLUS_CSS);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn add_lists_the_new_backdrop() {
        let path = theme_file(DISCORD_PLUS_CSS).await;
        let mut session = discord_plus_session();
        session.open_file(&path).await.unwrap();

        session.add_backdrop("https://a.com/three.gif").await.unwrap();

        let urls = session
            .backdrops()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.url)
            .collect::<Vec<_>>();

        assert_eq!(
            urls,
            vec![
                "https://a.com/one.png",
                "https://a.com/two.jpg",
                "https://a.com/three.gif"
            ]
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_the_active_backdrop_activates_the_next_one_and_restore_undoes_it() {
        let path = theme_file(DISCORD_PLUS_CSS).await;
        let mut session = discord_plus_session();
        session.open_file(&path).await.unwrap();

        let deletion = session
            .delete_backdrop("https://a.com/one.png")
            .await
            .unwrap();

        assert_eq!(deletion.replacements, vec!["https://a.com/two.jpg"]);
        assert!(deletion.activation_warning.is_none());
        assert_eq!(
            session.get_last_deleted().unwrap().get_positions(),
            vec![1, 5]
        );
        assert_eq!(
            session.ensure_deletable("https://a.com/two.jpg").await.unwrap_err().get_kind(),
            ErrorKind::LastBackdropDeletionBlocked
        );

        let restored = session.restore_last().await.unwrap();

        assert_eq!(restored.url, "https://a.com/one.png");
        assert!(restored.activation_warning.is_none());
        assert_eq!(read(&path).await, DISCORD_PLUS_CSS);
        assert!(session.get_last_deleted().is_none());
        assert_eq!(
            session.restore_last().await.unwrap_err().get_kind(),
            ErrorKind::NothingToRestore
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_under_a_light_target_replaces_only_the_vacated_section() {
        let css = "\
.theme-dark {
  --dplus-backdrop: url(https://a.com/a.png);
  /*--dplus-backdrop: url(https://a.com/b.png);*/
}
.theme-light {
  /*--dplus-backdrop: url(https://a.com/a.png);*/
  --dplus-backdrop: url(https://a.com/c.png);
}
";
        let path = theme_file(css).await;
        let mut session = discord_plus_session();
        session.open_file(&path).await.unwrap();
        session.cycle_section_target();
        session.cycle_section_target();

        assert_eq!(
            session.get_section_target(),
            SectionTarget::Only(Section::Light)
        );

        let deletion = session.delete_backdrop("https://a.com/a.png").await.unwrap();

        assert_eq!(deletion.replacements, vec!["https://a.com/b.png"]);
        assert!(deletion.activation_warning.is_none());
        assert_eq!(
            read(&path).await,
            "\
.theme-dark {
  --dplus-backdrop: url(https://a.com/b.png);
}
.theme-light {
  --dplus-backdrop: url(https://a.com/c.png);
}
"
        );

        let restored = session.restore_last().await.unwrap();

        assert_eq!(restored.url, "https://a.com/a.png");
        assert!(restored.activation_warning.is_none());
        assert_eq!(read(&path).await, css);
        assert_eq!(
            session.state(),
            SessionState::BackdropActive("https://a.com/a.png".to_string())
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn second_deletion_overwrites_the_restore_buffer() {
        let css = "\
:root {
  --background-image: url(https://b.com/a.png);
  /*--background-image: url(https://b.com/b.png);*/
  /*--background-image: url(https://b.com/c.png);*/
}
";
        let path = std::env::temp_dir().join(format!(
            "vctheme_session_{}_SoftX.theme.css",
            rand::random::<u64>()
        ));
        tokio::fs::write(&path, css).await.unwrap();

        let mut session = BackdropSession::new(find_theme(&builtin_themes(), "SoftX").unwrap());
        session.open_file(&path).await.unwrap();

        let first = session.delete_backdrop("https://b.com/b.png").await.unwrap();
        let second = session.delete_backdrop("https://b.com/c.png").await.unwrap();

        assert!(first.replacements.is_empty());
        assert!(second.replacements.is_empty());
        assert_eq!(session.restore_last().await.unwrap().url, "https://b.com/c.png");

        assert_eq!(
            read(&path).await,
            css.replace("  /*--background-image: url(https://b.com/b.png);*/\n", "")
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn last_backdrop_deletion_is_blocked_and_file_unchanged() {
        let css = ":root {\n  --background-image: url(https://b.com/a.png);\n}\n";
        let path = std::env::temp_dir().join(format!(
            "vctheme_session_{}_SoftX.theme.css",
            rand::random::<u64>()
        ));
        tokio::fs::write(&path, css).await.unwrap();

        let mut session = BackdropSession::new(find_theme(&builtin_themes(), "SoftX").unwrap());
        session.open_file(&path).await.unwrap();

        let result = session.delete_backdrop("https://b.com/a.png").await;

        assert_eq!(
            result.unwrap_err().get_kind(),
            ErrorKind::LastBackdropDeletionBlocked
        );
        assert_eq!(read(&path).await, css);
        assert!(session.get_last_deleted().is_none());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn mismatched_file_name_is_reported() {
        let path = std::env::temp_dir().join(format!(
            "vctheme_session_{}_other.css",
            rand::random::<u64>()
        ));
        tokio::fs::write(&path, DISCORD_PLUS_CSS).await.unwrap();

        let mut session = discord_plus_session();
        let opened = session.open_file(&path).await.unwrap();

        assert!(!opened.name_matches_theme);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
