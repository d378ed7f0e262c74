use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    utils::{replace_file::replace_file, resilient_reader::resilient_reader},
    VcThemeResult,
};

/// A CSS theme file held as lines, each line keeping its own terminator.
///
/// Joining the lines gives back the file byte for byte, so rewrites only ever change the
/// lines an operation targets.
#[derive(Clone, PartialEq, Debug)]
pub struct CssDocument {
    path: PathBuf,
    lines: Vec<String>,
}

impl CssDocument {
    pub fn from_text(path: &Path, css_text: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: css_text
                .split_inclusive('\n')
                .map(|line| line.to_string())
                .collect(),
        }
    }

    /// Reads the whole file from disk.
    pub async fn load(path: &Path) -> VcThemeResult<Self> {
        let css_text = tokio::fs::read_to_string(path).await.map_err(|err| {
            VcThemeError::raise_general_document_error(
                ErrorKind::FileReadFailed,
                &format!("Error reading CSS file {:?}: {}", path, err),
                ErrorAction::Notify,
            )
        })?;

        debug!("Loaded {:?} ({} bytes)", path, css_text.len());

        Ok(Self::from_text(path, &css_text))
    }

    /// Reads the file after an outside modification, tolerating a briefly empty file.
    pub async fn reload(path: &Path) -> VcThemeResult<Self> {
        let css_text = resilient_reader(path).await?;

        Ok(Self::from_text(path, &css_text))
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Rewrites the whole file with the current lines.
    pub async fn save(&self) -> VcThemeResult<()> {
        replace_file(&self.path, &self.to_text()).await?;

        info!("Saved {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{cssdoc::CssDocument, error::ErrorKind};

    #[test]
    fn keeps_every_byte_of_the_source() {
        let css = "a {\r\n  color: red;\n}\n\n/* end */";
        let document = CssDocument::from_text(Path::new("theme.css"), css);

        assert_eq!(document.get_lines().len(), 5);
        assert_eq!(document.get_lines()[0], "a {\r\n");
        assert_eq!(document.to_text(), css);
    }

    #[test]
    fn empty_file_has_no_lines() {
        let document = CssDocument::from_text(Path::new("theme.css"), "");

        assert!(document.get_lines().is_empty());
        assert_eq!(document.to_text(), "");
    }

    #[tokio::test]
    async fn load_mutate_save() {
        let path = std::env::temp_dir().join(format!(
            "vctheme_document_{}.css",
            rand::random::<u64>()
        ));
        tokio::fs::write(&path, "one\ntwo\n").await.unwrap();

        let mut document = CssDocument::load(&path).await.unwrap();
        document.replace_lines(vec!["one\n".to_string(), "three\n".to_string()]);
        document.save().await.unwrap();

        let reloaded = CssDocument::reload(&path).await.unwrap();

        assert_eq!(reloaded.to_text(), "one\nthree\n");
        assert_eq!(reloaded.get_path(), path.as_path());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_fails_to_load() {
        let path = std::env::temp_dir().join("vctheme_document_that_does_not_exist.css");

        let result = CssDocument::load(&path).await;

        assert_eq!(result.unwrap_err().get_kind(), ErrorKind::FileReadFailed);
    }
}
