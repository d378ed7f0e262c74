use tracing::{debug, info};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

use super::{
    lines::{document_line_ending, ensure_terminated, is_commented, line_terminator},
    Backdropper,
};

/// The lines removed by the most recent deletion, kept for a single restore.
#[derive(Clone, PartialEq, Debug)]
pub struct DeletedBackdrop {
    url: String,
    /// Original position and exact text of every removed line, ascending by position.
    removed: Vec<(usize, String)>,
}

impl DeletedBackdrop {
    pub fn get_url(&self) -> &str {
        &self.url
    }

    pub fn get_positions(&self) -> Vec<usize> {
        self.removed.iter().map(|(position, _)| *position).collect()
    }

    /// True when one of the removed declarations was uncommented.
    pub fn was_active(&self) -> bool {
        self.removed.iter().any(|(_, line)| !is_commented(line))
    }
}

impl Backdropper {
    /// Checks that `url` is declared and is not the last remaining backdrop.
    pub fn ensure_deletable<S: AsRef<str>>(&self, lines: &[S], url: &str) -> VcThemeResult<()> {
        let entries = self.extract_entries(lines);

        if !entries.iter().any(|entry| entry.url == url) {
            return Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::BackdropNotFound,
                &format!("The backdrop `{}` is not declared in this file.", url),
                ErrorAction::Fix,
            ));
        }

        if entries.len() <= 1 {
            return Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::LastBackdropDeletionBlocked,
                "You can't delete the last backdrop in the CSS file.",
                ErrorAction::Notify,
            ));
        }

        Ok(())
    }

    /// Removes every declaration of `url` and records what was removed.
    ///
    /// Only backdrop property lines count as declarations; other lines mentioning the same
    /// image are kept.
    pub fn delete_backdrop<S: AsRef<str>>(
        &self,
        lines: &[S],
        url: &str,
    ) -> VcThemeResult<(Vec<String>, DeletedBackdrop)> {
        self.ensure_deletable(lines, url)?;

        let mut kept = Vec::with_capacity(lines.len());
        let mut removed = vec![];

        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();

            if self.backdrop_url(line).as_deref() == Some(url) {
                removed.push((idx, line.to_string()));
            } else {
                kept.push(line.to_string());
            }
        }

        info!(
            "Deleted backdrop `{}` from {} line(s)",
            url,
            removed.len()
        );

        Ok((
            kept,
            DeletedBackdrop {
                url: url.to_string(),
                removed,
            },
        ))
    }

    /// Puts the removed lines back at their recorded positions.
    ///
    /// Positions are replayed in ascending order, which lands every line on its original
    /// index. A position past the end of the document appends the line instead.
    pub fn restore_backdrop<S: AsRef<str>>(
        &self,
        lines: &[S],
        deleted: &DeletedBackdrop,
    ) -> Vec<String> {
        let line_ending = document_line_ending(lines);
        let mut restored = lines
            .iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>();

        for (position, line) in &deleted.removed {
            if *position < restored.len() {
                restored.insert(*position, ensure_terminated(line, line_ending));
                continue;
            }

            debug!(
                "Restore position {} is out of range, appending `{}` at the end",
                position, deleted.url
            );

            if let Some(last) = restored.last_mut() {
                if line_terminator(last).is_empty() {
                    last.push_str(line_ending);
                }
            }

            restored.push(line.clone());
        }

        info!("Restored backdrop `{}`", deleted.url);

        restored
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        backdropper::{
            mocks::{discord_plus, softx, to_lines, DISCORD_PLUS_CSS, SOFTX_CSS},
            Backdropper,
        },
        error::ErrorKind,
    };

    #[test]
    fn removes_every_declaration_of_the_url() {
        let backdropper = Backdropper::new(discord_plus());
        let lines = to_lines(DISCORD_PLUS_CSS);

        let (kept, deleted) = backdropper
            .delete_backdrop(&lines, "https://a.com/one.png")
            .unwrap();

        assert_eq!(kept.len(), lines.len() - 2);
        assert_eq!(deleted.get_positions(), vec![5, 10]);
        assert!(deleted.was_active());
        assert_eq!(
            backdropper.extract_backdrops(&kept.concat()),
            vec!["https://a.com/two.jpg"]
        );
    }

    #[test]
    fn last_remaining_backdrop_cannot_be_deleted() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines("--background-image: url(https://b.com/only.png);\n/*--background-image: url(https://b.com/only.png);*/\n");

        let result = backdropper.delete_backdrop(&lines, "https://b.com/only.png");

        assert_eq!(
            result.unwrap_err().get_kind(),
            ErrorKind::LastBackdropDeletionBlocked
        );
    }

    #[test]
    fn unknown_backdrop_cannot_be_deleted() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines(SOFTX_CSS);

        let result = backdropper.delete_backdrop(&lines, "https://b.com/none.png");

        assert_eq!(result.unwrap_err().get_kind(), ErrorKind::BackdropNotFound);
    }

    #[test]
    fn delete_then_restore_round_trips() {
        let backdropper = Backdropper::new(discord_plus());
        let lines = to_lines(DISCORD_PLUS_CSS);

        let (kept, deleted) = backdropper
            .delete_backdrop(&lines, "https://a.com/two.jpg")
            .unwrap();
        let restored = backdropper.restore_backdrop(&kept, &deleted);

        assert_eq!(restored.concat(), DISCORD_PLUS_CSS);
    }

    #[test]
    fn restore_of_an_unterminated_last_line() {
        let backdropper = Backdropper::new(softx());
        let css = "a {}\n--background-image: url(https://b.com/x.png);\n--background-image: url(https://b.com/y.png);";
        let lines = to_lines(css);

        let (kept, deleted) = backdropper
            .delete_backdrop(&lines, "https://b.com/y.png")
            .unwrap();

        assert_eq!(kept.concat(), "a {}\n--background-image: url(https://b.com/x.png);\n");
        assert_eq!(backdropper.restore_backdrop(&kept, &deleted).concat(), css);
    }

    #[test]
    fn out_of_range_position_appends_at_the_end() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines(SOFTX_CSS);

        let (_, deleted) = backdropper
            .delete_backdrop(&lines, "https://b.com/second.png")
            .unwrap();
        let shrunk = to_lines("--background-image: url('https://b.com/first.gif');");
        let restored = backdropper.restore_backdrop(&shrunk, &deleted);

        assert_eq!(
            restored,
            vec![
                "--background-image: url('https://b.com/first.gif');\n",
                "  /*--background-image: url(https://b.com/second.png);*/\n",
            ]
        );
    }

    #[test]
    fn other_references_to_the_same_image_are_kept() {
        let backdropper = Backdropper::new(softx());
        let css = "\
@import url(https://b.com/x.png);
:root {
  --background-image: url(https://b.com/x.png);
  /*--background-image: url(https://b.com/y.png);*/
  background: url(https://b.com/x.png) center;
}
";
        let lines = to_lines(css);

        let (kept, deleted) = backdropper
            .delete_backdrop(&lines, "https://b.com/x.png")
            .unwrap();

        assert_eq!(deleted.get_positions(), vec![2]);
        assert_eq!(kept[0], "@import url(https://b.com/x.png);\n");
        assert_eq!(kept[3], "  background: url(https://b.com/x.png) center;\n");
    }
}
