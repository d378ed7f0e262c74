use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    themes::ActivationScope,
    VcThemeResult,
};

use super::{
    lines::{comment_line, is_commented, uncomment_line},
    sections::{assign_sections, Section, SectionTarget},
    Backdropper,
};

impl Backdropper {
    /// Makes `url` the active backdrop.
    ///
    /// Inside every rewritten scope the first declaration of `url` is uncommented and all
    /// other backdrop declarations are commented. With `ActivationScope::Global` the whole
    /// file is a single scope and `target` is ignored. With `ActivationScope::PerSection`
    /// each section selected by `target` is its own scope, and a selected section that does
    /// not declare `url` is left untouched.
    ///
    /// Fails with `BackdropNotFound`, without touching anything, when no rewritten scope
    /// declares `url`.
    pub fn activate_backdrop<S: AsRef<str>>(
        &self,
        lines: &[S],
        url: &str,
        target: SectionTarget,
    ) -> VcThemeResult<Vec<String>> {
        let scopes = self.activation_scopes(lines, target);

        // Scope -> index of the declaration that stays uncommented.
        let mut chosen: IndexMap<Section, usize> = IndexMap::new();

        for (idx, (line, scope)) in lines.iter().zip(&scopes).enumerate() {
            if let Some(scope) = scope {
                if self.backdrop_url(line.as_ref()).as_deref() == Some(url) {
                    chosen.entry(*scope).or_insert(idx);
                }
            }
        }

        if chosen.is_empty() {
            return Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::BackdropNotFound,
                &format!("The backdrop `{}` is not declared in the {}.", url, target),
                ErrorAction::Fix,
            ));
        }

        debug!("Activating `{}` in scopes {:?}", url, chosen.keys());

        let rewritten = lines
            .iter()
            .zip(&scopes)
            .enumerate()
            .map(|(idx, (line, scope))| {
                let line = line.as_ref();

                let chosen_idx = match scope.and_then(|scope| chosen.get(&scope)) {
                    Some(chosen_idx) if self.is_backdrop_line(line) => *chosen_idx,
                    _ => return line.to_string(),
                };

                if idx == chosen_idx {
                    uncomment_line(line)
                } else if is_commented(line) {
                    line.to_string()
                } else {
                    comment_line(line)
                }
            })
            .collect();

        info!("Backdrop `{}` is now active", url);

        Ok(rewritten)
    }

    /// Activation scopes holding an uncommented declaration of `url`, in file order.
    pub fn active_sections<S: AsRef<str>>(&self, lines: &[S], url: &str) -> Vec<Section> {
        let scopes = self.activation_scopes(lines, SectionTarget::All);
        let mut sections = vec![];

        for (line, scope) in lines.iter().zip(scopes) {
            let line = line.as_ref();

            let scope = match scope {
                Some(scope) if !is_commented(line) => scope,
                _ => continue,
            };

            if self.backdrop_url(line).as_deref() == Some(url) && !sections.contains(&scope) {
                sections.push(scope);
            }
        }

        sections
    }

    /// Activates `url` in each of `sections` and nowhere else.
    pub fn activate_in_sections<S: AsRef<str>>(
        &self,
        lines: &[S],
        url: &str,
        sections: &[Section],
    ) -> VcThemeResult<Vec<String>> {
        let mut rewritten = lines
            .iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>();

        for section in sections {
            rewritten = self.activate_backdrop(&rewritten, url, SectionTarget::Only(*section))?;
        }

        Ok(rewritten)
    }

    /// Activates, in each of `sections`, the first backdrop that section declares.
    ///
    /// Returns the rewritten lines and the activated URLs without repeats. A section that
    /// declares no backdrop is left as it is.
    pub fn activate_first_backdrops<S: AsRef<str>>(
        &self,
        lines: &[S],
        sections: &[Section],
    ) -> VcThemeResult<(Vec<String>, Vec<String>)> {
        let scopes = self.activation_scopes(lines, SectionTarget::All);
        let mut rewritten = lines
            .iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>();
        let mut activated: Vec<String> = vec![];

        for section in sections {
            let first = lines.iter().zip(&scopes).find_map(|(line, scope)| match scope {
                Some(scope) if scope == section => self.backdrop_url(line.as_ref()),
                _ => None,
            });

            let url = match first {
                Some(url) => url,
                None => {
                    debug!("The {} section has no backdrop left to activate", section);
                    continue;
                }
            };

            rewritten = self.activate_backdrop(&rewritten, &url, SectionTarget::Only(*section))?;

            if !activated.contains(&url) {
                activated.push(url);
            }
        }

        Ok((rewritten, activated))
    }

    /// The activation scope of each line, `None` for lines outside the target.
    fn activation_scopes<S: AsRef<str>>(
        &self,
        lines: &[S],
        target: SectionTarget,
    ) -> Vec<Option<Section>> {
        match self.theme.get_activation_scope() {
            ActivationScope::Global => vec![Some(Section::Unsectioned); lines.len()],
            ActivationScope::PerSection => {
                assign_sections(lines, self.theme.get_section_layout())
                    .into_iter()
                    .map(|section| {
                        if target.includes(section) {
                            Some(section)
                        } else {
                            None
                        }
                    })
                    .collect()
            }
        }
    }
}
