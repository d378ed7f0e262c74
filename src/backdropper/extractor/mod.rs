use indexmap::IndexMap;
use tracing::debug;

use super::{
    lines::is_commented,
    sections::{assign_sections, Section},
    Backdropper,
};

/// A backdrop URL as seen in the file. Derived on every read, never persisted.
#[derive(Clone, PartialEq, Debug)]
pub struct BackdropEntry {
    pub url: String,
    /// Sections declaring the URL, in file order.
    pub sections: Vec<Section>,
    /// At least one declaration of the URL is uncommented.
    pub active: bool,
}

impl Backdropper {
    /// Ordered unique backdrop URLs found in `css_text`.
    pub fn extract_backdrops(&self, css_text: &str) -> Vec<String> {
        let lines = css_text.lines().collect::<Vec<_>>();

        self.extract_entries(&lines)
            .into_iter()
            .map(|entry| entry.url)
            .collect()
    }

    /// Backdrops with their sections and active state, unique by URL in file order.
    pub fn extract_entries<S: AsRef<str>>(&self, lines: &[S]) -> Vec<BackdropEntry> {
        let sections = assign_sections(lines, self.theme.get_section_layout());
        let mut entries: IndexMap<String, BackdropEntry> = IndexMap::new();

        for (line, section) in lines.iter().zip(sections) {
            let line = line.as_ref();

            let url = match self.backdrop_url(line) {
                Some(url) => url,
                None => continue,
            };

            let entry = entries.entry(url.clone()).or_insert_with(|| BackdropEntry {
                url,
                sections: vec![],
                active: false,
            });

            if !entry.sections.contains(&section) {
                entry.sections.push(section);
            }

            entry.active |= !is_commented(line);
        }

        debug!(
            "Extracted {} backdrops for theme `{}`",
            entries.len(),
            self.theme.get_display_name()
        );

        entries.into_values().collect()
    }
}
