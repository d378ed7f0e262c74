use std::fmt;

use crate::themes::SectionLayout;

const DARK_SECTION_MARKER: &str = ".theme-dark";
const LIGHT_SECTION_MARKER: &str = ".theme-light";

/// The theme section a line belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Section {
    /// Lines of flat themes, and lines before the first marker of sectioned themes.
    Unsectioned,
    Dark,
    Light,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Unsectioned => write!(f, "unsectioned"),
            Section::Dark => write!(f, "dark"),
            Section::Light => write!(f, "light"),
        }
    }
}

/// The sections an activation is allowed to rewrite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SectionTarget {
    All,
    Only(Section),
}

impl SectionTarget {
    pub fn includes(&self, section: Section) -> bool {
        match self {
            SectionTarget::All => true,
            SectionTarget::Only(only) => *only == section,
        }
    }

    /// Next target in the `All -> Dark -> Light -> All` rotation.
    pub fn cycle(&self) -> Self {
        match self {
            SectionTarget::All => SectionTarget::Only(Section::Dark),
            SectionTarget::Only(Section::Dark) => SectionTarget::Only(Section::Light),
            SectionTarget::Only(_) => SectionTarget::All,
        }
    }
}

impl fmt::Display for SectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionTarget::All => write!(f, "all sections"),
            SectionTarget::Only(section) => write!(f, "{} section", section),
        }
    }
}

/// Assigns a section to every line by scanning top to bottom.
///
/// A line containing `.theme-dark` enters the dark section, one containing `.theme-light`
/// enters the light section, and the marker line itself already belongs to the section it
/// opens. Flat layouts put every line in `Section::Unsectioned`.
pub fn assign_sections<S: AsRef<str>>(lines: &[S], layout: SectionLayout) -> Vec<Section> {
    if layout == SectionLayout::Flat {
        return vec![Section::Unsectioned; lines.len()];
    }

    let mut current_section = Section::Unsectioned;

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();

            if line.contains(DARK_SECTION_MARKER) {
                current_section = Section::Dark;
            } else if line.contains(LIGHT_SECTION_MARKER) {
                current_section = Section::Light;
            }

            current_section
        })
        .collect()
}
