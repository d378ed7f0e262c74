use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

use super::{
    lines::{document_line_ending, ensure_terminated, LineParts},
    sections::{assign_sections, Section},
    Backdropper,
};

lazy_static! {
    static ref BACKDROP_URL_PATTERN: Regex =
        Regex::new(r"(?i)^https?://.*\.(png|jpg|jpeg|gif)$").expect("valid backdrop URL pattern");
}

/// Accepts only http(s) links to png, jpg/jpeg or gif images.
pub fn validate_backdrop_url(url: &str) -> VcThemeResult<()> {
    if BACKDROP_URL_PATTERN.is_match(url) {
        return Ok(());
    }

    Err(VcThemeError::raise_general_backdrop_error(
        ErrorKind::InvalidBackdropUrl,
        "Please enter a valid URL with a .png, .jpg/jpeg, or .gif extension.",
        ErrorAction::Fix,
    ))
}

impl Backdropper {
    /// True when `url` already appears in a `url(...)` token of the document.
    pub fn is_duplicate_backdrop<S: AsRef<str>>(&self, lines: &[S], url: &str) -> bool {
        let token = format!("url({})", url);

        lines.iter().any(|line| {
            let line = line.as_ref();

            line.contains(&token) || self.backdrop_url(line).as_deref() == Some(url)
        })
    }

    /// Inserts a commented declaration of `url` right after the last backdrop line of every
    /// section that declares one.
    ///
    /// The new line copies the indentation and the line ending of the line it follows.
    pub fn insert_backdrop<S: AsRef<str>>(
        &self,
        lines: &[S],
        url: &str,
    ) -> VcThemeResult<Vec<String>> {
        validate_backdrop_url(url)?;

        if self.is_duplicate_backdrop(lines, url) {
            return Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::DuplicateBackdropUrl,
                "This link is already present in the list of backdrops.",
                ErrorAction::Fix,
            ));
        }

        let sections = assign_sections(lines, self.theme.get_section_layout());
        let mut anchors: IndexMap<Section, usize> = IndexMap::new();

        for (idx, (line, section)) in lines.iter().zip(sections).enumerate() {
            if self.is_backdrop_line(line.as_ref()) {
                anchors.insert(section, idx);
            }
        }

        if anchors.is_empty() {
            return Err(VcThemeError::raise_general_backdrop_error(
                ErrorKind::BackdropAnchorMissing,
                &format!(
                    "No `{}` declaration was found to place the new backdrop next to.",
                    self.theme.get_backdrop_property()
                ),
                ErrorAction::Fix,
            ));
        }

        debug!("Inserting `{}` after lines {:?}", url, anchors.values());

        let line_ending = document_line_ending(lines);
        let declaration = self.theme.commented_declaration(url);
        let mut rewritten = Vec::with_capacity(lines.len() + anchors.len());

        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();

            if !anchors.values().any(|anchor| *anchor == idx) {
                rewritten.push(line.to_string());
                continue;
            }

            let parts = LineParts::split(line);

            if parts.terminator.is_empty() {
                rewritten.push(ensure_terminated(line, line_ending));
                rewritten.push(format!("{}{}", parts.indent, declaration));
            } else {
                rewritten.push(line.to_string());
                rewritten.push(format!(
                    "{}{}{}",
                    parts.indent, declaration, parts.terminator
                ));
            }
        }

        info!("Added backdrop `{}` to {} section(s)", url, anchors.len());

        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        backdropper::{
            mocks::{discord_plus, softx, to_lines, DISCORD_PLUS_CSS, SOFTX_CSS},
            sections::SectionTarget,
            validate_backdrop_url, Backdropper,
        },
        error::ErrorKind,
    };

    #[test]
    fn validates_scheme_and_image_extension() {
        assert!(validate_backdrop_url("https://a.com/x.png").is_ok());
        assert!(validate_backdrop_url("http://a.com/path/x.JPEG").is_ok());
        assert!(validate_backdrop_url("HTTPS://a.com/x.Gif").is_ok());

        for invalid in ["", "ftp://a.com/x.png", "https://a.com/x.webp", "a.com/x.png"] {
            assert_eq!(
                validate_backdrop_url(invalid).unwrap_err().get_kind(),
                ErrorKind::InvalidBackdropUrl
            );
        }
    }

    #[test]
    fn flat_theme_inserts_once_after_the_last_declaration() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines(SOFTX_CSS);

        let rewritten = backdropper
            .insert_backdrop(&lines, "https://b.com/third.jpg")
            .unwrap();

        assert_eq!(rewritten.len(), lines.len() + 1);
        assert_eq!(
            rewritten[3],
            "  /*--background-image: url(https://b.com/third.jpg);*/\n"
        );
        assert_eq!(rewritten[4], "  --accent: #ff0;\n");
    }

    #[test]
    fn sectioned_theme_inserts_once_per_section() {
        let backdropper = Backdropper::new(discord_plus());
        let lines = to_lines(DISCORD_PLUS_CSS);

        let rewritten = backdropper
            .insert_backdrop(&lines, "https://a.com/three.gif")
            .unwrap();

        let declaration = "  /*--dplus-backdrop: url(https://a.com/three.gif);*/\n";

        assert_eq!(rewritten.len(), lines.len() + 2);
        assert_eq!(rewritten[7], declaration);
        assert_eq!(rewritten[13], declaration);
    }

    #[test]
    fn inserted_url_round_trips_through_extraction_and_activation() {
        let backdropper = Backdropper::new(discord_plus());
        let lines = to_lines(DISCORD_PLUS_CSS);

        let rewritten = backdropper
            .insert_backdrop(&lines, "https://a.com/three.gif")
            .unwrap();

        assert!(backdropper
            .extract_backdrops(&rewritten.concat())
            .contains(&"https://a.com/three.gif".to_string()));
        assert!(backdropper
            .activate_backdrop(&rewritten, "https://a.com/three.gif", SectionTarget::All)
            .is_ok());
    }

    #[test]
    fn duplicate_url_is_rejected() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines("--background-image: url(https://b.com/y.jpg);\n.x { background: url(http://b.com/y.jpg); }\n");

        let result = backdropper.insert_backdrop(&lines, "http://b.com/y.jpg");

        assert_eq!(
            result.unwrap_err().get_kind(),
            ErrorKind::DuplicateBackdropUrl
        );
    }

    #[test]
    fn quoted_declaration_counts_as_duplicate() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines(SOFTX_CSS);

        let result = backdropper.insert_backdrop(&lines, "https://b.com/first.gif");

        assert_eq!(
            result.unwrap_err().get_kind(),
            ErrorKind::DuplicateBackdropUrl
        );
    }

    #[test]
    fn unterminated_last_line_gets_a_line_ending() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines("a {}\r\n--background-image: url(https://b.com/x.png);");

        let rewritten = backdropper
            .insert_backdrop(&lines, "https://b.com/y.png")
            .unwrap();

        assert_eq!(
            rewritten.concat(),
            "a {}\r\n--background-image: url(https://b.com/x.png);\r\n/*--background-image: url(https://b.com/y.png);*/"
        );
    }

    #[test]
    fn document_without_declarations_is_rejected() {
        let backdropper = Backdropper::new(softx());
        let lines = to_lines(":root {\n  --accent: #ff0;\n}\n");

        let result = backdropper.insert_backdrop(&lines, "https://b.com/x.png");

        assert_eq!(
            result.unwrap_err().get_kind(),
            ErrorKind::BackdropAnchorMissing
        );
    }
}
