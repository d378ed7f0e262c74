use crate::themes::ThemeConfig;

mod eraser;
mod extractor;
mod inserter;
pub mod lines;
pub mod sections;
mod toggler;

pub use eraser::DeletedBackdrop;
pub use extractor::BackdropEntry;
pub use inserter::validate_backdrop_url;

/// Line-oriented rewrite rules for the backdrop declarations of one theme.
///
/// Every operation takes the current document lines and returns new lines; nothing is
/// cached between calls, the caller reloads the file before each operation.
#[derive(Clone, PartialEq, Debug)]
pub struct Backdropper {
    theme: ThemeConfig,
}

impl Backdropper {
    pub fn new(theme: ThemeConfig) -> Self {
        Self { theme }
    }

    pub fn get_theme(&self) -> &ThemeConfig {
        &self.theme
    }

    fn is_backdrop_line(&self, line: &str) -> bool {
        lines::is_backdrop_line(line, self.theme.get_backdrop_property())
    }

    /// URL declared by `line` when it is a backdrop line of this theme.
    fn backdrop_url(&self, line: &str) -> Option<String> {
        if self.is_backdrop_line(line) {
            lines::extract_url(line)
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use crate::themes::{builtin_themes, find_theme, ThemeConfig};

    pub fn discord_plus() -> ThemeConfig {
        find_theme(&builtin_themes(), "Discord+").unwrap()
    }

    pub fn softx() -> ThemeConfig {
        find_theme(&builtin_themes(), "SoftX").unwrap()
    }

    /// Splits text the way `CssDocument` does, keeping line endings.
    pub fn to_lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(|line| line.to_string()).collect()
    }

    pub const DISCORD_PLUS_CSS: &str = "\
/**
 * @name Discord+
 */
@import url(https://fonts.googleapis.com/css2?family=Inter);
.theme-dark {
  --dplus-backdrop: url(https://a.com/one.png);
  /*--dplus-backdrop: url(https://a.com/two.jpg);*/
  background: var(--dplus-backdrop);
}
.theme-light {
  /*--dplus-backdrop: url(https://a.com/one.png);*/
  --dplus-backdrop: url(https://a.com/two.jpg);
}
";

    pub const SOFTX_CSS: &str = "\
:root {
  --background-image: url('https://b.com/first.gif');
  /*--background-image: url(https://b.com/second.png);*/
  --accent: #ff0;
}
";
}
