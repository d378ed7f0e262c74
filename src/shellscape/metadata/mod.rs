#[derive(Clone, PartialEq, Debug)]
pub struct ShellscapeMetadata {
    pub title: String,
    pub subtitle: String,
    pub theme_heading: String,
    pub file_heading: Option<String>,
    pub version: String,
    pub license: String,
    pub footer: String,
}

impl ShellscapeMetadata {
    pub fn new(
        title: String,
        subtitle: String,
        theme_heading: String,
        file_heading: Option<String>,
        version: String,
        license: String,
        footer: String,
    ) -> Self {
        Self {
            title,
            subtitle,
            theme_heading,
            file_heading,
            version,
            license,
            footer,
        }
    }

    pub fn reset_file_heading(&mut self, heading: String) {
        self.file_heading = Some(heading);
    }
}
