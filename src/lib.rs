use std::path::PathBuf;

use baraddur::BaraddurObserver;
use chrono::Local;
use configatron::{Configatron, ConfigurationJson};
use error::{ErrorAction, ErrorKind, VcThemeError};
use interactor::{Interactor, InteractorFlow};
use pathfinder::discover_theme_file;
use session::BackdropSession;
use shellscape::Shellscape;
use themes::{find_theme, ThemeConfig};
use tracing::{error, info, level_filters::LevelFilter, Level};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    fmt::format::{DefaultFields, Format},
    FmtSubscriber,
};

pub mod backdropper;
mod baraddur;
pub mod configatron;
pub mod cssdoc;
pub mod error;
mod interactor;
pub mod pathfinder;
pub mod session;
mod shellscape;
pub mod themes;
mod utils;

const CONFIG_FILE_NAME: &str = "vctheme.config.json";

#[derive(Clone, PartialEq, Debug)]
pub enum VcThemeRuntimeKind {
    /// Terminal interface over one theme file.
    Open,
    /// Prints the backdrops of the theme file.
    List,
    Select(String),
    Add(String),
    Delete(String),
}

pub type VcThemeResult<T> = Result<T, VcThemeError>;

#[derive(Debug)]
pub struct VcThemeRuntime {
    runtime_mode: VcThemeRuntimeKind,
    current_dir: PathBuf,
    theme_name: String,
    css_file: Option<PathBuf>,
    configatron: Configatron,
    log_guard: Option<WorkerGuard>,
}

impl VcThemeRuntime {
    pub fn new(
        runtime_mode: VcThemeRuntimeKind,
        current_dir: PathBuf,
        theme_name: String,
        css_file: Option<PathBuf>,
    ) -> Self {
        Self {
            runtime_mode,
            current_dir,
            theme_name,
            css_file,
            configatron: Configatron::default(),
            log_guard: None,
        }
    }

    pub async fn run(&mut self) -> VcThemeResult<()> {
        // Load the vctheme configurations.
        self.load_vctheme_config()?;

        // Creates the logs subscriber, the terminal belongs to the interface.
        let (subscriber, log_guard) = self.generate_log_subscriber();
        self.log_guard = Some(log_guard);

        tracing::subscriber::set_global_default(subscriber).map_err(|err| {
            VcThemeError::raise_critical_runtime_error(
                ErrorKind::TracingSubscriberInitializationFailed,
                &format!("Failed to initialize the logs subscriber: {}", err),
                ErrorAction::Exit,
            )
        })?;

        info!(
            "VCTheme {} started in {:?} mode",
            env!("CARGO_PKG_VERSION"),
            self.runtime_mode
        );

        let theme = find_theme(self.configatron.get_themes(), &self.theme_name)?;
        let css_file = self.resolve_css_file(&theme).await?;

        match self.runtime_mode {
            VcThemeRuntimeKind::Open => self.start_interactive_mode(theme, css_file).await,
            _ => self.start_command_mode(theme, css_file).await,
        }
    }

    async fn resolve_css_file(&self, theme: &ThemeConfig) -> VcThemeResult<PathBuf> {
        match &self.css_file {
            Some(css_file) => Ok(self.current_dir.join(css_file)),
            None => discover_theme_file(&self.configatron.get_themes_dir(), theme).await,
        }
    }

    async fn start_interactive_mode(
        &mut self,
        theme: ThemeConfig,
        css_file: PathBuf,
    ) -> VcThemeResult<()> {
        let mut shellscape = Shellscape::new();
        let mut interactor = Interactor::new(
            BackdropSession::new(theme.clone()),
            shellscape.create_app(&theme),
        );

        interactor.open(&css_file).await?;

        let mut interface = shellscape.create_interface()?;
        let events = shellscape.create_events(self.configatron.get_tick_rate());
        let mut observer = BaraddurObserver::new();
        let observer_handle = observer.start(css_file, self.configatron.get_watch_debounce());

        let result = match interface.invoke() {
            Ok(()) => loop {
                if let Err(err) = interface.render(interactor.get_app_mut()) {
                    break Err(err);
                }

                tokio::select! {
                    event = shellscape.next() => {
                        let event = match event {
                            Ok(event) => event,
                            Err(err) => break Err(err),
                        };

                        let command = shellscape.match_shellscape_event(event, interactor.get_input_mode());

                        if interactor.handle(command).await == InteractorFlow::Terminate {
                            info!("Terminating the VCTheme interface");

                            break Ok(());
                        }
                    }
                    event = observer.next() => {
                        match event {
                            Ok(event) => interactor.handle_observer_event(event).await,
                            Err(err) => interactor.notify_error(err),
                        }
                    }
                }
            },
            Err(err) => Err(err),
        };

        events.abort();
        observer_handle.abort();

        if let Err(err) = interface.abort() {
            error!("Failed to restore the terminal: {}", err.get_message());

            return result.and(Err(err));
        }

        result
    }

    async fn start_command_mode(
        &mut self,
        theme: ThemeConfig,
        css_file: PathBuf,
    ) -> VcThemeResult<()> {
        let mut session = BackdropSession::new(theme);
        let opened = session.open_file(&css_file).await?;

        if !opened.name_matches_theme {
            eprintln!(
                "Warning: {} does not look like a {} theme file.",
                css_file.display(),
                session.get_theme().get_display_name()
            );
        }

        match &self.runtime_mode {
            VcThemeRuntimeKind::List => {
                println!(
                    "{} backdrops in {}:",
                    session.get_theme().get_display_name(),
                    css_file.display()
                );

                for (idx, entry) in opened.entries.iter().enumerate() {
                    let sections = entry
                        .sections
                        .iter()
                        .map(|section| section.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");

                    println!(
                        "{:>3}. [{}] {} ({})",
                        idx + 1,
                        if entry.active { "*" } else { " " },
                        entry.url,
                        sections
                    );
                }
            }
            VcThemeRuntimeKind::Select(url) => {
                session.select_backdrop(url).await?;

                println!("{} is now the active backdrop.", url);
            }
            VcThemeRuntimeKind::Add(url) => {
                session.add_backdrop(url).await?;

                println!("{} was added to {}.", url, css_file.display());
            }
            VcThemeRuntimeKind::Delete(url) => {
                let deletion = session.delete_backdrop(url).await?;

                println!("{} was deleted from {}.", url, css_file.display());

                for replacement in &deletion.replacements {
                    println!("{} is now the active backdrop.", replacement);
                }

                if let Some(err) = deletion.activation_warning {
                    eprintln!("No replacement backdrop was activated: {}", err.get_message());
                }
            }
            VcThemeRuntimeKind::Open => {}
        }

        Ok(())
    }

    fn load_vctheme_config(&mut self) -> VcThemeResult<()> {
        let config_path = self.current_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(());
        }

        let raw_config = std::fs::read_to_string(&config_path).map_err(|err| {
            VcThemeError::raise_critical_runtime_error(
                ErrorKind::ConfigFileReadError,
                &format!("Failed to read {:?}: {}", config_path, err),
                ErrorAction::Exit,
            )
        })?;

        let config_json: ConfigurationJson = serde_json::from_str(&raw_config).map_err(|err| {
            VcThemeError::raise_critical_runtime_error(
                ErrorKind::ConfigFileParsingError,
                &format!("Failed to parse {:?}: {}", config_path, err),
                ErrorAction::Fix,
            )
        })?;

        self.configatron = Configatron::from_json(config_json)?;

        Ok(())
    }

    fn generate_log_filename(&self) -> String {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();

        format!("vctheme_log_{}.log", timestamp)
    }

    fn generate_log_subscriber(
        &self,
    ) -> (
        FmtSubscriber<DefaultFields, Format, LevelFilter, NonBlocking>,
        WorkerGuard,
    ) {
        let file_name = self.generate_log_filename();
        let logs_dir = self.current_dir.join(self.configatron.get_logs_dir());
        let file_appender = rolling::never(logs_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_writer(non_blocking)
            .finish();

        (subscriber, guard)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{error::ErrorKind, VcThemeRuntime, VcThemeRuntimeKind};

    async fn workspace() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vctheme_runtime_{}", rand::random::<u64>()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        dir
    }

    #[tokio::test]
    async fn missing_config_file_keeps_defaults() {
        let dir = workspace().await;
        let mut runtime = VcThemeRuntime::new(VcThemeRuntimeKind::List, dir.clone(), "SoftX".to_string(), None);

        runtime.load_vctheme_config().unwrap();

        assert_eq!(runtime.configatron.get_tick_rate(), 250);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn config_file_overrides_defaults() {
        let dir = workspace().await;
        tokio::fs::write(
            dir.join("vctheme.config.json"),
            r#"{ "themesDir": "/srv/themes", "watchDebounce": 10 }"#,
        )
        .await
        .unwrap();

        let mut runtime = VcThemeRuntime::new(VcThemeRuntimeKind::List, dir.clone(), "SoftX".to_string(), None);
        runtime.load_vctheme_config().unwrap();

        assert_eq!(runtime.configatron.get_themes_dir(), PathBuf::from("/srv/themes"));
        assert_eq!(runtime.configatron.get_watch_debounce(), 10);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_config_file_is_critical() {
        let dir = workspace().await;
        tokio::fs::write(dir.join("vctheme.config.json"), "{ themesDir: ")
            .await
            .unwrap();

        let mut runtime = VcThemeRuntime::new(VcThemeRuntimeKind::List, dir.clone(), "SoftX".to_string(), None);
        let error = runtime.load_vctheme_config().unwrap_err();

        assert!(error.is_critical());
        assert_eq!(error.get_kind(), ErrorKind::ConfigFileParsingError);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn zero_tick_rate_in_config_file_is_rejected() {
        let dir = workspace().await;
        tokio::fs::write(dir.join("vctheme.config.json"), r#"{ "tickRate": 0 }"#)
            .await
            .unwrap();

        let mut runtime = VcThemeRuntime::new(VcThemeRuntimeKind::Open, dir.clone(), "SoftX".to_string(), None);
        let error = runtime.load_vctheme_config().unwrap_err();

        assert!(error.is_critical());
        assert_eq!(error.get_kind(), ErrorKind::ConfigFileParsingError);
        assert_eq!(runtime.configatron.get_tick_rate(), 250);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn command_modes_edit_the_given_file() {
        let dir = workspace().await;
        let css_file = dir.join("SoftX.theme.css");
        tokio::fs::write(
            &css_file,
            ":root {\n  --background-image: url(https://b.com/a.png);\n}\n",
        )
        .await
        .unwrap();

        let theme = crate::themes::find_theme(&crate::themes::builtin_themes(), "softx").unwrap();

        let mut add = VcThemeRuntime::new(
            VcThemeRuntimeKind::Add("https://b.com/b.png".to_string()),
            dir.clone(),
            "softx".to_string(),
            Some(css_file.clone()),
        );
        add.start_command_mode(theme.clone(), css_file.clone()).await.unwrap();

        let mut select = VcThemeRuntime::new(
            VcThemeRuntimeKind::Select("https://b.com/b.png".to_string()),
            dir.clone(),
            "softx".to_string(),
            Some(css_file.clone()),
        );
        select.start_command_mode(theme.clone(), css_file.clone()).await.unwrap();

        assert_eq!(
            tokio::fs::read_to_string(&css_file).await.unwrap(),
            ":root {\n  /*--background-image: url(https://b.com/a.png);*/\n  --background-image: url(https://b.com/b.png);\n}\n"
        );

        let mut delete = VcThemeRuntime::new(
            VcThemeRuntimeKind::Delete("https://b.com/b.png".to_string()),
            dir.clone(),
            "softx".to_string(),
            Some(css_file.clone()),
        );
        delete.start_command_mode(theme, css_file.clone()).await.unwrap();

        assert_eq!(
            tokio::fs::read_to_string(&css_file).await.unwrap(),
            ":root {\n  --background-image: url(https://b.com/a.png);\n}\n"
        );

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
