use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};
use rand::Rng;
use tokio::{
    runtime,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

#[derive(Clone, PartialEq, Debug)]
pub enum ObserverEvents {
    AsyncDebouncerError(String),
    StartingMessage(String),
    ModifiedPath(PathBuf),
}

/// Watches the loaded theme file and reports outside modifications of it.
///
/// The parent folder is watched instead of the file itself, since editors usually save by
/// replacing the file and a watch on the old inode would go silent.
#[derive(Debug)]
pub struct BaraddurObserver {
    observer_sender: UnboundedSender<ObserverEvents>,
    observer_receiver: UnboundedReceiver<ObserverEvents>,
}

impl BaraddurObserver {
    pub fn new() -> Self {
        let (observer_sender, observer_receiver) = mpsc::unbounded_channel();

        Self {
            observer_sender,
            observer_receiver,
        }
    }

    pub async fn next(&mut self) -> VcThemeResult<ObserverEvents> {
        self.observer_receiver.recv().await.ok_or_else(|| {
            VcThemeError::raise_general_observer_error(
                ErrorKind::ObserverEventReceiveFailed,
                "Error while receiving response from Barad-dûr observer sender: No response received.",
                ErrorAction::Notify,
            )
        })
    }

    pub fn start(&self, css_file_path: PathBuf, from_millis: u64) -> JoinHandle<()> {
        let observer_sender = self.observer_sender.clone();

        tokio::spawn(async move {
            if let Err(err) =
                Self::async_watch(observer_sender.clone(), css_file_path, from_millis).await
            {
                let notification = ObserverEvents::AsyncDebouncerError(err.get_message());
                if let Err(err) = observer_sender.send(notification) {
                    tracing::error!("{:?}", err);
                }
            }
        })
    }

    fn async_debouncer(
        observer_sender: UnboundedSender<ObserverEvents>,
        from_millis: u64,
    ) -> VcThemeResult<(
        Debouncer<RecommendedWatcher, RecommendedCache>,
        mpsc::Receiver<Result<Vec<DebouncedEvent>, Vec<notify::Error>>>,
    )> {
        let (debouncer_sender, debouncer_receiver) = mpsc::channel(1);
        let handle_view = runtime::Handle::current();

        let debouncer = new_debouncer(Duration::from_millis(from_millis), None, move |response| {
            let debouncer_sender = debouncer_sender.clone();
            let observer_sender = observer_sender.clone();

            handle_view.spawn(async move {
                if let Err(err) = debouncer_sender.send(response).await {
                    tracing::error!("{:?}", err);

                    let notification = ObserverEvents::AsyncDebouncerError(err.to_string());
                    if let Err(err) = observer_sender.send(notification) {
                        tracing::error!("{:?}", err);
                    }
                }
            });
        })
        .map_err(|err| {
            VcThemeError::raise_general_observer_error(
                ErrorKind::AsyncDebouncerCreationFailed,
                &format!("Failed to create the file observer: {}", err),
                ErrorAction::Notify,
            )
        })?;

        Ok((debouncer, debouncer_receiver))
    }

    async fn async_watch(
        observer_sender: UnboundedSender<ObserverEvents>,
        css_file_path: PathBuf,
        from_millis: u64,
    ) -> VcThemeResult<()> {
        let (mut debouncer, mut debouncer_receiver) =
            Self::async_debouncer(observer_sender.clone(), from_millis)?;

        let watched_file = canonical_path(&css_file_path);
        let watched_dir = watched_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debouncer
            .watch(&watched_dir, RecursiveMode::NonRecursive)
            .map_err(|err| {
                VcThemeError::raise_general_observer_error(
                    ErrorKind::DebouncerWatchFailed,
                    &format!("Failed to watch {:?}: {}", watched_dir, err),
                    ErrorAction::Notify,
                )
            })?;

        tracing::info!("Observing {:?} through {:?}", watched_file, watched_dir);

        if let Err(err) = observer_sender.send(ObserverEvents::StartingMessage(random_watch_message())) {
            tracing::error!("{:?}", err);
        }

        loop {
            tokio::select! {
                _ = observer_sender.closed() => {
                    break;
                }
                result = debouncer_receiver.recv() => {
                    match result {
                        Some(Ok(debounced_events)) => {
                            if debounced_events
                                .iter()
                                .any(|event| Self::touches_file(event, &watched_file))
                            {
                                let notification = ObserverEvents::ModifiedPath(css_file_path.clone());
                                if let Err(err) = observer_sender.send(notification) {
                                    tracing::error!("{:?}", err);
                                }
                            }
                        }
                        Some(Err(errors)) => {
                            tracing::error!("{:?}", errors);

                            let message = errors
                                .first()
                                .map(|err| err.to_string())
                                .unwrap_or_else(|| "Unknown observer error".to_string());

                            let notification = ObserverEvents::AsyncDebouncerError(message);
                            if let Err(err) = observer_sender.send(notification) {
                                tracing::error!("{:?}", err);
                            }

                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        drop(debouncer);

        Ok(())
    }

    /// True for modify and create events on the watched file.
    fn touches_file(debounced_event: &DebouncedEvent, watched_file: &Path) -> bool {
        match debounced_event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => debounced_event
                .paths
                .iter()
                .any(|path| canonical_path(path) == watched_file),
            _ => false,
        }
    }
}

fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn random_watch_message() -> String {
    let messages = [
        "Barad-dûr keeps watch over your theme. Outside edits will show up here.",
        "The Eye turns its gaze upon the theme file. Observing all...",
        "The Dark Tower stands vigilant. Every save of the theme will be noted.",
        "A shadow moves in the East... your backdrops are under careful surveillance.",
        "Barad-dûr has awakened. Changes made by other editors are being observed.",
    ];

    let idx = rand::thread_rng().gen_range(0..messages.len());

    String::from(messages[idx])
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use notify::{
        event::{CreateKind, ModifyKind, RemoveKind},
        Event, EventKind,
    };
    use notify_debouncer_full::DebouncedEvent;

    use crate::baraddur::{BaraddurObserver, ObserverEvents};

    fn debounced(kind: EventKind, path: &str) -> DebouncedEvent {
        DebouncedEvent::new(
            Event::new(kind).add_path(PathBuf::from(path)),
            std::time::Instant::now(),
        )
    }

    #[test]
    fn only_modify_and_create_on_the_file_count() {
        let watched = PathBuf::from("/nonexistent/themes/DiscordPlus.theme.css");

        assert!(BaraddurObserver::touches_file(
            &debounced(EventKind::Modify(ModifyKind::Any), "/nonexistent/themes/DiscordPlus.theme.css"),
            &watched
        ));
        assert!(BaraddurObserver::touches_file(
            &debounced(EventKind::Create(CreateKind::File), "/nonexistent/themes/DiscordPlus.theme.css"),
            &watched
        ));
        assert!(!BaraddurObserver::touches_file(
            &debounced(EventKind::Remove(RemoveKind::File), "/nonexistent/themes/DiscordPlus.theme.css"),
            &watched
        ));
        assert!(!BaraddurObserver::touches_file(
            &debounced(EventKind::Modify(ModifyKind::Any), "/nonexistent/themes/SoftX.theme.css"),
            &watched
        ));
    }

    #[tokio::test]
    async fn announces_itself_when_watching_starts() {
        let dir = std::env::temp_dir().join(format!("vctheme_observer_{}", rand::random::<u64>()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let css_file = dir.join("SoftX.theme.css");
        tokio::fs::write(&css_file, "a {}\n").await.unwrap();

        let mut observer = BaraddurObserver::new();
        let handle = observer.start(css_file.clone(), 50);

        let first = tokio::time::timeout(Duration::from_secs(5), observer.next())
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(first, ObserverEvents::StartingMessage(_)));

        handle.abort();
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
