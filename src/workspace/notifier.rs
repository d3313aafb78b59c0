use log::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Surfaces outcomes the user has to see, such as a failed save.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Reports notices through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Info(message) => info!("{}", message),
            Notice::Error(message) => warn!("{}", message),
        }
    }
}
