//! Main-thread dispatcher
//!
//! Host UI calls are only valid on the host's UI thread. Worker threads post
//! tasks through a cloneable `MainThreadSender`; the engine drains them in
//! FIFO order from `Engine::pump()`.

use crossbeam_channel::{unbounded, Receiver, Sender};
use hostlink_core::host::{ConsoleLevel, MessageLevel};
use hostlink_core::logging_facility::ConsoleSink;

/// Work deferred to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainThreadTask {
    /// Write a formatted line to the host console
    Console { level: ConsoleLevel, line: String },
    /// Show a message dialog
    Message {
        level: MessageLevel,
        title: String,
        text: String,
    },
    /// Rebuild the registry and UI from freshly loaded apps
    ReloadApps,
}

/// Thread-safe handle for posting main-thread tasks
#[derive(Debug, Clone)]
pub struct MainThreadSender {
    tx: Sender<MainThreadTask>,
}

impl MainThreadSender {
    /// Queue a task; dropped silently once the dispatcher is gone
    pub fn post(&self, task: MainThreadTask) {
        if self.tx.send(task).is_err() {
            tracing::debug!("main-thread dispatcher closed, task dropped");
        }
    }

    pub fn message(&self, level: MessageLevel, title: impl Into<String>, text: impl Into<String>) {
        self.post(MainThreadTask::Message {
            level,
            title: title.into(),
            text: text.into(),
        });
    }
}

impl ConsoleSink for MainThreadSender {
    fn emit(&self, level: ConsoleLevel, line: String) {
        // Never log from here: this runs inside the tracing layer
        let _ = self.tx.send(MainThreadTask::Console { level, line });
    }
}

/// FIFO queue of tasks for the UI thread
#[derive(Debug)]
pub struct MainThreadDispatcher {
    tx: Sender<MainThreadTask>,
    rx: Receiver<MainThreadTask>,
}

impl Default for MainThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MainThreadDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> MainThreadSender {
        MainThreadSender {
            tx: self.tx.clone(),
        }
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Take every queued task in posting order
    pub fn drain(&self) -> Vec<MainThreadTask> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fifo_order() {
        let dispatcher = MainThreadDispatcher::new();
        let sender = dispatcher.sender();

        sender.post(MainThreadTask::ReloadApps);
        sender.emit(ConsoleLevel::Info, "Pipeline engine: ready".to_string());

        assert_eq!(dispatcher.pending(), 2);
        assert_eq!(
            dispatcher.drain(),
            vec![
                MainThreadTask::ReloadApps,
                MainThreadTask::Console {
                    level: ConsoleLevel::Info,
                    line: "Pipeline engine: ready".to_string()
                },
            ]
        );
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn test_post_from_worker_threads() {
        let dispatcher = MainThreadDispatcher::new();

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let sender = dispatcher.sender();
                thread::spawn(move || {
                    sender.message(MessageLevel::Info, "worker", format!("done {}", i));
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(dispatcher.drain().len(), 4);
    }

    #[test]
    fn test_sender_outlives_dispatcher() {
        let dispatcher = MainThreadDispatcher::new();
        let sender = dispatcher.sender();
        drop(dispatcher);
        // Receiver is gone; posting must not panic
        sender.post(MainThreadTask::ReloadApps);
    }
}
