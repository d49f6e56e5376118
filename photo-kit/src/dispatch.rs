//! The UI-thread boundary.
//!
//! Change notifications arrive on platform background threads, but no held
//! fetch result may be mutated off the UI thread. Observers hand their swap
//! tasks to a [`MainDispatcher`]; the application decides how those tasks
//! reach its UI thread.

use std::sync::Arc;

use tokio::sync::mpsc;

pub type MainTask = Box<dyn FnOnce() + Send>;

/// Runs tasks on the thread that owns the UI state.
pub trait MainDispatcher: Send + Sync {
    fn dispatch(&self, task: MainTask);
}

/// Queues tasks on an unbounded channel for the application to pump on its
/// UI thread. FIFO, so a burst of notifications is applied in arrival order.
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<MainTask>,
}

impl ChannelDispatcher {
    pub fn new() -> (Arc<Self>, MainTaskReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), MainTaskReceiver { rx })
    }
}

impl MainDispatcher for ChannelDispatcher {
    fn dispatch(&self, task: MainTask) {
        if self.tx.send(task).is_err() {
            log::warn!("main task receiver dropped; discarding dispatched task");
        }
    }
}

/// The receiving end of a [`ChannelDispatcher`]. Owned by the UI thread.
pub struct MainTaskReceiver {
    rx: mpsc::UnboundedReceiver<MainTask>,
}

impl MainTaskReceiver {
    /// Awaits and runs the next task. Returns `false` once every dispatcher
    /// handle has been dropped.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Runs everything currently queued without blocking; returns how many
    /// tasks ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }
}

/// Runs tasks inline on the calling thread. For tests and hosts whose
/// notification delivery is already single-threaded.
pub struct ImmediateDispatcher;

impl MainDispatcher for ImmediateDispatcher {
    fn dispatch(&self, task: MainTask) {
        task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_immediate_dispatcher_runs_inline() {
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        ImmediateDispatcher.dispatch(Box::new(move || *flag.lock().unwrap() = true));
        assert!(*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_channel_dispatcher_preserves_order() {
        let (dispatcher, mut receiver) = ChannelDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.dispatch(Box::new(move || order.lock().unwrap().push(label)));
        }

        assert_eq!(receiver.drain(), 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_run_next_runs_one_task() {
        let (dispatcher, mut receiver) = ChannelDispatcher::new();
        let ran = Arc::new(Mutex::new(0));

        let count = Arc::clone(&ran);
        dispatcher.dispatch(Box::new(move || *count.lock().unwrap() += 1));

        assert!(receiver.run_next().await);
        assert_eq!(*ran.lock().unwrap(), 1);

        drop(dispatcher);
        assert!(!receiver.run_next().await);
    }
}
