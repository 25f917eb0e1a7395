use hashbrown::HashSet;
use tokio::sync::oneshot;

use crate::LoaderError;

/// Outstanding urls of one load. Settles its channel exactly once: when the
/// last url completes, or on the first fatal failure.
#[derive(Debug)]
pub(crate) struct PendingLoad {
    outstanding: HashSet<String>,
    settle: Option<oneshot::Sender<Result<(), LoaderError>>>,
}

impl PendingLoad {
    pub fn new<I>(urls: I) -> (Self, oneshot::Receiver<Result<(), LoaderError>>)
    where
        I: IntoIterator<Item = String>,
    {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                outstanding: urls.into_iter().collect(),
                settle: Some(tx),
            },
            rx,
        )
    }

    pub fn complete(&mut self, url: &str) {
        self.outstanding.remove(url);
        if self.outstanding.is_empty() {
            self.settle(Ok(()));
        }
    }

    pub fn fail(&mut self, err: LoaderError) {
        self.settle(Err(err));
    }

    fn settle(&mut self, result: Result<(), LoaderError>) {
        if let Some(tx) = self.settle.take() {
            // the caller may have dropped the future
            let _ = tx.send(result);
        }
    }
}
