use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use veridoc_core::{Document, DocumentId};

use crate::VeridocClient;
use crate::error::Error;

/// Anything that can report the current state of a document.
///
/// Implemented by [`VeridocClient`]; kept as a trait so polling behaviour
/// can be tested without a running server.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current document record.
    async fn fetch(&self, id: &DocumentId) -> Result<Document, Error>;

    /// Enumerate known documents, newest first.
    ///
    /// Sources that cannot enumerate return an empty list, which makes
    /// [`Poller::resume`] a no-op for them.
    async fn list(&self) -> Result<Vec<Document>, Error> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl StatusSource for VeridocClient {
    async fn fetch(&self, id: &DocumentId) -> Result<Document, Error> {
        self.get_document(id).await
    }

    async fn list(&self) -> Result<Vec<Document>, Error> {
        self.list_documents().await
    }
}

/// Polls a document at a fixed interval until extraction resolves.
///
/// Retryable errors (connection failures, 5xx responses) are swallowed and
/// count as a missed poll; anything else aborts immediately.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    max_polls: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 150,
        }
    }
}

impl Poller {
    /// Create a poller with the given interval and attempt budget.
    #[must_use]
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    /// Poll until the document reaches a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PollTimeout`] when the budget runs out, or the
    /// first non-retryable error from the source.
    pub async fn poll_until_terminal(
        &self,
        source: &dyn StatusSource,
        id: &DocumentId,
    ) -> Result<Document, Error> {
        for _ in 0..self.max_polls {
            match source.fetch(id).await {
                Ok(document) if document.status.is_terminal() => return Ok(document),
                Ok(_) => {}
                Err(e) if e.is_retryable() => {}
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.interval).await;
        }
        Err(Error::PollTimeout(id.to_string(), self.max_polls))
    }

    /// Watch several documents at once, one polling task per document.
    ///
    /// Each task sends its final document on the returned channel and
    /// stops; documents that never resolve are dropped silently once the
    /// attempt budget runs out. Dropping the receiver cancels nothing on
    /// the server side.
    #[must_use]
    pub fn watch(
        &self,
        source: Arc<dyn StatusSource>,
        ids: Vec<DocumentId>,
    ) -> mpsc::Receiver<Document> {
        let (tx, rx) = mpsc::channel(ids.len().max(1));
        for id in ids {
            let poller = self.clone();
            let source = Arc::clone(&source);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Ok(document) = poller.poll_until_terminal(source.as_ref(), &id).await {
                    let _ = tx.send(document).await;
                }
            });
        }
        rx
    }

    /// Pick up watching every document the source still reports as pending.
    ///
    /// This is the page-reload behaviour: list everything, then watch
    /// whatever has not resolved yet.
    ///
    /// # Errors
    ///
    /// Propagates the listing error from the source.
    pub async fn resume(
        &self,
        source: Arc<dyn StatusSource>,
    ) -> Result<mpsc::Receiver<Document>, Error> {
        let pending = source
            .list()
            .await?
            .into_iter()
            .filter(|d| !d.status.is_terminal())
            .map(|d| d.id)
            .collect();
        Ok(self.watch(source, pending))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use veridoc_core::{DocumentStatus, Extraction};

    /// Returns pending for the first `pending_polls` fetches, then processed.
    struct ScriptedSource {
        document: Document,
        pending_polls: u32,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new(pending_polls: u32) -> Self {
            Self {
                document: Document::new("card.jpg", "uploads/1-card.jpg", "image/jpeg"),
                pending_polls,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch(&self, _id: &DocumentId) -> Result<Document, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut document = self.document.clone();
            if call >= self.pending_polls {
                document.status = DocumentStatus::Processed;
                document.extraction = Some(Extraction::default());
            }
            Ok(document)
        }
    }

    struct FlakySource {
        inner: ScriptedSource,
        failures: AtomicU32,
    }

    #[async_trait]
    impl StatusSource for FlakySource {
        async fn fetch(&self, id: &DocumentId) -> Result<Document, Error> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                    (n > 0).then(|| n - 1)
                })
                .is_ok()
            {
                return Err(Error::Connection("connection refused".into()));
            }
            self.inner.fetch(id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_once_status_is_terminal() {
        let source = ScriptedSource::new(3);
        let id = source.document.id.clone();

        let document = Poller::new(Duration::from_secs(2), 10)
            .poll_until_terminal(&source, &id)
            .await
            .unwrap();

        assert_eq!(document.status, DocumentStatus::Processed);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_attempt_budget() {
        let source = ScriptedSource::new(u32::MAX);
        let id = source.document.id.clone();

        let err = Poller::new(Duration::from_secs(2), 5)
            .poll_until_terminal(&source, &id)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PollTimeout(_, 5)));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_swallowed() {
        let source = FlakySource {
            inner: ScriptedSource::new(0),
            failures: AtomicU32::new(2),
        };
        let id = source.inner.document.id.clone();

        let document = Poller::new(Duration::from_secs(2), 10)
            .poll_until_terminal(&source, &id)
            .await
            .unwrap();

        assert_eq!(document.status, DocumentStatus::Processed);
    }

    /// Several documents, each pending for a fixed number of fetches.
    struct MultiSource {
        documents: Vec<Document>,
        pending_polls: u32,
        calls: std::sync::Mutex<std::collections::HashMap<String, u32>>,
    }

    impl MultiSource {
        fn new(documents: Vec<Document>, pending_polls: u32) -> Self {
            Self {
                documents,
                pending_polls,
                calls: std::sync::Mutex::new(std::collections::HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StatusSource for MultiSource {
        async fn fetch(&self, id: &DocumentId) -> Result<Document, Error> {
            let mut document = self
                .documents
                .iter()
                .find(|d| d.id == *id)
                .cloned()
                .ok_or_else(|| Error::Api {
                    status: 404,
                    message: "Document not found".into(),
                })?;
            let call = {
                let mut calls = self.calls.lock().unwrap();
                let counter = calls.entry(id.to_string()).or_insert(0);
                *counter += 1;
                *counter
            };
            if document.status == DocumentStatus::Pending && call > self.pending_polls {
                document.status = DocumentStatus::Processed;
            }
            Ok(document)
        }

        async fn list(&self) -> Result<Vec<Document>, Error> {
            Ok(self.documents.clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn watch_reports_each_document_once() {
        let a = Document::new("a.jpg", "uploads/1-a.jpg", "image/jpeg");
        let b = Document::new("b.jpg", "uploads/2-b.jpg", "image/jpeg");
        let ids = vec![a.id.clone(), b.id.clone()];
        let source = Arc::new(MultiSource::new(vec![a, b], 2));

        let mut rx = Poller::new(Duration::from_secs(2), 10).watch(source, ids);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.status.is_terminal());
        assert!(second.status.is_terminal());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn resume_watches_only_pending_documents() {
        let pending = Document::new("pending.jpg", "uploads/1-pending.jpg", "image/jpeg");
        let mut done = Document::new("done.jpg", "uploads/2-done.jpg", "image/jpeg");
        done.status = DocumentStatus::Failed;
        let pending_id = pending.id.clone();
        let source = Arc::new(MultiSource::new(vec![pending, done], 1));

        let mut rx = Poller::new(Duration::from_secs(2), 10)
            .resume(source)
            .await
            .unwrap();

        let resolved = rx.recv().await.unwrap();
        assert_eq!(resolved.id, pending_id);
        // The already-failed document is not re-watched.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_abort() {
        struct NotFoundSource;

        #[async_trait]
        impl StatusSource for NotFoundSource {
            async fn fetch(&self, _id: &DocumentId) -> Result<Document, Error> {
                Err(Error::Api {
                    status: 404,
                    message: "Document not found".into(),
                })
            }
        }

        let err = Poller::default()
            .poll_until_terminal(&NotFoundSource, &DocumentId::from("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 404, .. }));
    }
}
