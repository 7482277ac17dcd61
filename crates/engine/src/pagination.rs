//! Lazy iteration over cursor-paginated listings.
//!
//! [`PagedSequence`] turns a `fetch(token) -> Page<T>` function into a
//! [`Stream`] of items. It is an explicit state machine: a cursor, a buffer of
//! not-yet-yielded items, and at most one in-flight fetch. A page is requested
//! only once the buffer is drained, so a consumer that stops early never
//! triggers fetches it did not need.

use std::{
    collections::VecDeque,
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures_util::Stream;
use gluetty_types::{Page, PageToken};
use tracing::debug;

use crate::{
    error::FetchError,
    status::{StatusGuard, StatusIndicator},
};

enum Phase<Fut> {
    /// The next fetch will be issued with this cursor (`None` for the first page).
    Ready(Option<PageToken>),
    Fetching(Pin<Box<Fut>>),
    /// The final page arrived; only buffered items remain.
    Exhausted,
    Finished,
}

/// One-pass stream over every item of a paginated listing.
///
/// Items are yielded in page order and, within a page, in the order the fetch
/// returned them. The stream ends after the first page without a continuation
/// token. A failed fetch is yielded once as `Err` and ends the stream; items
/// yielded before it are unaffected.
///
/// When built with [`with_status`](Self::with_status), the loading message is
/// shown from construction and cleared exactly once: when the final page
/// arrives, when a fetch fails, or when the stream is dropped early.
pub struct PagedSequence<T, F, Fut> {
    fetch: F,
    phase: Phase<Fut>,
    buffer: VecDeque<T>,
    guard: Option<StatusGuard>,
    pages_fetched: usize,
}

impl<T, F, Fut> PagedSequence<T, F, Fut>
where
    F: FnMut(Option<PageToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    /// Nothing is fetched until the stream is first polled.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            phase: Phase::Ready(None),
            buffer: VecDeque::new(),
            guard: None,
            pages_fetched: 0,
        }
    }

    /// Show `message` on `indicator` until the listing is finished or dropped.
    pub fn with_status(mut self, indicator: Arc<dyn StatusIndicator>, message: &str) -> Self {
        self.guard = Some(StatusGuard::acquire(indicator, message));
        self
    }

    /// Number of fetches that completed successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn release_status(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            guard.release();
        }
    }
}

// The in-flight future is boxed and never pin-projected.
impl<T, F, Fut> Unpin for PagedSequence<T, F, Fut> {}

impl<T, F, Fut> Stream for PagedSequence<T, F, Fut>
where
    F: FnMut(Option<PageToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    type Item = Result<T, FetchError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            match std::mem::replace(&mut this.phase, Phase::Finished) {
                Phase::Ready(token) => {
                    debug!(page = this.pages_fetched + 1, has_token = token.is_some(), "fetching page");
                    this.phase = Phase::Fetching(Box::pin((this.fetch)(token)));
                }
                Phase::Fetching(mut pending) => match pending.as_mut().poll(cx) {
                    Poll::Pending => {
                        this.phase = Phase::Fetching(pending);
                        return Poll::Pending;
                    }
                    Poll::Ready(Ok(page)) => {
                        this.pages_fetched += 1;
                        debug!(
                            page = this.pages_fetched,
                            items = page.items.len(),
                            last = page.is_last(),
                            "page fetched"
                        );
                        this.buffer.extend(page.items);
                        match page.next_token {
                            Some(token) => this.phase = Phase::Ready(Some(token)),
                            None => {
                                this.release_status();
                                this.phase = Phase::Exhausted;
                            }
                        }
                    }
                    Poll::Ready(Err(error)) => {
                        this.release_status();
                        debug!(operation = error.operation(), "page fetch failed");
                        return Poll::Ready(Some(Err(error)));
                    }
                },
                Phase::Exhausted | Phase::Finished => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.phase {
            Phase::Exhausted | Phase::Finished => (self.buffer.len(), Some(self.buffer.len())),
            _ => (self.buffer.len(), None),
        }
    }
}

impl<T, F, Fut> fmt::Debug for PagedSequence<T, F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Ready(_) => "ready",
            Phase::Fetching(_) => "fetching",
            Phase::Exhausted => "exhausted",
            Phase::Finished => "finished",
        };
        f.debug_struct("PagedSequence")
            .field("phase", &phase)
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::{StreamExt, TryStreamExt, future};

    use super::*;
    use crate::status::StatusBar;

    fn scripted(pages: Vec<Page<&'static str>>) -> (Arc<Mutex<Vec<Option<PageToken>>>>, impl FnMut(Option<PageToken>) -> future::Ready<Result<Page<&'static str>, FetchError>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let mut pages = pages.into_iter();
        let fetch = move |token: Option<PageToken>| {
            seen.lock().expect("calls lock").push(token);
            let page = pages.next().ok_or_else(|| FetchError::new("GetJobs", anyhow::anyhow!("no more pages")));
            future::ready(page)
        };
        (calls, fetch)
    }

    #[tokio::test]
    async fn yields_concatenated_pages_and_forwards_tokens() {
        let (calls, fetch) = scripted(vec![
            Page::new(vec!["job1", "job2"], Some(PageToken::new("x"))),
            Page::last(vec!["job3"]),
        ]);

        let items: Vec<_> = PagedSequence::new(fetch).try_collect().await.expect("listing");

        assert_eq!(items, vec!["job1", "job2", "job3"]);
        assert_eq!(*calls.lock().expect("calls lock"), vec![None, Some(PageToken::new("x"))]);
    }

    #[tokio::test]
    async fn empty_intermediate_pages_are_skipped() {
        let (calls, fetch) = scripted(vec![
            Page::new(vec![], Some(PageToken::new("a"))),
            Page::new(vec!["only"], Some(PageToken::new("b"))),
            Page::last(vec![]),
        ]);

        let items: Vec<_> = PagedSequence::new(fetch).try_collect().await.expect("listing");

        assert_eq!(items, vec!["only"]);
        assert_eq!(calls.lock().expect("calls lock").len(), 3);
    }

    #[tokio::test]
    async fn does_not_fetch_until_polled_or_beyond_need() {
        let (calls, fetch) = scripted(vec![
            Page::new(vec!["job1"], Some(PageToken::new("x"))),
            Page::last(vec!["job2"]),
        ]);

        let mut sequence = PagedSequence::new(fetch);
        assert!(calls.lock().expect("calls lock").is_empty());

        let first = sequence.next().await.expect("item").expect("ok");
        assert_eq!(first, "job1");
        assert_eq!(sequence.pages_fetched(), 1);
        assert_eq!(calls.lock().expect("calls lock").len(), 1);
    }

    #[tokio::test]
    async fn error_ends_the_stream_after_earlier_items() {
        let (_, fetch) = scripted(vec![Page::new(vec!["job1"], Some(PageToken::new("x")))]);
        let bar = StatusBar::new();

        let mut sequence = PagedSequence::new(fetch).with_status(bar.clone(), "Loading Glue Jobs...");
        assert_eq!(sequence.next().await.expect("item").expect("ok"), "job1");

        let error = sequence.next().await.expect("error item").expect_err("fetch error");
        assert_eq!(error.operation(), "GetJobs");
        assert!(bar.active_messages().is_empty());
        assert!(sequence.next().await.is_none());
    }
}
