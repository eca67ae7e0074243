use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle for one issued search
#[derive(Debug, Clone)]
pub struct SearchTicket {
    seq: u64,
    token: CancellationToken,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Resolves once a newer search was issued or the view was left
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Last-request-wins bookkeeping.
///
/// Every issue bumps a sequence number and cancels the previous ticket. A
/// response is only applied if its ticket is still the latest, which also
/// covers responses that complete in the gap before cancellation is observed.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> SearchTicket {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        debug!("Issued search #{}", seq);
        SearchTicket { seq, token }
    }

    pub fn is_latest(&self, ticket: &SearchTicket) -> bool {
        !ticket.is_cancelled() && self.latest.load(Ordering::SeqCst) == ticket.seq
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Invalidate whatever is in flight without issuing a new search
    pub fn cancel_all(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        self.latest.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = current.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let sequencer = SearchSequencer::new();
        let first = sequencer.issue();
        assert!(sequencer.is_latest(&first));

        let second = sequencer.issue();
        assert!(first.is_cancelled());
        assert!(!sequencer.is_latest(&first));
        assert!(sequencer.is_latest(&second));
        assert!(second.seq() > first.seq());
    }

    #[test]
    fn test_cancel_all_invalidates_in_flight() {
        let sequencer = SearchSequencer::new();
        let ticket = sequencer.issue();
        sequencer.cancel_all();
        assert!(ticket.is_cancelled());
        assert!(!sequencer.is_latest(&ticket));

        let next = sequencer.issue();
        assert!(sequencer.is_latest(&next));
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let sequencer = SearchSequencer::new();
        let ticket = sequencer.issue();
        let _newer = sequencer.issue();
        // Would hang if the old token were not cancelled
        ticket.cancelled().await;
    }
}
