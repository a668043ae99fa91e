//! Cached history query.

use pocketchat_types::message::Message;
use pocketchat_types::procedure::ListMessagesInput;
use tracing::debug;

use super::caller::{ClientError, ProcedureCaller};

/// Client-side cache of one `listMessages` result.
///
/// Starts stale. `fetch` refetches only when stale; mutations mark it stale
/// through `invalidate`.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    limit: u32,
    data: Option<Vec<Message>>,
    stale: bool,
}

impl HistoryQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            data: None,
            stale: true,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Last fetched rows, possibly stale.
    pub fn data(&self) -> Option<&[Message]> {
        self.data.as_deref()
    }

    /// Current rows, refetched first when stale.
    ///
    /// On failure the previous data is kept and the query stays stale.
    pub async fn fetch<C: ProcedureCaller>(&mut self, caller: &C) -> Result<&[Message], ClientError> {
        if self.stale || self.data.is_none() {
            let rows = caller
                .list_messages(ListMessagesInput::with_limit(self.limit))
                .await?;
            debug!(count = rows.len(), limit = self.limit, "History refetched");
            self.data = Some(rows);
            self.stale = false;
        }
        Ok(self.data.as_deref().unwrap_or_default())
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new(pocketchat_types::procedure::DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InProcessCaller;
    use crate::context::RequestContext;
    use crate::procedure::Procedures;
    use crate::testing::{MemoryRepository, ScriptedProvider};
    use pocketchat_types::identity::Identity;
    use pocketchat_types::procedure::AddUserMessageInput;

    fn caller() -> InProcessCaller<MemoryRepository, ScriptedProvider> {
        InProcessCaller::new(
            Procedures::new(ScriptedProvider::replying("ok")),
            RequestContext::authenticated(MemoryRepository::new(), Identity::new("user_123")),
        )
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let caller = caller();
        let mut history = HistoryQuery::default();
        assert!(history.is_stale());
        assert!(history.data().is_none());

        assert!(history.fetch(&caller).await.unwrap().is_empty());
        assert!(history.fetch(&caller).await.unwrap().is_empty());
        assert_eq!(caller.context().repository.list_count(), 1);

        caller
            .add_user_message(AddUserMessageInput {
                content: "hi".into(),
            })
            .await
            .unwrap();
        // Still serving the cached (now outdated) rows.
        assert!(history.fetch(&caller).await.unwrap().is_empty());

        history.invalidate();
        assert_eq!(history.fetch(&caller).await.unwrap().len(), 1);
        assert_eq!(caller.context().repository.list_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_rows() {
        let caller = caller();
        let mut history = HistoryQuery::new(10);
        history.fetch(&caller).await.unwrap();

        caller.context().repository.set_failing(true);
        history.invalidate();
        assert!(history.fetch(&caller).await.is_err());
        assert!(history.is_stale());
        assert_eq!(history.data(), Some(&[][..]));
    }
}
