use crate::state::{Action, AppState};
use futures::future::BoxFuture;
use futures::{stream, FutureExt, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tickerboard_chart::Theme;
use tickerboard_market::error::Result as FetchResult;
use tickerboard_market::{fetch_series, DailyRecord, DailySource, DateRange, TrackedSymbol};
use tracing::{debug, error, info};

/// What became of one add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { symbol: String, records: usize },
    /// Already tracked or already being fetched; nothing was requested.
    Duplicate(String),
    /// Blank input.
    Empty,
    Failed { symbol: String, reason: String },
}

/// A fetch that has been started but not folded into the state yet.
pub type PendingFetch = BoxFuture<'static, (String, FetchResult<Vec<DailyRecord>>)>;

/// The first half of an add: either a fetch to drive, or an answer that
/// needed no request at all.
pub enum AddRequest {
    Fetch { symbol: String, fetch: PendingFetch },
    Settled(AddOutcome),
}

/// Trim and uppercase user input; `None` when nothing is left.
pub fn normalize_symbol(input: &str) -> Option<String> {
    let symbol = input.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

/// Owns the dashboard state and is the only thing that changes it.
pub struct Controller<S> {
    source: Arc<S>,
    state: AppState,
    max_in_flight: usize,
    /// Symbols with a fetch out that has not settled.
    in_flight: HashSet<String>,
}

impl<S: DailySource + 'static> Controller<S> {
    pub fn new(source: S, state: AppState, max_in_flight: usize) -> Self {
        Self {
            source: Arc::new(source),
            state,
            max_in_flight: max_in_flight.max(1),
            in_flight: HashSet::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    fn dispatch(&mut self, action: Action) {
        self.state = std::mem::take(&mut self.state).reduce(action);
    }

    /// Check `input` and, when it needs fetching, start the request over
    /// the current range.
    ///
    /// Blank input, a tracked symbol or one already being fetched settle
    /// right away without a request. The returned fetch does not borrow the
    /// controller, so other actions can run while it is out; hand its
    /// result to [`finish_add`](Self::finish_add).
    pub fn begin_add(&mut self, input: &str) -> AddRequest {
        let Some(symbol) = normalize_symbol(input) else {
            return AddRequest::Settled(AddOutcome::Empty);
        };
        if self.state.is_tracked(&symbol) || self.in_flight.contains(&symbol) {
            debug!("[{symbol}] already tracked or in flight; skipping fetch");
            return AddRequest::Settled(AddOutcome::Duplicate(symbol));
        }
        self.in_flight.insert(symbol.clone());

        let source = Arc::clone(&self.source);
        let range = self.state.range;
        let key = symbol.clone();
        let fetch = async move {
            let result = fetch_series(source.as_ref(), &key, range.start, range.end).await;
            (key, result)
        }
        .boxed();
        AddRequest::Fetch { symbol, fetch }
    }

    /// Fold a finished fetch into the state.
    pub fn finish_add(
        &mut self,
        symbol: String,
        result: FetchResult<Vec<DailyRecord>>,
    ) -> AddOutcome {
        self.in_flight.remove(&symbol);
        settle(&mut self.state, symbol, result)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Fetch `input` over the current range and track it.
    ///
    /// A duplicate or blank symbol returns before any request is made. A
    /// failed fetch leaves the tracked list as it was.
    pub async fn add(&mut self, input: &str) -> AddOutcome {
        match self.begin_add(input) {
            AddRequest::Fetch { fetch, .. } => {
                let (symbol, result) = fetch.await;
                self.finish_add(symbol, result)
            }
            AddRequest::Settled(outcome) => outcome,
        }
    }

    /// Add several symbols with their fetches running side by side.
    ///
    /// Entries are appended as their fetches complete, so the final order
    /// follows completion rather than `inputs`. `on_settle` sees each
    /// outcome as it lands.
    pub async fn add_many<I, F>(&mut self, inputs: I, mut on_settle: F) -> Vec<AddOutcome>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: FnMut(&AddOutcome),
    {
        let mut outcomes = Vec::new();
        let mut fetches = Vec::new();
        for input in inputs {
            match self.begin_add(input.as_ref()) {
                AddRequest::Fetch { fetch, .. } => fetches.push(fetch),
                AddRequest::Settled(outcome) => {
                    on_settle(&outcome);
                    outcomes.push(outcome);
                }
            }
        }

        let mut landed = stream::iter(fetches).buffer_unordered(self.max_in_flight);
        while let Some((symbol, result)) = landed.next().await {
            let outcome = self.finish_add(symbol, result);
            on_settle(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    pub fn remove(&mut self, input: &str) -> bool {
        let Some(symbol) = normalize_symbol(input) else {
            return false;
        };
        let known = self.state.is_tracked(&symbol)
            || self.state.failures.iter().any(|f| f.symbol == symbol);
        self.dispatch(Action::Remove(symbol));
        known
    }

    /// Only affects symbols added from now on.
    pub fn set_range(&mut self, range: DateRange) {
        self.dispatch(Action::SetRange(range));
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.dispatch(Action::ToggleTheme);
        self.state.theme
    }
}

/// Log the result and apply the matching action.
fn settle(state: &mut AppState, symbol: String, result: FetchResult<Vec<DailyRecord>>) -> AddOutcome {
    let (action, outcome) = match result {
        Ok(data) => {
            info!("[{symbol}] tracked with {} daily records", data.len());
            let outcome = AddOutcome::Added {
                symbol: symbol.clone(),
                records: data.len(),
            };
            (Action::Add(TrackedSymbol::new(symbol, data)), outcome)
        }
        Err(e) => {
            error!("[{symbol}] fetch failed: {e}");
            let reason = e.to_string();
            let outcome = AddOutcome::Failed {
                symbol: symbol.clone(),
                reason: reason.clone(),
            };
            (Action::FetchFailed { symbol, reason }, outcome)
        }
    };
    *state = std::mem::take(state).reduce(action);
    outcome
}
