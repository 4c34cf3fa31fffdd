//! The dual-source state controller. One generic controller owns the
//! general/tailored variant pair for a selection and category; per-category
//! sources plug in via [`VariantSource`]. All gateway errors stop here.

pub mod source;

pub use source::{GeneratedVariant, MarketingSource, OpportunitySource, SummarySource, VariantSource};

use crate::context::AppContext;
use crate::domain::Selection;
use crate::view::Toast;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailoredState {
    Absent,
    Generating,
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    General,
    Tailored,
}

/// Both variants of one analytical category, with their in-flight flags.
/// `general: None` means not loaded (never fetched, or the fetch failed);
/// `Some(vec![])` means the store answered with no rows.
#[derive(Debug, Clone)]
pub struct VariantPair<R> {
    pub general: Option<Vec<R>>,
    pub tailored: Option<Vec<R>>,
    pub fetching_general: bool,
    pub fetching_tailored: bool,
    pub tailored_state: TailoredState,
}

impl<R> VariantPair<R> {
    pub fn idle() -> Self {
        Self {
            general: None,
            tailored: None,
            fetching_general: false,
            fetching_tailored: false,
            tailored_state: TailoredState::Absent,
        }
    }
}

impl<R> Default for VariantPair<R> {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug)]
pub enum GenerateOutcome {
    Generated { credits_used: i64, toast: Toast },
    /// A request is already outstanding; nothing was submitted.
    AlreadyGenerating,
    NoSelection,
    MissingOrganization,
    /// The selection changed while the call was in flight; the result was
    /// discarded and no credits were spent.
    SelectionChanged,
    Failed { toast: Toast },
}

struct Inner<R> {
    selection: Option<Selection>,
    /// Bumped on every selection change. Results carry the epoch they were
    /// issued under and are discarded when it no longer matches.
    epoch: u64,
    pair: VariantPair<R>,
    active_tab: ActiveTab,
}

pub struct DualSourceController<S: VariantSource> {
    source: S,
    context: Arc<AppContext>,
    inner: Mutex<Inner<S::Record>>,
}

impl<S: VariantSource> DualSourceController<S> {
    pub fn new(source: S, context: Arc<AppContext>) -> Self {
        Self {
            source,
            context,
            inner: Mutex::new(Inner {
                selection: None,
                epoch: 0,
                pair: VariantPair::idle(),
                active_tab: ActiveTab::General,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S::Record>> {
        // Awaits never happen under this lock; poisoning only means a panic
        // elsewhere, so take the state as-is.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Change what is being displayed. Everything cached for the previous
    /// selection is dropped before any new data can land.
    pub fn set_selection(&self, selection: Selection) {
        let mut inner = self.lock();
        if inner.selection == Some(selection) {
            return;
        }
        inner.selection = Some(selection);
        inner.epoch += 1;
        inner.pair = VariantPair::idle();
        inner.active_tab = ActiveTab::General;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.lock().selection
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.lock().active_tab
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        self.lock().active_tab = tab;
    }

    pub fn snapshot(&self) -> VariantPair<S::Record> {
        self.lock().pair.clone()
    }

    /// Fetch both variants for the current selection. The fetches run
    /// concurrently and may complete in either order; they write to disjoint
    /// slots. Failures are reported as toasts, never propagated.
    pub async fn refresh(&self) -> Vec<Toast> {
        let (selection, epoch, fetch_tailored) = {
            let mut inner = self.lock();
            let Some(selection) = inner.selection else {
                return Vec::new();
            };
            // An outstanding generation owns the tailored slot; a refresh on
            // the same selection must not knock it back to Absent and reopen
            // the submit guard. Only `set_selection` resets the whole pair.
            let generating = inner.pair.tailored_state == TailoredState::Generating;
            inner.pair.general = None;
            inner.pair.fetching_general = true;
            let fetch_tailored = selection.organization_id.is_some() && !generating;
            if !generating {
                inner.pair.tailored = None;
                inner.pair.tailored_state = TailoredState::Absent;
            }
            inner.pair.fetching_tailored = fetch_tailored;
            (selection, inner.epoch, fetch_tailored)
        };

        let general_fut = self.source.fetch_general(&selection);
        let tailored_fut = async {
            match selection.organization_id {
                Some(organization_id) if fetch_tailored => {
                    Some(self.source.fetch_tailored(&selection, organization_id).await)
                }
                _ => None,
            }
        };
        let (general_res, tailored_res) = tokio::join!(general_fut, tailored_fut);

        let category = self.source.category();
        let mut toasts = Vec::new();
        let mut inner = self.lock();
        if inner.epoch != epoch {
            // Selection moved on while the fetches were in flight.
            tracing::debug!(%category, "discarding stale fetch results");
            return Vec::new();
        }

        inner.pair.fetching_general = false;
        match general_res {
            Ok(records) => inner.pair.general = Some(records),
            Err(crate::error::GatewayError::NotFound) => {
                // Expected terminal state: nothing analyzed for this period.
                inner.pair.general = Some(Vec::new());
            }
            Err(err) => {
                tracing::warn!(%category, error = %err, "general fetch failed");
                toasts.push(Toast::error(format!(
                    "Could not load {category} data. Please try again."
                )));
            }
        }

        inner.pair.fetching_tailored = false;
        match tailored_res {
            None => {}
            Some(_) if inner.pair.tailored_state == TailoredState::Generating => {
                // A generation started while this fetch was in flight; its
                // completion owns the tailored slot now.
            }
            Some(Ok(records)) if records.is_empty() => {
                // Not yet generated; a valid state, not a failure.
                inner.pair.tailored = None;
                inner.pair.tailored_state = TailoredState::Absent;
            }
            Some(Ok(records)) => {
                inner.pair.tailored = Some(records);
                inner.pair.tailored_state = TailoredState::Present;
            }
            Some(Err(err)) => {
                tracing::warn!(%category, error = %err, "tailored fetch failed");
                inner.pair.tailored_state = TailoredState::Absent;
                toasts.push(Toast::error(format!(
                    "Could not load tailored {category} data. Please try again."
                )));
            }
        }

        toasts
    }

    /// Trigger tailored generation for the current selection. A no-op while
    /// a request is already outstanding. On success the new records fully
    /// replace the tailored slot, the active tab switches to tailored, and
    /// the reported credit usage is spent against the shared context. A
    /// result arriving after a selection change is discarded unspent.
    pub async fn generate_tailored(&self) -> GenerateOutcome {
        let (selection, organization_id, epoch) = {
            let mut inner = self.lock();
            let Some(selection) = inner.selection else {
                return GenerateOutcome::NoSelection;
            };
            let Some(organization_id) = selection.organization_id else {
                return GenerateOutcome::MissingOrganization;
            };
            if inner.pair.tailored_state == TailoredState::Generating {
                return GenerateOutcome::AlreadyGenerating;
            }
            inner.pair.tailored_state = TailoredState::Generating;
            (selection, organization_id, inner.epoch)
        };

        let category = self.source.category();
        let result = self
            .source
            .generate_tailored(&selection, organization_id)
            .await;

        let mut inner = self.lock();
        if inner.epoch != epoch {
            tracing::debug!(%category, "discarding stale generation result");
            return GenerateOutcome::SelectionChanged;
        }

        match result {
            Ok(generated) => {
                inner.pair.tailored = Some(generated.records);
                inner.pair.tailored_state = TailoredState::Present;
                inner.active_tab = ActiveTab::Tailored;
                drop(inner);
                self.context.spend_credits(generated.credits_used);
                GenerateOutcome::Generated {
                    credits_used: generated.credits_used,
                    toast: Toast::info(format!("Tailored {category} content is ready.")),
                }
            }
            Err(err) => {
                // Generation failure returns to Absent; it is retryable, not
                // a persisted error state.
                inner.pair.tailored_state = TailoredState::Absent;
                drop(inner);
                tracing::warn!(%category, error = %err, "tailored generation failed");
                GenerateOutcome::Failed {
                    toast: Toast::error(format!(
                        "Tailored {category} generation failed. Please try again."
                    )),
                }
            }
        }
    }
}
