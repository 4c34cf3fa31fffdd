//! Framework-independent presentation state. Pure functions from controller
//! state to what a renderer should show: data, "no data", a spinner, a
//! generate call-to-action, or a dismissible toast. Never a blank view.

use crate::controller::{ActiveTab, TailoredState, VariantPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Info,
}

/// A transient, dismissible notification. Returned from operations as a
/// value, never stored in controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryView<R> {
    /// A fetch for the active tab is in flight.
    Loading,
    /// The general record does not exist; an expected terminal state.
    NoData,
    /// Tailored content absent and an organization context exists: offer
    /// the generate action instead of tabs.
    GenerateCta,
    /// Tailored generation in flight.
    Generating,
    Data { records: Vec<R>, tab: ActiveTab },
}

pub fn view_for<R: Clone>(
    pair: &VariantPair<R>,
    active_tab: ActiveTab,
    has_organization: bool,
) -> CategoryView<R> {
    match active_tab {
        ActiveTab::General => {
            if pair.fetching_general {
                return CategoryView::Loading;
            }
            match &pair.general {
                Some(records) if !records.is_empty() => CategoryView::Data {
                    records: records.clone(),
                    tab: ActiveTab::General,
                },
                _ => CategoryView::NoData,
            }
        }
        ActiveTab::Tailored => {
            if pair.fetching_tailored {
                return CategoryView::Loading;
            }
            match pair.tailored_state {
                TailoredState::Generating => CategoryView::Generating,
                TailoredState::Present => match &pair.tailored {
                    Some(records) if !records.is_empty() => CategoryView::Data {
                        records: records.clone(),
                        tab: ActiveTab::Tailored,
                    },
                    _ => CategoryView::NoData,
                },
                TailoredState::Absent if has_organization => CategoryView::GenerateCta,
                TailoredState::Absent => CategoryView::NoData,
            }
        }
    }
}

/// Display-state truncation for long free-text fields. Toggling is purely a
/// view concern; it never triggers a re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    full: String,
    limit: usize,
    pub expanded: bool,
}

impl Truncated {
    pub fn new(text: impl Into<String>, limit: usize) -> Self {
        Self {
            full: text.into(),
            limit,
            expanded: false,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.full.chars().count() > self.limit
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn visible(&self) -> String {
        if self.expanded || !self.is_truncated() {
            return self.full.clone();
        }
        let mut out: String = self.full.chars().take(self.limit).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> VariantPair<String> {
        VariantPair::idle()
    }

    #[test]
    fn fetching_general_shows_spinner() {
        let mut p = pair();
        p.fetching_general = true;
        assert_eq!(
            view_for(&p, ActiveTab::General, true),
            CategoryView::Loading
        );
    }

    #[test]
    fn empty_general_shows_no_data_not_a_spinner() {
        let mut p = pair();
        p.general = Some(Vec::new());
        assert_eq!(view_for(&p, ActiveTab::General, true), CategoryView::NoData);

        // A failed fetch leaves general unset; same panel.
        assert_eq!(
            view_for(&pair(), ActiveTab::General, true),
            CategoryView::NoData
        );
    }

    #[test]
    fn absent_tailored_with_organization_offers_generate_cta() {
        let p = pair();
        assert_eq!(
            view_for(&p, ActiveTab::Tailored, true),
            CategoryView::GenerateCta
        );
        assert_eq!(
            view_for(&p, ActiveTab::Tailored, false),
            CategoryView::NoData
        );
    }

    #[test]
    fn generating_shows_progress() {
        let mut p = pair();
        p.tailored_state = TailoredState::Generating;
        assert_eq!(
            view_for(&p, ActiveTab::Tailored, true),
            CategoryView::Generating
        );
    }

    #[test]
    fn present_tailored_shows_records() {
        let mut p = pair();
        p.tailored = Some(vec!["tailored".to_string()]);
        p.tailored_state = TailoredState::Present;
        assert_eq!(
            view_for(&p, ActiveTab::Tailored, true),
            CategoryView::Data {
                records: vec!["tailored".to_string()],
                tab: ActiveTab::Tailored,
            }
        );
    }

    #[test]
    fn truncation_is_display_only() {
        let mut t = Truncated::new("a very long reasoning paragraph", 6);
        assert!(t.is_truncated());
        assert_eq!(t.visible(), "a very…");
        t.toggle();
        assert_eq!(t.visible(), "a very long reasoning paragraph");

        let short = Truncated::new("short", 10);
        assert!(!short.is_truncated());
        assert_eq!(short.visible(), "short");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let t = Truncated::new("회사 분석 요약 내용", 5);
        assert_eq!(t.visible(), "회사 분석…");
    }
}
