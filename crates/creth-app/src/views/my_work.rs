//! The talent's submissions with status filters.

use creth_types::work::MySubmission;

use crate::{catalog, AppError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkFilter {
    #[default]
    All,
    /// Pending or under review.
    Active,
    /// Won or already paid.
    Won,
}

impl WorkFilter {
    pub fn admits(self, submission: &MySubmission) -> bool {
        match self {
            WorkFilter::All => true,
            WorkFilter::Active => submission.status.is_active(),
            WorkFilter::Won => submission.status.is_won(),
        }
    }
}

pub struct MyWorkView {
    submissions: Vec<MySubmission>,
    filter: WorkFilter,
    selected: Option<String>,
}

impl Default for MyWorkView {
    fn default() -> Self {
        Self {
            submissions: catalog::my_submissions(),
            filter: WorkFilter::All,
            selected: None,
        }
    }
}

impl MyWorkView {
    pub fn filter(&self) -> WorkFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: WorkFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&MySubmission> {
        self.submissions
            .iter()
            .filter(|s| self.filter.admits(s))
            .collect()
    }

    pub fn select(&mut self, id: &str) -> Result<&MySubmission> {
        let submission = self
            .submissions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::SubmissionNotFound(id.to_string()))?;
        self.selected = Some(submission.id.clone());
        Ok(submission)
    }

    pub fn selected(&self) -> Option<&MySubmission> {
        let id = self.selected.as_deref()?;
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(view: &MyWorkView) -> Vec<&str> {
        view.visible().iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_filters() {
        let mut view = MyWorkView::default();
        assert_eq!(ids(&view).len(), 4);

        view.set_filter(WorkFilter::Active);
        assert_eq!(ids(&view), vec!["sub-1", "sub-4"]);

        view.set_filter(WorkFilter::Won);
        assert_eq!(ids(&view), vec!["sub-2", "sub-3"]);
    }

    #[test]
    fn test_selection() {
        let mut view = MyWorkView::default();
        assert!(view.selected().is_none());
        let title = view.select("sub-3").expect("select").title.clone();
        assert_eq!(title, "Gas Optimization Research");
        assert_eq!(view.selected().map(|s| s.id.as_str()), Some("sub-3"));

        view.close();
        assert!(view.selected().is_none());
        assert!(matches!(
            view.select("sub-9"),
            Err(AppError::SubmissionNotFound(_))
        ));
    }
}
