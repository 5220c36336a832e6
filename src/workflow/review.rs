use serde::Serialize;

use crate::authz::ProposalPermissions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewView {
    Details,
    Edit,
    Actions,
}

/// Navigation inside the proposal review modal.
///
/// Every view opens from `Details`; `go_back` always lands on `Details`.
/// Views the permission record does not allow are never opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewNavigator {
    view: ReviewView,
    permissions: ProposalPermissions,
}

impl ReviewNavigator {
    pub fn new(permissions: ProposalPermissions) -> Self {
        Self {
            view: ReviewView::Details,
            permissions,
        }
    }

    pub fn view(&self) -> ReviewView {
        self.view
    }

    pub fn is_allowed(&self, view: ReviewView) -> bool {
        match view {
            ReviewView::Details => self.permissions.can_view,
            ReviewView::Edit => self.permissions.can_edit,
            ReviewView::Actions => self.permissions.can_apply || self.permissions.can_view_applicants,
        }
    }

    pub fn available_views(&self) -> Vec<ReviewView> {
        [ReviewView::Details, ReviewView::Edit, ReviewView::Actions]
            .into_iter()
            .filter(|v| self.is_allowed(*v))
            .collect()
    }

    pub fn open(&mut self, view: ReviewView) -> bool {
        if self.view != ReviewView::Details || !self.is_allowed(view) {
            return false;
        }
        self.view = view;
        true
    }

    pub fn go_back(&mut self) {
        self.view = ReviewView::Details;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> ProposalPermissions {
        ProposalPermissions {
            can_view: true,
            can_edit: true,
            can_apply: false,
            can_view_applicants: true,
        }
    }

    #[test]
    fn opens_any_permitted_view_from_details() {
        let mut nav = ReviewNavigator::new(owner());
        assert!(nav.open(ReviewView::Edit));
        assert_eq!(nav.view(), ReviewView::Edit);

        nav.go_back();
        assert!(nav.open(ReviewView::Actions));
        assert_eq!(nav.view(), ReviewView::Actions);
    }

    #[test]
    fn views_do_not_chain() {
        let mut nav = ReviewNavigator::new(owner());
        nav.open(ReviewView::Edit);
        assert!(!nav.open(ReviewView::Actions));
        assert_eq!(nav.view(), ReviewView::Edit);

        nav.go_back();
        nav.go_back();
        assert_eq!(nav.view(), ReviewView::Details);
    }

    #[test]
    fn edit_hidden_without_permission() {
        let student = ProposalPermissions {
            can_view: true,
            can_edit: false,
            can_apply: true,
            can_view_applicants: false,
        };
        let mut nav = ReviewNavigator::new(student);

        assert_eq!(nav.available_views(), vec![ReviewView::Details, ReviewView::Actions]);
        assert!(!nav.open(ReviewView::Edit));
        assert_eq!(nav.view(), ReviewView::Details);
    }
}
