//! Configuration and lifecycle errors.

use crate::menu::MenuId;
use crate::session::HolderId;
use thiserror::Error;

/// Errors raised while building, drawing, or navigating menus.
///
/// These are programmer errors (bad layout, bad page number). Failures inside
/// click handlers are `anyhow` errors and are contained by the listener instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// The menu was formed without a title.
    #[error("menu has no title")]
    MissingTitle,
    /// Both or neither of rows and size were configured.
    #[error("menu must set exactly one of rows or size")]
    InvalidLayout,
    /// Size is not a multiple of 9 within 9..=54.
    #[error("inventory size {0} must be a multiple of 9 between 9 and 54")]
    InvalidSize(usize),
    /// Row count outside 1..=6.
    #[error("inventory rows {0} must be between 1 and 6")]
    InvalidRows(usize),
    /// Coordinates outside the 6x9 grid.
    #[error("position ({row}, {column}) is outside the grid")]
    PositionOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
    },
    /// Centered pagination needs at least three rows.
    #[error("size must be 27 or higher to center items in the menu, got {0}")]
    CenteredTooSmall(usize),
    /// Page number outside `1..=total`.
    #[error("invalid page number {page}, must be between 1 and {total}")]
    InvalidPage {
        /// Requested page (1-based).
        page: usize,
        /// Pages available.
        total: usize,
    },
    /// The menu has no notion of pages.
    #[error("menu does not support page switching")]
    NotPaged,
    /// A return button or return action was requested without a parent menu.
    #[error("parent cannot be missing if the menu wants to return to it")]
    MissingParent,
    /// The menu has not been formed for a holder yet.
    #[error("cannot show a menu that has not been displayed to a primary holder")]
    NotDisplayed,
    /// Only menus that declare ticking can be added to the ticking set.
    #[error("menu {0} does not tick")]
    NotTicking(MenuId),
    /// The id does not refer to a live menu.
    #[error("no live menu with id {0}")]
    UnknownMenu(MenuId),
    /// The holder has no menu open.
    #[error("holder {0} has no open menu")]
    NoOpenMenu(HolderId),
}
