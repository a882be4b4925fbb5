//! Ready-made menu shapes.

mod list;
mod page;
mod paginated;
mod standard;

pub use list::{ListMenu, ListSource};
pub use page::{MenuPage, PageMenu, PageNavigationButton, PageProvider};
pub use paginated::{PageSource, PaginatedMenu};
pub use standard::StandardMenu;
