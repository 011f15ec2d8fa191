//! User interface preferences kept in private cookies.
//!
//! Includes the light/dark theme and the month navigation sidebar.

mod sidebar;
mod theme;

pub use sidebar::{
    SidebarState, is_sidebar_collapsed, sidebar_script, sidebar_toggle, sidebar_view,
    toggle_sidebar,
};
pub use theme::{Theme, get_theme, theme_toggle, update_theme};
