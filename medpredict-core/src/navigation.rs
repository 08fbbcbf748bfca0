//! Navigation shell: the sidebar menu and the page it selects.

use serde::Serialize;

use crate::schema::Disease;

/// Title of the sidebar menu.
pub const MENU_TITLE: &str = "Disease Prediction System";

/// Heading above the sidebar menu.
pub const SIDEBAR_TITLE: &str = "Navigation";

/// A page reachable from the sidebar. Exactly one is active per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Disease(Disease),
}

impl Page {
    /// Menu order.
    pub const ALL: [Page; 4] = [
        Page::Home,
        Page::Disease(Disease::Diabetes),
        Page::Disease(Disease::HeartDisease),
        Page::Disease(Disease::Parkinsons),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Disease(Disease::Diabetes) => "Diabetes Prediction",
            Page::Disease(Disease::HeartDisease) => "Heart Disease Prediction",
            Page::Disease(Disease::Parkinsons) => "Parkinson's Prediction",
        }
    }

    /// Icon name, resolved by the page stylesheet.
    pub fn icon(&self) -> &'static str {
        match self {
            Page::Home => "house",
            Page::Disease(Disease::Diabetes) => "activity",
            Page::Disease(Disease::HeartDisease) => "heart",
            Page::Disease(Disease::Parkinsons) => "person",
        }
    }

    pub fn href(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::Disease(disease) => format!("/predict/{}", disease.slug()),
        }
    }
}

/// One rendered sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub href: String,
    pub active: bool,
}

/// The sidebar menu with `active` highlighted.
pub fn menu(active: Page) -> Vec<MenuItem> {
    Page::ALL
        .into_iter()
        .map(|page| MenuItem {
            label: page.label(),
            icon: page.icon(),
            href: page.href(),
            active: page == active,
        })
        .collect()
}
