//! Page rendering with handlebars.
//!
//! Templates are embedded in the binary and compiled once. Every page is a
//! body template rendered into the `layout` shell, which carries the sidebar.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::config::UiConfig;
use crate::dispatcher::{DiseasePage, VerdictStyle};
use crate::error::RenderError;
use crate::form::{FieldValue, RejectedSubmission};
use crate::navigation::{self, MENU_TITLE, MenuItem, Page, SIDEBAR_TITLE};
use crate::schema::{FieldKind, FieldSpec};

const TEMPLATES: [(&str, &str); 4] = [
    ("layout", include_str!("templates/layout.hbs")),
    ("home", include_str!("templates/home.hbs")),
    ("form", include_str!("templates/form.hbs")),
    ("not_found", include_str!("templates/not_found.hbs")),
];

#[derive(Serialize)]
struct ShellView<'a> {
    page_title: &'a str,
    page_icon: &'a str,
    sidebar_title: &'static str,
    menu_title: &'static str,
    menu: Vec<MenuItem>,
    heading: &'a str,
    body: String,
}

#[derive(Serialize)]
struct HomeView {
    diseases: Vec<&'static str>,
    image: Option<String>,
}

#[derive(Serialize)]
struct FormView {
    action: String,
    columns: Vec<Vec<FieldView>>,
    verdict: Option<VerdictView>,
    error: Option<String>,
}

#[derive(Serialize)]
struct FieldView {
    key: &'static str,
    label: &'static str,
    value: String,
    min: Option<String>,
    max: Option<String>,
    step: &'static str,
    options: Vec<OptionView>,
}

#[derive(Serialize)]
struct OptionView {
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct VerdictView {
    message: &'static str,
    style: VerdictStyle,
}

#[derive(Serialize)]
struct NotFoundView<'a> {
    path: &'a str,
}

impl FieldView {
    fn new(field: &'static FieldSpec, value: &FieldValue) -> Self {
        let (min, max, step, options) = match field.kind {
            FieldKind::Integer { min, max, .. } => (
                Some(min.to_string()),
                max.map(|m| m.to_string()),
                "1",
                Vec::new(),
            ),
            FieldKind::Float { min, max, .. } => (
                Some(min.to_string()),
                max.map(|m| m.to_string()),
                "any",
                Vec::new(),
            ),
            FieldKind::Categorical(encoding) => {
                let current = value.display();
                let options = encoding
                    .options
                    .iter()
                    .map(|c| OptionView {
                        label: c.label,
                        selected: c.label == current,
                    })
                    .collect();
                (None, None, "1", options)
            }
        };
        Self {
            key: field.key,
            label: field.label,
            value: value.display(),
            min,
            max,
            step,
            options,
        }
    }
}

/// Compiled page templates plus the presentation settings they need.
#[derive(Debug)]
pub struct PageRenderer {
    registry: Handlebars<'static>,
    ui: UiConfig,
    home_image: Option<String>,
}

impl PageRenderer {
    /// Compile all templates. `assets_dir` is checked once for the home
    /// image; a missing image is simply not shown.
    pub fn new(ui: &UiConfig, assets_dir: &Path) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| RenderError::Template {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        let home_image = if assets_dir.join(&ui.home_image).is_file() {
            Some(format!("/assets/{}", ui.home_image))
        } else {
            tracing::debug!(
                image = %ui.home_image,
                dir = %assets_dir.display(),
                "Home image not found, omitting it"
            );
            None
        };

        Ok(Self {
            registry,
            ui: ui.clone(),
            home_image,
        })
    }

    pub fn home(&self) -> Result<String, RenderError> {
        let view = HomeView {
            diseases: vec!["Diabetes", "Heart Disease", "Parkinson's Disease"],
            image: self.home_image.clone(),
        };
        let body = self.render("home", &view)?;
        self.shell(
            navigation::menu(Page::Home),
            "Welcome to the Disease Prediction Dashboard",
            body,
        )
    }

    /// A disease page in either state.
    pub fn disease_page(&self, page: &DiseasePage) -> Result<String, RenderError> {
        self.form_page(page, None)
    }

    /// The submitted form with a rejection banner. Fields that decoded keep
    /// their values and the failing field shows the text as entered.
    pub fn rejected(&self, rejection: &RejectedSubmission) -> Result<String, RenderError> {
        self.form_page(&DiseasePage::with_form(rejection.form.clone()), Some(rejection))
    }

    fn form_page(
        &self,
        page: &DiseasePage,
        rejection: Option<&RejectedSubmission>,
    ) -> Result<String, RenderError> {
        let disease = page.disease();
        let columns: Vec<Vec<FieldView>> = disease
            .schema()
            .layout()
            .into_iter()
            .map(|column| {
                column
                    .into_iter()
                    .filter_map(|field| {
                        let mut view = FieldView::new(field, page.form.get(field.key)?);
                        if let Some(r) = rejection
                            && r.error.field() == field.key
                        {
                            view.value = r.raw.clone();
                        }
                        Some(view)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let view = FormView {
            action: Page::Disease(disease).href(),
            columns,
            verdict: page.state.verdict().map(|v| VerdictView {
                message: v.message(),
                style: v.style(),
            }),
            error: rejection.map(|r| format!("Invalid input: {}", r.error)),
        };
        let body = self.render("form", &view)?;
        self.shell(
            navigation::menu(Page::Disease(disease)),
            disease.title(),
            body,
        )
    }

    pub fn not_found(&self, path: &str) -> Result<String, RenderError> {
        let body = self.render("not_found", &NotFoundView { path })?;
        let mut menu = navigation::menu(Page::Home);
        for item in &mut menu {
            item.active = false;
        }
        self.shell(menu, "Page not found", body)
    }

    fn shell(
        &self,
        menu: Vec<MenuItem>,
        heading: &str,
        body: String,
    ) -> Result<String, RenderError> {
        let view = ShellView {
            page_title: &self.ui.page_title,
            page_icon: &self.ui.page_icon,
            sidebar_title: SIDEBAR_TITLE,
            menu_title: MENU_TITLE,
            menu,
            heading,
            body,
        };
        self.render("layout", &view)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        self.registry
            .render(name, data)
            .map_err(|e| RenderError::Page {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}
