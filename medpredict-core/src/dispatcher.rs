//! # Dispatcher
//!
//! Turns a submitted form into a verdict: assemble the feature vector in
//! schema order, call the disease's model, map the label to a message.
//!
//! Each disease page is a two-state machine. A page opens in
//! [`PageState::AwaitingInput`]; a submission moves it to
//! [`PageState::ResultDisplayed`]. Nothing else produces a verdict.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::PredictError;
use crate::form::FormState;
use crate::model::{Label, ModelStore};
use crate::schema::Disease;
use crate::vector::FeatureVector;

/// Presentation style of a verdict banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStyle {
    Success,
    Error,
}

/// The outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub disease: Disease,
    pub label: Label,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match (self.disease, self.label) {
            (Disease::Diabetes, Label::Positive) => "The person is diabetic.",
            (Disease::Diabetes, Label::Negative) => "The person is not diabetic.",
            (Disease::HeartDisease, Label::Positive) => "The person has heart disease.",
            (Disease::HeartDisease, Label::Negative) => "The person does not have heart disease.",
            (Disease::Parkinsons, Label::Positive) => "The person has Parkinson's disease.",
            (Disease::Parkinsons, Label::Negative) => {
                "The person does not have Parkinson's disease."
            }
        }
    }

    /// A positive finding is shown as an error banner.
    pub fn style(&self) -> VerdictStyle {
        match self.label {
            Label::Positive => VerdictStyle::Error,
            Label::Negative => VerdictStyle::Success,
        }
    }
}

/// State of a disease page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    AwaitingInput,
    ResultDisplayed(Verdict),
}

impl PageState {
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            PageState::AwaitingInput => None,
            PageState::ResultDisplayed(verdict) => Some(verdict),
        }
    }
}

/// One render cycle of a disease page: the form values and the page state.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseasePage {
    pub form: FormState,
    pub state: PageState,
}

impl DiseasePage {
    /// A freshly navigated page: defaults, no verdict.
    pub fn open(disease: Disease) -> Self {
        Self::with_form(FormState::new(disease))
    }

    /// A page holding user-entered values that have not been submitted.
    pub fn with_form(form: FormState) -> Self {
        Self {
            form,
            state: PageState::AwaitingInput,
        }
    }

    pub fn disease(&self) -> Disease {
        self.form.disease()
    }

    /// Submit the current form. A resubmission replaces the previous verdict.
    pub fn submit(self, dispatcher: &Dispatcher) -> Result<Self, PredictError> {
        let verdict = dispatcher.dispatch(&self.form)?;
        Ok(Self {
            form: self.form,
            state: PageState::ResultDisplayed(verdict),
        })
    }
}

/// Routes submissions to the shared, read-only model store.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<ModelStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Build the vector for `form`, predict, and map the label to a verdict.
    pub fn dispatch(&self, form: &FormState) -> Result<Verdict, PredictError> {
        let disease = form.disease();
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %disease, %submission_id);
        let _enter = span.enter();

        let vector = FeatureVector::assemble(form);
        tracing::debug!(features = vector.len(), "Assembled feature vector");

        let label = self.store.predict(&vector).inspect_err(|e| {
            tracing::error!(error = %e, "Prediction failed");
        })?;
        tracing::info!(%label, "Prediction served");

        Ok(Verdict { disease, label })
    }
}
