//! Rendering adapter seam and the in-memory page model that implements it.
//!
//! The wizard never holds element handles: every call names the mount and
//! the element it wants, and the surface resolves them on the spot.

mod document;

pub use document::{
    Document, FieldSlot, FlowMount, GroupAdvisory, Panel, ProgressBar, Section,
};

use std::collections::HashMap;

use crate::wizard::navigator::Progress;
use crate::wizard::summary::Summary;

/// Read access to the live values typed or selected by the user.
pub trait InputSource {
    /// Trimmed value of a text input; empty when the input is missing.
    fn text(&self, id: &str) -> String;

    /// Selected option of a radio group.
    fn choice(&self, name: &str) -> Option<String>;

    /// Checked options of a checkbox group, in the order they were checked.
    fn checked(&self, name: &str) -> Vec<String>;
}

/// Element identifiers a wizard instance resolves on every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountIds {
    pub flow: String,
    pub form: String,
    pub done: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitControl {
    pub disabled: bool,
    pub loading: bool,
}

impl SubmitControl {
    pub fn enabled() -> Self {
        Self::default()
    }

    pub fn busy() -> Self {
        Self {
            disabled: true,
            loading: true,
        }
    }

    pub fn spent() -> Self {
        Self {
            disabled: true,
            loading: false,
        }
    }
}

/// Presentation operations the wizard needs from a page.
///
/// Implementations must treat unknown ids as no-ops.
pub trait Surface: InputSource {
    fn has_mount(&self, flow: &str) -> bool;
    fn has_panel(&self, flow: &str, step: usize) -> bool;
    fn has_field(&self, flow: &str, id: &str) -> bool;
    fn has_group(&self, flow: &str, key: &str) -> bool;

    fn show_step(&mut self, flow: &str, step: usize);
    fn render_progress(&mut self, flow: &str, progress: &Progress);

    fn clear_errors(&mut self, flow: &str);
    fn mark_field(&mut self, flow: &str, id: &str, message: &str);
    fn mark_group(&mut self, flow: &str, key: &str, message: &str);

    fn set_submit(&mut self, flow: &str, control: SubmitControl);
    fn set_banner(&mut self, flow: &str, message: Option<&str>);
    fn set_preview(&mut self, flow: &str, id: &str, text: &str);

    /// Hides the form surface, reveals the done surface and renders the summary.
    fn reveal_done(&mut self, ids: &MountIds, summary: &Summary);
}

/// Live input values keyed by input id (text) or input name (groups).
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    text: HashMap<String, String>,
    choices: HashMap<String, String>,
    checks: HashMap<String, Vec<String>>,
}

impl Inputs {
    pub fn set_text(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.text.insert(id.into(), value.into());
    }

    pub fn pick(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.choices.insert(name.into(), value.into());
    }

    pub fn check(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let checked = self.checks.entry(name.into()).or_default();
        if !checked.contains(&value) {
            checked.push(value);
        }
    }

    pub fn uncheck(&mut self, name: &str, value: &str) {
        if let Some(checked) = self.checks.get_mut(name) {
            checked.retain(|existing| existing != value);
        }
    }

    pub fn raw_text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.choices.clear();
        self.checks.clear();
    }
}

impl InputSource for Inputs {
    fn text(&self, id: &str) -> String {
        self.text
            .get(id)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn choice(&self, name: &str) -> Option<String> {
        self.choices
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn checked(&self, name: &str) -> Vec<String> {
        self.checks.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_inputs_read_as_empty() {
        let inputs = Inputs::default();
        assert_eq!(inputs.text("cl-nombre"), "");
        assert_eq!(inputs.choice("cl-tipo"), None);
        assert!(inputs.checked("cl-tela").is_empty());
    }

    #[test]
    fn checks_keep_selection_order_without_duplicates() {
        let mut inputs = Inputs::default();
        inputs.check("cl-tela", "Lino");
        inputs.check("cl-tela", "Lana");
        inputs.check("cl-tela", "Lino");
        inputs.uncheck("cl-tela", "Lana");
        inputs.check("cl-tela", "Seda");
        assert_eq!(inputs.checked("cl-tela"), vec!["Lino", "Seda"]);
    }

    #[test]
    fn text_is_trimmed_on_read() {
        let mut inputs = Inputs::default();
        inputs.set_text("cl-ciudad", "  Valparaíso ");
        assert_eq!(inputs.text("cl-ciudad"), "Valparaíso");
        assert_eq!(inputs.raw_text("cl-ciudad"), Some("  Valparaíso "));
    }
}
