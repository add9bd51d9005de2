use std::collections::HashMap;

use crate::surface::{InputSource, Inputs, MountIds, SubmitControl, Surface};
use crate::wizard::instance::WizardConfig;
use crate::wizard::navigator::{DotState, Progress};
use crate::wizard::step::{ElementRef, StepDescriptor};
use crate::wizard::summary::{Summary, SummaryRow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSlot {
    pub id: String,
    pub error: bool,
    pub error_text: String,
    pub preview: Option<String>,
}

impl FieldSlot {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub step: usize,
    pub title: String,
    pub active: bool,
    pub fields: Vec<FieldSlot>,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBar {
    pub fill_percent: u8,
    pub step_text: String,
    pub percent_text: String,
}

/// Advisory line rendered next to an option group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAdvisory {
    pub group: String,
    pub text: String,
}

/// Everything a single wizard mount renders into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowMount {
    pub panels: Vec<Panel>,
    pub dots: Vec<DotState>,
    pub progress: ProgressBar,
    pub submit: SubmitControl,
    pub group_errors: Vec<GroupAdvisory>,
    pub banner: Option<String>,
}

impl FlowMount {
    /// One panel per step with a slot for every control it declares.
    pub fn from_steps(steps: &[StepDescriptor]) -> Self {
        let panels = steps
            .iter()
            .map(|step| {
                let mut panel = Panel {
                    step: step.position,
                    title: step.title.to_string(),
                    active: false,
                    fields: Vec::new(),
                    groups: Vec::new(),
                };
                for control in &step.controls {
                    match control.element() {
                        Some(ElementRef::Field(id)) => panel.fields.push(FieldSlot::new(id)),
                        Some(ElementRef::Group(key)) => panel.groups.push(key.to_string()),
                        None => {}
                    }
                }
                panel
            })
            .collect::<Vec<_>>();
        Self {
            dots: vec![DotState::Pending; panels.len()],
            panels,
            ..Self::default()
        }
    }

    pub fn active_step(&self) -> Option<usize> {
        self.panels
            .iter()
            .find(|panel| panel.active)
            .map(|panel| panel.step)
    }

    pub fn panel(&self, step: usize) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.step == step)
    }

    pub fn panel_mut(&mut self, step: usize) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|panel| panel.step == step)
    }

    pub fn field(&self, id: &str) -> Option<&FieldSlot> {
        self.panels
            .iter()
            .flat_map(|panel| panel.fields.iter())
            .find(|slot| slot.id == id)
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut FieldSlot> {
        self.panels
            .iter_mut()
            .flat_map(|panel| panel.fields.iter_mut())
            .find(|slot| slot.id == id)
    }

    pub fn has_group(&self, key: &str) -> bool {
        self.panels
            .iter()
            .any(|panel| panel.groups.iter().any(|group| group == key))
    }

    pub fn marked_fields(&self) -> Vec<&str> {
        self.panels
            .iter()
            .flat_map(|panel| panel.fields.iter())
            .filter(|slot| slot.error)
            .map(|slot| slot.id.as_str())
            .collect()
    }
}

/// Form, done or summary container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub visible: bool,
    pub rows: Vec<SummaryRow>,
}

/// In-memory page: wizard mounts, their surrounding sections and the live
/// input values.
#[derive(Debug, Clone, Default)]
pub struct Document {
    flows: HashMap<String, FlowMount>,
    sections: HashMap<String, Section>,
    inputs: Inputs,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flow(&mut self, id: impl Into<String>, mount: FlowMount) {
        self.flows.insert(id.into(), mount);
    }

    pub fn add_section(&mut self, id: impl Into<String>, visible: bool) {
        self.sections.insert(
            id.into(),
            Section {
                visible,
                rows: Vec::new(),
            },
        );
    }

    /// Lays out the mount and sections a config expects.
    pub fn scaffold(&mut self, config: &WizardConfig) {
        self.add_flow(config.mount_id(), FlowMount::from_steps(config.steps()));
        self.add_section(config.form_id(), true);
        self.add_section(config.done_id(), false);
        self.add_section(config.summary_id(), false);
    }

    pub fn remove_flow(&mut self, id: &str) -> Option<FlowMount> {
        self.flows.remove(id)
    }

    pub fn flow(&self, id: &str) -> Option<&FlowMount> {
        self.flows.get(id)
    }

    pub fn flow_mut(&mut self, id: &str) -> Option<&mut FlowMount> {
        self.flows.get_mut(id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn is_visible(&self, section: &str) -> bool {
        self.sections
            .get(section)
            .map(|section| section.visible)
            .unwrap_or(false)
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut Inputs {
        &mut self.inputs
    }

    fn set_section(&mut self, id: &str, visible: bool, rows: Option<&[SummaryRow]>) {
        if let Some(section) = self.sections.get_mut(id) {
            section.visible = visible;
            if let Some(rows) = rows {
                section.rows = rows.to_vec();
            }
        }
    }
}

impl InputSource for Document {
    fn text(&self, id: &str) -> String {
        self.inputs.text(id)
    }

    fn choice(&self, name: &str) -> Option<String> {
        self.inputs.choice(name)
    }

    fn checked(&self, name: &str) -> Vec<String> {
        self.inputs.checked(name)
    }
}

impl Surface for Document {
    fn has_mount(&self, flow: &str) -> bool {
        self.flows.contains_key(flow)
    }

    fn has_panel(&self, flow: &str, step: usize) -> bool {
        self.flow(flow)
            .map(|mount| mount.panel(step).is_some())
            .unwrap_or(false)
    }

    fn has_field(&self, flow: &str, id: &str) -> bool {
        self.flow(flow)
            .map(|mount| mount.field(id).is_some())
            .unwrap_or(false)
    }

    fn has_group(&self, flow: &str, key: &str) -> bool {
        self.flow(flow)
            .map(|mount| mount.has_group(key))
            .unwrap_or(false)
    }

    fn show_step(&mut self, flow: &str, step: usize) {
        if let Some(mount) = self.flows.get_mut(flow) {
            for panel in &mut mount.panels {
                panel.active = panel.step == step;
            }
        }
    }

    fn render_progress(&mut self, flow: &str, progress: &Progress) {
        if let Some(mount) = self.flows.get_mut(flow) {
            mount.dots = (1..=progress.total).map(|pos| progress.dot(pos)).collect();
            mount.progress = ProgressBar {
                fill_percent: progress.percent,
                step_text: progress.step_text(),
                percent_text: progress.percent_text(),
            };
        }
    }

    fn clear_errors(&mut self, flow: &str) {
        if let Some(mount) = self.flows.get_mut(flow) {
            for slot in mount.panels.iter_mut().flat_map(|panel| panel.fields.iter_mut()) {
                slot.error = false;
                slot.error_text.clear();
            }
            mount.group_errors.clear();
            mount.banner = None;
        }
    }

    fn mark_field(&mut self, flow: &str, id: &str, message: &str) {
        if let Some(slot) = self.flows.get_mut(flow).and_then(|mount| mount.field_mut(id)) {
            slot.error = true;
            slot.error_text = message.to_string();
        }
    }

    fn mark_group(&mut self, flow: &str, key: &str, message: &str) {
        if let Some(mount) = self.flows.get_mut(flow) {
            mount.group_errors.push(GroupAdvisory {
                group: key.to_string(),
                text: message.to_string(),
            });
        }
    }

    fn set_submit(&mut self, flow: &str, control: SubmitControl) {
        if let Some(mount) = self.flows.get_mut(flow) {
            mount.submit = control;
        }
    }

    fn set_banner(&mut self, flow: &str, message: Option<&str>) {
        if let Some(mount) = self.flows.get_mut(flow) {
            mount.banner = message.map(str::to_string);
        }
    }

    fn set_preview(&mut self, flow: &str, id: &str, text: &str) {
        if let Some(slot) = self.flows.get_mut(flow).and_then(|mount| mount.field_mut(id)) {
            slot.preview = Some(text.to_string());
        }
    }

    fn reveal_done(&mut self, ids: &MountIds, summary: &Summary) {
        self.set_section(&ids.form, false, None);
        self.set_section(&ids.done, true, None);
        self.set_section(&ids.summary, true, Some(&summary.rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::step::{ChoiceGroup, Control, Rule, TextField};

    fn steps() -> Vec<StepDescriptor> {
        vec![
            StepDescriptor::new(
                1,
                "Datos",
                vec![Control::Text(TextField::new("nombre", "Nombre", Rule::Required("x")))],
            ),
            StepDescriptor::new(
                2,
                "Tipo",
                vec![Control::Choice(ChoiceGroup::new("tipo", "g-tipo", "Tipo", vec!["A"]))],
            ),
        ]
    }

    #[test]
    fn mount_lists_fields_and_groups_per_panel() {
        let mount = FlowMount::from_steps(&steps());
        assert_eq!(mount.panels.len(), 2);
        assert!(mount.field("nombre").is_some());
        assert!(mount.has_group("g-tipo"));
        assert!(!mount.has_group("tipo"));
        assert_eq!(mount.dots, vec![DotState::Pending, DotState::Pending]);
    }

    #[test]
    fn only_one_panel_is_active() {
        let mut doc = Document::new();
        doc.add_flow("flow", FlowMount::from_steps(&steps()));
        doc.show_step("flow", 2);
        assert_eq!(doc.flow("flow").and_then(FlowMount::active_step), Some(2));
        doc.show_step("flow", 1);
        assert_eq!(doc.flow("flow").and_then(FlowMount::active_step), Some(1));
    }

    #[test]
    fn clearing_removes_every_marker() {
        let mut doc = Document::new();
        doc.add_flow("flow", FlowMount::from_steps(&steps()));
        doc.mark_field("flow", "nombre", "Nombre obligatorio.");
        doc.mark_group("flow", "g-tipo", "⚠ Elige.");
        doc.set_banner("flow", Some("Error"));
        assert_eq!(doc.flow("flow").map(FlowMount::marked_fields), Some(vec!["nombre"]));

        doc.clear_errors("flow");
        let mount = doc.flow("flow").cloned().unwrap_or_default();
        assert!(mount.marked_fields().is_empty());
        assert!(mount.group_errors.is_empty());
        assert_eq!(mount.banner, None);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut doc = Document::new();
        doc.show_step("nowhere", 1);
        doc.mark_field("nowhere", "x", "y");
        assert!(!doc.has_mount("nowhere"));
        assert!(!doc.has_field("nowhere", "x"));
    }
}
