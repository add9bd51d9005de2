//! Step descriptors: the controls a step presents and how each one collects
//! its value into the [`SharedRecord`] and validates the live input.

use std::fmt;
use std::sync::Arc;

use crate::pricing::{self, Discount};
use crate::surface::InputSource;
use crate::wizard::record::{FieldValue, SharedRecord};

/// Validation failure targeting a field id or a group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub target: String,
    pub message: String,
}

impl FieldError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.message)
    }
}

type RuleCallback = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Built-in checks applied to a single text value.
#[derive(Clone)]
pub enum Rule {
    Optional,
    Required(&'static str),
    Email(&'static str),
    MinLength(usize, &'static str),
    Custom(Arc<RuleCallback>),
}

impl Rule {
    /// Returns the failure message for `value`, or `None` when it passes.
    pub fn check(&self, value: &str) -> Option<String> {
        let value = value.trim();
        match self {
            Rule::Optional => None,
            Rule::Required(message) => value.is_empty().then(|| message.to_string()),
            Rule::Email(message) => {
                (value.is_empty() || !value.contains('@')).then(|| message.to_string())
            }
            Rule::MinLength(min, message) => {
                (value.is_empty() || value.chars().count() < *min).then(|| message.to_string())
            }
            Rule::Custom(func) => func(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Optional => write!(f, "Optional"),
            Rule::Required(message) => write!(f, "Required({message:?})"),
            Rule::Email(message) => write!(f, "Email({message:?})"),
            Rule::MinLength(min, message) => write!(f, "MinLength({min}, {message:?})"),
            Rule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Single-line or multi-line text input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub id: &'static str,
    /// Record label; `None` keeps the input out of the record.
    pub label: Option<&'static str>,
    pub rule: Rule,
}

impl TextField {
    pub fn new(id: &'static str, label: &'static str, rule: Rule) -> Self {
        Self {
            id,
            label: Some(label),
            rule,
        }
    }

    pub fn unlabelled(id: &'static str, rule: Rule) -> Self {
        Self {
            id,
            label: None,
            rule,
        }
    }
}

/// Radio or checkbox group addressed by input name; errors target `group`.
#[derive(Debug, Clone)]
pub struct ChoiceGroup {
    pub name: &'static str,
    pub group: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
    pub required: Option<&'static str>,
}

impl ChoiceGroup {
    pub fn new(
        name: &'static str,
        group: &'static str,
        label: &'static str,
        options: Vec<&'static str>,
    ) -> Self {
        Self {
            name,
            group,
            label,
            options,
            required: None,
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }
}

/// Range-style amount input rendered with es-CL grouping.
#[derive(Debug, Clone)]
pub struct AmountField {
    pub id: &'static str,
    pub label: &'static str,
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub preview: bool,
}

impl AmountField {
    pub fn new(id: &'static str, label: &'static str, suffix: &'static str) -> Self {
        Self {
            id,
            label,
            prefix: "$",
            suffix,
            preview: false,
        }
    }

    pub fn with_discount_preview(mut self) -> Self {
        self.preview = true;
        self
    }

    /// Formats a raw control value; empty when it holds no integer.
    pub fn display(&self, raw: &str) -> String {
        match pricing::parse_leading_int(raw) {
            Some(amount) => format!(
                "{}{}{}",
                self.prefix,
                pricing::format_grouped(amount),
                self.suffix
            ),
            None => String::new(),
        }
    }

    /// Live preview text for the control, including the discount tier.
    pub fn preview_text(&self, raw: &str) -> Option<String> {
        let amount = pricing::parse_leading_int(raw)?;
        let display = self.display(raw);
        if !self.preview {
            return Some(display);
        }
        match pricing::discount(amount as f64) {
            Ok(Discount {
                percent: 0, ..
            }) => Some(display),
            Ok(quote) => Some(format!(
                "{} · {}% dcto. → {}{}",
                display,
                quote.percent,
                self.prefix,
                pricing::format_grouped(quote.final_price.round() as i64)
            )),
            Err(_) => Some(display),
        }
    }
}

/// Tagged content of a step; each variant knows how to collect and validate.
#[derive(Debug, Clone)]
pub enum Control {
    Text(TextField),
    Choice(ChoiceGroup),
    Checks(ChoiceGroup),
    Prose(TextField),
    Amount(AmountField),
    Note(&'static str),
}

/// Element a control needs from the mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Field(&'a str),
    Group(&'a str),
}

impl Control {
    pub fn element(&self) -> Option<ElementRef<'_>> {
        match self {
            Control::Text(field) | Control::Prose(field) => Some(ElementRef::Field(field.id)),
            Control::Amount(field) => Some(ElementRef::Field(field.id)),
            Control::Choice(group) | Control::Checks(group) => {
                Some(ElementRef::Group(group.group))
            }
            Control::Note(_) => None,
        }
    }

    fn collect(&self, input: &dyn InputSource) -> Option<(&'static str, FieldValue)> {
        match self {
            Control::Text(field) | Control::Prose(field) => field
                .label
                .map(|label| (label, FieldValue::Text(input.text(field.id)))),
            Control::Choice(group) => Some((
                group.label,
                FieldValue::Text(input.choice(group.name).unwrap_or_default()),
            )),
            Control::Checks(group) => Some((group.label, FieldValue::List(input.checked(group.name)))),
            Control::Amount(field) => Some((
                field.label,
                FieldValue::Text(field.display(&input.text(field.id))),
            )),
            Control::Note(_) => None,
        }
    }

    fn validate(&self, input: &dyn InputSource) -> Option<FieldError> {
        match self {
            Control::Text(field) | Control::Prose(field) => field
                .rule
                .check(&input.text(field.id))
                .map(|message| FieldError::new(field.id, message)),
            Control::Choice(group) => group
                .required
                .filter(|_| input.choice(group.name).is_none())
                .map(|message| FieldError::new(group.group, message)),
            Control::Checks(group) => group
                .required
                .filter(|_| input.checked(group.name).is_empty())
                .map(|message| FieldError::new(group.group, message)),
            Control::Amount(_) | Control::Note(_) => None,
        }
    }
}

/// Data handed to custom validators.
pub struct StepContext<'a> {
    pub step: usize,
    pub record: &'a SharedRecord,
    pub input: &'a dyn InputSource,
}

pub type Collector = Arc<dyn Fn(&dyn InputSource, &mut SharedRecord) + Send + Sync>;
pub type Validator = Arc<dyn Fn(&StepContext<'_>) -> Vec<FieldError> + Send + Sync>;

/// Declarative description of one wizard step.
#[derive(Clone)]
pub struct StepDescriptor {
    pub position: usize,
    pub title: &'static str,
    pub controls: Vec<Control>,
    collectors: Vec<Collector>,
    validators: Vec<Validator>,
}

impl StepDescriptor {
    pub fn new(position: usize, title: &'static str, controls: Vec<Control>) -> Self {
        Self {
            position,
            title,
            controls,
            collectors: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn display_only(position: usize, title: &'static str) -> Self {
        Self::new(position, title, Vec::new())
    }

    /// Adds a collector run after the controls and any earlier collector.
    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collectors.push(collector);
        self
    }

    /// Adds a validator whose errors follow those already reported.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub(crate) fn push_collector(&mut self, collector: Collector) {
        self.collectors.push(collector);
    }

    pub(crate) fn push_validator(&mut self, validator: Validator) {
        self.validators.push(validator);
    }

    /// True when nothing in this step can block the forward gate.
    pub fn always_passes(&self) -> bool {
        self.validators.is_empty()
            && self.controls.iter().all(|control| match control {
                Control::Text(field) | Control::Prose(field) => {
                    matches!(field.rule, Rule::Optional)
                }
                Control::Choice(group) | Control::Checks(group) => group.required.is_none(),
                Control::Amount(_) | Control::Note(_) => true,
            })
    }

    /// Writes this step's values into `record`.
    ///
    /// Text inputs sharing a label are joined with a single space.
    pub fn collect(&self, input: &dyn InputSource, record: &mut SharedRecord) {
        let mut collected: Vec<(&'static str, FieldValue)> = Vec::new();
        for control in &self.controls {
            let Some((label, value)) = control.collect(input) else {
                continue;
            };
            let joinable = matches!(control, Control::Text(_));
            match collected.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, FieldValue::Text(existing))) if joinable => {
                    existing.push(' ');
                    existing.push_str(value.as_text().unwrap_or_default());
                }
                Some((_, slot)) => *slot = value,
                None => collected.push((label, value)),
            }
        }
        for (label, value) in collected {
            record.insert(label, value);
        }
        for collector in &self.collectors {
            collector(input, record);
        }
    }

    /// Full error set for this step; built fresh on every call.
    pub fn validate(&self, input: &dyn InputSource, record: &SharedRecord) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = self
            .controls
            .iter()
            .filter_map(|control| control.validate(input))
            .collect();
        if !self.validators.is_empty() {
            let context = StepContext {
                step: self.position,
                record,
                input,
            };
            for validator in &self.validators {
                errors.extend(validator(&context));
            }
        }
        errors
    }

    /// Collect-then-validate gate guarding forward movement.
    pub fn gate(&self, input: &dyn InputSource, record: &mut SharedRecord) -> Vec<FieldError> {
        self.collect(input, record);
        self.validate(input, record)
    }

    pub fn amount_field(&self, id: &str) -> Option<&AmountField> {
        self.controls.iter().find_map(|control| match control {
            Control::Amount(field) if field.id == id => Some(field),
            _ => None,
        })
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("position", &self.position)
            .field("title", &self.title)
            .field("controls", &self.controls)
            .field("collectors", &self.collectors.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Inputs;

    fn identity_step() -> StepDescriptor {
        StepDescriptor::new(
            1,
            "Tus datos",
            vec![
                Control::Text(TextField::new("nombre", "Nombre", Rule::Required("Nombre obligatorio."))),
                Control::Text(TextField::new(
                    "apellido",
                    "Nombre",
                    Rule::Required("Apellido obligatorio."),
                )),
                Control::Text(TextField::new("correo", "Correo", Rule::Email("Correo inválido."))),
            ],
        )
    }

    #[test]
    fn rules_follow_trimmed_values() {
        assert_eq!(Rule::Required("x").check("  "), Some("x".into()));
        assert_eq!(Rule::Email("bad").check("ana.cl"), Some("bad".into()));
        assert_eq!(Rule::Email("bad").check("ana@correo.cl"), None);
        assert_eq!(Rule::MinLength(5, "short").check("abcd"), Some("short".into()));
        assert_eq!(Rule::MinLength(5, "short").check("ñandú"), None);
        assert_eq!(Rule::Optional.check(""), None);
    }

    #[test]
    fn text_fields_sharing_a_label_are_joined() {
        let mut inputs = Inputs::default();
        inputs.set_text("nombre", "Ana");
        inputs.set_text("apellido", "Rojas");
        inputs.set_text("correo", "ana@correo.cl");

        let mut record = SharedRecord::new();
        let errors = identity_step().gate(&inputs, &mut record);

        assert!(errors.is_empty());
        assert_eq!(record.text("Nombre"), Some("Ana Rojas"));
        assert_eq!(record.labels().collect::<Vec<_>>(), vec!["Nombre", "Correo"]);
    }

    #[test]
    fn validation_reports_every_failing_control_in_order() {
        let inputs = Inputs::default();
        let mut record = SharedRecord::new();
        let errors = identity_step().gate(&inputs, &mut record);

        let targets: Vec<_> = errors.iter().map(|err| err.target.as_str()).collect();
        assert_eq!(targets, vec!["nombre", "apellido", "correo"]);
    }

    #[test]
    fn choice_groups_target_their_group_key() {
        let step = StepDescriptor::new(
            3,
            "Prenda",
            vec![Control::Choice(
                ChoiceGroup::new("cl-tipo", "g-tipo", "Tipo de prenda", vec!["Traje", "Camisa"])
                    .required("Elige el tipo de prenda."),
            )],
        );
        let inputs = Inputs::default();
        let errors = step.validate(&inputs, &SharedRecord::new());
        assert_eq!(errors, vec![FieldError::new("g-tipo", "Elige el tipo de prenda.")]);
    }

    #[test]
    fn custom_validator_sees_the_collected_record() {
        let step = StepDescriptor::new(
            1,
            "Nota",
            vec![Control::Text(TextField::new("nota", "Nota", Rule::Optional))],
        )
        .with_validator(Arc::new(|ctx: &StepContext<'_>| {
            match ctx.record.text("Nota") {
                Some("prohibido") => vec![FieldError::new("nota", "Texto no permitido.")],
                _ => Vec::new(),
            }
        }));

        let mut inputs = Inputs::default();
        inputs.set_text("nota", "prohibido");
        let mut record = SharedRecord::new();
        assert_eq!(step.gate(&inputs, &mut record).len(), 1);
        assert!(!step.always_passes());
    }

    #[test]
    fn amount_preview_includes_discount_tier() {
        let field = AmountField::new("cl-presupuesto", "Presupuesto", " CLP").with_discount_preview();
        assert_eq!(field.display("200000"), "$200.000 CLP");
        assert_eq!(
            field.preview_text("200000").as_deref(),
            Some("$200.000 CLP · 20% dcto. → $160.000")
        );
        assert_eq!(field.preview_text("40").as_deref(), Some("$40 CLP"));
        assert_eq!(field.display("abc"), "");
    }
}
