//! Tailoring request: ten steps from contact data to the project brief.

use crate::errors::StepperError;
use crate::wizard::{
    AmountField, ChoiceGroup, Control, Rule, StepDescriptor, TextField, WizardConfig,
    WizardConfigBuilder,
};

pub const MOUNT_ID: &str = "flow-client";
pub const TOTAL_STEPS: usize = 10;
pub const SUCCESS_MESSAGE: &str = "¡Tu solicitud fue enviada! Te contactaremos pronto.";
pub const FAILURE_MESSAGE: &str = "No pudimos enviar tu solicitud. Inténtalo nuevamente.";
pub const BUDGET_ID: &str = "cl-presupuesto";
pub const BUDGET_DEFAULT: &str = "150000";

pub fn builder() -> WizardConfigBuilder {
    WizardConfig::builder(MOUNT_ID, TOTAL_STEPS)
        .form_surface("client-form-wrap")
        .done_surface("client-done")
        .summary_surface("client-summary")
        .success_message(SUCCESS_MESSAGE)
        .failure_message(FAILURE_MESSAGE)
        .steps(steps())
}

pub fn config() -> Result<WizardConfig, StepperError> {
    builder().build()
}

fn text(id: &'static str, label: &'static str, rule: Rule) -> Control {
    Control::Text(TextField::new(id, label, rule))
}

fn choice(
    name: &'static str,
    group: &'static str,
    label: &'static str,
    options: Vec<&'static str>,
    message: &'static str,
) -> Control {
    Control::Choice(ChoiceGroup::new(name, group, label, options).required(message))
}

pub fn steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            1,
            "Tus datos",
            vec![
                text("cl-nombre", "Nombre", Rule::Required("Nombre obligatorio.")),
                text("cl-apellido", "Nombre", Rule::Required("Apellido obligatorio.")),
                text("cl-correo", "Correo", Rule::Email("Correo inválido.")),
                text("cl-tel", "Teléfono", Rule::Required("Teléfono obligatorio.")),
            ],
        ),
        StepDescriptor::new(
            2,
            "Ubicación",
            vec![
                text("cl-region", "Región", Rule::Required("Selecciona una región.")),
                text("cl-ciudad", "Ciudad", Rule::Required("Ingresa tu ciudad.")),
            ],
        ),
        StepDescriptor::new(
            3,
            "Tipo de prenda",
            vec![choice(
                "cl-tipo",
                "g-tipo",
                "Tipo de prenda",
                vec!["Traje", "Blazer", "Camisa", "Pantalón", "Vestido", "Abrigo"],
                "Elige el tipo de prenda.",
            )],
        ),
        StepDescriptor::new(
            4,
            "Ocasión",
            vec![choice(
                "cl-ocasion",
                "g-ocasion",
                "Ocasión",
                vec!["Matrimonio", "Trabajo", "Graduación", "Evento formal", "Uso diario"],
                "Indica la ocasión.",
            )],
        ),
        StepDescriptor::new(
            5,
            "Telas",
            vec![Control::Checks(
                ChoiceGroup::new(
                    "cl-tela",
                    "g-tela",
                    "Telas preferidas",
                    vec!["Lana", "Lino", "Algodón", "Seda", "Tweed", "Cachemira"],
                )
                .required("Selecciona al menos una tela."),
            )],
        ),
        StepDescriptor::new(
            6,
            "Tono de piel",
            vec![choice(
                "cl-tono",
                "g-tono",
                "Tono de piel",
                vec!["Claro", "Medio", "Oliva", "Oscuro"],
                "Elige tu tono de piel.",
            )],
        ),
        StepDescriptor::new(
            7,
            "Presupuesto",
            vec![Control::Amount(
                AmountField::new(BUDGET_ID, "Presupuesto", " CLP").with_discount_preview(),
            )],
        ),
        StepDescriptor::new(
            8,
            "Plazo",
            vec![choice(
                "cl-plazo",
                "g-plazo",
                "Plazo",
                vec!["Menos de 2 semanas", "2 a 4 semanas", "1 a 2 meses", "Sin apuro"],
                "Indica el plazo.",
            )],
        ),
        StepDescriptor::new(
            9,
            "Disponibilidad",
            vec![choice(
                "cl-disponibilidad",
                "g-disp",
                "Disponibilidad",
                vec!["Mañana", "Tarde", "Fin de semana"],
                "Indica tu disponibilidad.",
            )],
        ),
        StepDescriptor::new(
            10,
            "Tu proyecto",
            vec![
                Control::Prose(TextField::new(
                    "cl-descripcion",
                    "Descripción del proyecto",
                    Rule::MinLength(20, "Mínimo 20 caracteres."),
                )),
                text("cl-referencia", "Referencia visual", Rule::Optional),
            ],
        ),
    ]
}
