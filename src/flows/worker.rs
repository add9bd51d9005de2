//! Job application: eleven steps, ending with optional references.

use crate::errors::StepperError;
use crate::wizard::{
    AmountField, ChoiceGroup, Control, Rule, StepDescriptor, TextField, WizardConfig,
    WizardConfigBuilder,
};

pub const MOUNT_ID: &str = "flow-worker";
pub const TOTAL_STEPS: usize = 11;
pub const SUCCESS_MESSAGE: &str =
    "¡Postulación enviada con éxito! Nos contactaremos en 3-5 días hábiles.";
pub const FAILURE_MESSAGE: &str = "No pudimos enviar tu postulación. Inténtalo nuevamente.";
pub const SALARY_ID: &str = "wk-salario";
pub const SALARY_DEFAULT: &str = "600000";

pub fn builder() -> WizardConfigBuilder {
    WizardConfig::builder(MOUNT_ID, TOTAL_STEPS)
        .form_surface("worker-form-wrap")
        .done_surface("worker-done")
        .summary_surface("worker-summary")
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

fn radio(
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
            "Datos de contacto",
            vec![
                text("wk-nombre", "Nombre", Rule::Required("Nombre obligatorio.")),
                text("wk-apellido", "Nombre", Rule::Required("Apellido obligatorio.")),
                text("wk-rut", "RUT", Rule::MinLength(8, "RUT inválido.")),
                text("wk-correo", "Correo", Rule::Email("Correo inválido.")),
                text("wk-tel", "Teléfono", Rule::Required("Teléfono obligatorio.")),
            ],
        ),
        StepDescriptor::new(
            2,
            "Información personal",
            vec![
                text(
                    "wk-fnac",
                    "Fecha nac.",
                    Rule::Required("Fecha de nacimiento obligatoria."),
                ),
                text("wk-genero", "Género", Rule::Required("Selecciona una opción.")),
                text("wk-nac", "Nacionalidad", Rule::Optional),
            ],
        ),
        StepDescriptor::new(
            3,
            "Dirección",
            vec![
                text("wk-region", "Región", Rule::Required("Selecciona tu región.")),
                text("wk-ciudad", "Ciudad", Rule::Required("Ingresa tu ciudad.")),
                text("wk-dir", "Dirección", Rule::Optional),
            ],
        ),
        StepDescriptor::new(
            4,
            "Cargo",
            vec![radio(
                "wk-cargo",
                "g-wk-cargo",
                "Cargo",
                vec!["Sastre/a", "Costurero/a", "Patronista", "Vendedor/a", "Aprendiz"],
                "Selecciona el cargo.",
            )],
        ),
        StepDescriptor::new(
            5,
            "Educación",
            vec![
                radio(
                    "wk-edu",
                    "g-wk-edu",
                    "Nivel educacional",
                    vec!["Media completa", "Técnico", "Universitario", "Otro"],
                    "Selecciona tu nivel educacional.",
                ),
                text("wk-inst", "Institución", Rule::Optional),
            ],
        ),
        StepDescriptor::new(
            6,
            "Experiencia",
            vec![radio(
                "wk-exp",
                "g-wk-exp",
                "Experiencia",
                vec!["Sin experiencia", "Menos de 1 año", "1 a 3 años", "Más de 3 años"],
                "Indica tu experiencia.",
            )],
        ),
        StepDescriptor::new(
            7,
            "Especialidades",
            vec![Control::Checks(
                ChoiceGroup::new(
                    "wk-esp",
                    "g-wk-esp",
                    "Especialidades",
                    vec![
                        "Trajes a medida",
                        "Arreglos",
                        "Camisería",
                        "Vestidos",
                        "Bordado",
                        "Patronaje",
                    ],
                )
                .required("Selecciona al menos una especialidad."),
            )],
        ),
        StepDescriptor::new(
            8,
            "Disponibilidad",
            vec![
                radio(
                    "wk-disp",
                    "g-wk-disp",
                    "Disponibilidad",
                    vec!["Inmediata", "En 2 semanas", "En 1 mes"],
                    "Indica tu disponibilidad.",
                ),
                radio(
                    "wk-modal",
                    "g-wk-modal",
                    "Modalidad",
                    vec!["Jornada completa", "Media jornada", "Por proyecto"],
                    "Indica la modalidad.",
                ),
            ],
        ),
        StepDescriptor::new(
            9,
            "Expectativa salarial",
            vec![Control::Amount(AmountField::new(
                SALARY_ID,
                "Expectativa salarial",
                " / mes",
            ))],
        ),
        StepDescriptor::new(
            10,
            "Motivación",
            vec![
                Control::Prose(TextField::new(
                    "wk-motiv",
                    "Motivación",
                    Rule::MinLength(40, "Cuéntanos un poco más (mínimo 40 caracteres)."),
                )),
                text("wk-link", "Portafolio/LinkedIn", Rule::Optional),
            ],
        ),
        StepDescriptor::new(
            11,
            "Referencias",
            vec![
                Control::Prose(TextField::new("wk-ref", "Referencias", Rule::Optional)),
                Control::Note("Revisa tus datos antes de enviar la postulación."),
            ],
        ),
    ]
}
