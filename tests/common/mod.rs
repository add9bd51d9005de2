#![allow(dead_code)]

use stepper_core::surface::Document;
use stepper_core::wizard::{
    ChoiceGroup, Control, Rule, StepDescriptor, TextField, WizardConfig, WizardInstance,
};

pub const MOUNT: &str = "flow-demo";

/// Two steps: a required name, then a required radio choice.
pub fn two_step_config() -> WizardConfig {
    WizardConfig::builder(MOUNT, 2)
        .success_message("Listo")
        .step(StepDescriptor::new(
            1,
            "Datos",
            vec![Control::Text(TextField::new(
                "nombre",
                "Nombre",
                Rule::Required("Nombre obligatorio."),
            ))],
        ))
        .step(StepDescriptor::new(
            2,
            "Tipo",
            vec![Control::Choice(
                ChoiceGroup::new("tipo", "g-tipo", "Tipo", vec!["A", "B"]).required("Elige un tipo."),
            )],
        ))
        .build()
        .expect("two-step config")
}

/// Lays out `config` on a fresh page and mounts a wizard on it.
pub fn mounted(config: WizardConfig) -> (Document, WizardInstance) {
    let mut doc = Document::new();
    doc.scaffold(&config);
    let wizard = WizardInstance::mount(config, &mut doc)
        .expect("mount succeeds")
        .expect("mount present");
    (doc, wizard)
}

/// Valid answers for every step of the client flow.
pub fn fill_client(doc: &mut Document) {
    let inputs = doc.inputs_mut();
    inputs.set_text("cl-nombre", "Ana");
    inputs.set_text("cl-apellido", "Rojas");
    inputs.set_text("cl-correo", "ana@correo.cl");
    inputs.set_text("cl-tel", "+56 9 1234 5678");
    inputs.set_text("cl-region", "Valparaíso");
    inputs.set_text("cl-ciudad", "Viña del Mar");
    inputs.pick("cl-tipo", "Traje");
    inputs.pick("cl-ocasion", "Matrimonio");
    inputs.check("cl-tela", "Lana");
    inputs.check("cl-tela", "Lino");
    inputs.pick("cl-tono", "Medio");
    inputs.pick("cl-plazo", "2 a 4 semanas");
    inputs.pick("cl-disponibilidad", "Tarde");
    inputs.set_text(
        "cl-descripcion",
        "Traje de tres piezas para un matrimonio en primavera.",
    );
}

/// Valid answers for every step of the worker flow.
pub fn fill_worker(doc: &mut Document) {
    let inputs = doc.inputs_mut();
    inputs.set_text("wk-nombre", "Luis");
    inputs.set_text("wk-apellido", "Soto");
    inputs.set_text("wk-rut", "12.345.678-9");
    inputs.set_text("wk-correo", "luis@correo.cl");
    inputs.set_text("wk-tel", "+56 9 8765 4321");
    inputs.set_text("wk-fnac", "1990-04-12");
    inputs.set_text("wk-genero", "Masculino");
    inputs.set_text("wk-region", "Metropolitana");
    inputs.set_text("wk-ciudad", "Santiago");
    inputs.pick("wk-cargo", "Sastre/a");
    inputs.pick("wk-edu", "Técnico");
    inputs.pick("wk-exp", "Más de 3 años");
    inputs.check("wk-esp", "Trajes a medida");
    inputs.check("wk-esp", "Arreglos");
    inputs.pick("wk-disp", "Inmediata");
    inputs.pick("wk-modal", "Jornada completa");
    inputs.set_text(
        "wk-motiv",
        "Llevo diez años confeccionando trajes y quiero sumarme a un taller artesanal.",
    );
}
