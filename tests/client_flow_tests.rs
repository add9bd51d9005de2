mod common;

use common::fill_client;
use stepper_core::config::Config;
use stepper_core::flows::{client, FlowKind};
use stepper_core::notify::{RecordingNotifier, Severity};
use stepper_core::surface::{Document, InputSource};
use stepper_core::wizard::{SimulatedCommit, SubmitOutcome, Transition, WizardInstance};

fn mounted_client() -> (Document, WizardInstance) {
    let config = FlowKind::Client
        .config(&Config::default())
        .expect("client config");
    let mut doc = Document::new();
    FlowKind::Client.scaffold(&mut doc, &config);
    let wizard = WizardInstance::mount(config, &mut doc)
        .expect("mount succeeds")
        .expect("mount present");
    (doc, wizard)
}

#[test]
fn first_step_reports_every_missing_contact_field() {
    let (mut doc, mut wizard) = mounted_client();
    let notifier = RecordingNotifier::new();
    doc.inputs_mut().set_text("cl-correo", "sin-arroba");

    let Transition::Blocked(errors) = wizard.next(&mut doc, &notifier) else {
        panic!("first step must block");
    };
    let targets: Vec<&str> = errors.iter().map(|err| err.target.as_str()).collect();
    assert_eq!(targets, vec!["cl-nombre", "cl-apellido", "cl-correo", "cl-tel"]);
    assert_eq!(errors[2].message, "Correo inválido.");
    assert_eq!(notifier.count(Severity::Err), 1);
}

#[test]
fn budget_preview_shows_the_discount_tier() {
    let (mut doc, wizard) = mounted_client();
    assert_eq!(doc.text(client::BUDGET_ID), client::BUDGET_DEFAULT);

    let preview = wizard.preview(&mut doc, client::BUDGET_ID);
    assert_eq!(
        preview.as_deref(),
        Some("$150.000 CLP · 20% dcto. → $120.000")
    );
    let slot = doc
        .flow(client::MOUNT_ID)
        .and_then(|mount| mount.field(client::BUDGET_ID))
        .and_then(|slot| slot.preview.clone());
    assert_eq!(slot, preview);

    doc.inputs_mut().set_text(client::BUDGET_ID, "40");
    assert_eq!(
        wizard.preview(&mut doc, client::BUDGET_ID).as_deref(),
        Some("$40 CLP")
    );
    assert_eq!(wizard.preview(&mut doc, "cl-nombre"), None);
}

#[tokio::test(start_paused = true)]
async fn complete_request_produces_the_summary_in_step_order() {
    let (mut doc, mut wizard) = mounted_client();
    let notifier = RecordingNotifier::new();
    fill_client(&mut doc);

    for expected in 2..=client::TOTAL_STEPS {
        assert_eq!(
            wizard.next(&mut doc, &notifier),
            Transition::Moved {
                from: expected - 1,
                to: expected
            }
        );
    }

    let outcome = wizard
        .submit(&mut doc, &SimulatedCommit::default(), &notifier)
        .await;
    let summary = match outcome {
        SubmitOutcome::Completed { summary, .. } => summary,
        other => panic!("expected completion, got {other:?}"),
    };
    insta::assert_snapshot!(summary.lines().join("\n"), @r"
    Nombre: Ana Rojas
    Correo: ana@correo.cl
    Teléfono: +56 9 1234 5678
    Región: Valparaíso
    Ciudad: Viña del Mar
    Tipo de prenda: Traje
    Ocasión: Matrimonio
    Telas preferidas: Lana, Lino
    Tono de piel: Medio
    Presupuesto: $150.000 CLP
    Plazo: 2 a 4 semanas
    Disponibilidad: Tarde
    Descripción del proyecto: Traje de tres piezas para un matrimonio en primavera.
    ");
    assert_eq!(
        notifier.last(),
        Some((client::SUCCESS_MESSAGE.to_string(), Severity::Ok))
    );
    assert!(doc.is_visible("client-done"));
    assert!(!doc.is_visible("client-form-wrap"));
}

#[test]
fn a_short_description_blocks_the_last_step() {
    let (mut doc, mut wizard) = mounted_client();
    let notifier = RecordingNotifier::new();
    fill_client(&mut doc);
    for _ in 1..client::TOTAL_STEPS {
        wizard.next(&mut doc, &notifier);
    }
    doc.inputs_mut().set_text("cl-descripcion", "Muy corto");
    let errors = wizard.validate(&doc);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].target, "cl-descripcion");
    assert_eq!(errors[0].message, "Mínimo 20 caracteres.");
}
