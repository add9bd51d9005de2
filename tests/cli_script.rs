use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn shell(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stepper_core_cli").expect("binary built");
    cmd.env("STEPPER_CORE_CLI_SCRIPT", "1")
        .env("STEPPER_CORE_CONFIG_DIR", config_dir.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_completes_the_client_request() {
    let config_dir = TempDir::new().expect("temp dir");
    let script = [
        "config set submit_delay_ms 0",
        "set cl-nombre Ana",
        "set cl-apellido Rojas",
        "set cl-correo ana@correo.cl",
        "set cl-tel '+56 9 1234 5678'",
        "next",
        "set cl-region Valparaíso",
        "set cl-ciudad 'Viña del Mar'",
        "next",
        "pick cl-tipo traje",
        "next",
        "pick cl-ocasion Matrimonio",
        "next",
        "check cl-tela Lana",
        "next",
        "pick cl-tono Medio",
        "next",
        "set cl-presupuesto 120000",
        "next",
        "pick cl-plazo 'Sin apuro'",
        "next",
        "pick cl-disponibilidad Tarde",
        "next",
        "set cl-descripcion Traje de lino para un matrimonio de verano",
        "submit",
        "summary",
        "summary json",
        "exit",
    ]
    .join("\n");

    shell(&config_dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("$120.000 CLP · 20% dcto. → $96.000"))
        .stdout(contains("Paso 10 de 10"))
        .stdout(contains("¡Tu solicitud fue enviada!"))
        .stdout(contains("Presupuesto: $120.000 CLP"))
        .stdout(contains("Telas preferidas: Lana"))
        .stdout(contains("\"flow\": \"client\""))
        .stdout(contains("\"label\": \"Presupuesto\""))
        .stdout(contains("\"fields\": "));

    let saved = std::fs::read_to_string(config_dir.path().join("config.json")).expect("config saved");
    assert!(saved.contains("\"submit_delay_ms\": 0"));
}

#[test]
fn blocked_steps_and_unknown_commands_keep_the_shell_alive() {
    let config_dir = TempDir::new().expect("temp dir");
    shell(&config_dir)
        .write_stdin("next\nnexy\nflow worker\nshow\nexit\n")
        .assert()
        .success()
        .stdout(contains("Nombre obligatorio."))
        .stdout(contains("Suggestion: `next`?"))
        .stdout(contains("Paso 1 de 11"));
}

#[test]
fn quote_reports_the_tier() {
    let config_dir = TempDir::new().expect("temp dir");
    shell(&config_dir)
        .write_stdin("quote 80\nquote -5\nexit\n")
        .assert()
        .success()
        .stdout(contains("10% dcto. → $72"))
        .stdout(contains("subtotal must be zero or positive"));
}
