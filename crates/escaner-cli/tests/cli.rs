use assert_cmd::Command;
use predicates::prelude::*;

fn escaner() -> Command {
    Command::cargo_bin("escaner").unwrap()
}

#[test]
fn extract_from_stdin() {
    escaner()
        .arg("extract")
        .write_stdin("Base imponible 100.00\nIVA 21.00\nTotal 121.00\n")
        .assert()
        .success()
        .stdout("Nombre,Monto\nBase,100.00\nIva,21.00\nTotal,121.00\n");
}

#[test]
fn extract_without_matches_prints_no_data_message() {
    escaner()
        .args(["extract", "-"])
        .write_stdin("Gracias por su compra\n")
        .assert()
        .success()
        .stdout("No se encontraron datos de factura.\n");
}

#[test]
fn extract_from_file_with_lookahead() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ticket.txt");
    std::fs::write(&input, "Subtotal:\nTotal 45.00\nTax 3.00").unwrap();

    escaner()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout("Nombre,Monto\nSubtotal,45.00\nTax,3.00\n");

    escaner()
        .args(["extract", "--no-lookahead"])
        .arg(&input)
        .assert()
        .success()
        .stdout("Nombre,Monto\nTotal,45.00\nTax,3.00\n");
}

#[test]
fn extract_json_output() {
    escaner()
        .args(["extract", "--format", "json"])
        .write_stdin("Total: $1,234.56")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": \"1.234.56\""));
}

#[test]
fn extract_with_custom_keywords() {
    escaner()
        .args(["extract", "--keywords", "neto,total"])
        .write_stdin("Base 10.00\nNeto 8.00\n")
        .assert()
        .success()
        .stdout("Nombre,Monto\nNeto,8.00\n");
}

#[test]
fn extract_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"extraction": {"keywords": ["iva"]}}"#).unwrap();

    escaner()
        .arg("-c")
        .arg(&config)
        .arg("extract")
        .write_stdin("Total 121.00\nIVA 21.00\n")
        .assert()
        .success()
        .stdout("Nombre,Monto\nIva,21.00\n");
}

#[test]
fn config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("escaner.json");

    escaner()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    escaner()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "server.port", "8080"])
        .assert()
        .success();

    escaner()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("8080\n");

    escaner()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn scan_missing_file_fails() {
    escaner()
        .args(["scan", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
