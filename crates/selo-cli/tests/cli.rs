use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SEAL_TEXT: &str = "SELO DE CONSULTA: MA0471131402\n\
QUANTIDADE: 1\n\
117901)\n\
Ato(s) Praticado(s) por: JANAINA STANNISLAVA E SILVA - ar ato\n\
ESCREVENTE\n\
Emol.: R$ 50,73 Total: R$ 60,98 ISS: R$ 1,42\n\
CÓDIGO DE SEGURANÇA: 0471.1314.0274.7824\n";

/// Command using a config file inside `dir`, isolated from the user's one.
fn selo(dir: &Path) -> Command {
    let config = dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("selo").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn seal_text_file_to_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("seal.txt");
    fs::write(&input, SEAL_TEXT).unwrap();

    selo(dir.path())
        .arg("seal")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""securityCode":"0471.1314.0274.7824""#))
        .stdout(predicate::str::contains(r#""actCount":"1(7901)""#))
        .stdout(predicate::str::contains(
            r#""performedBy":"JANAINA STANNISLAVA E SILVA""#,
        ))
        .stdout(predicate::str::contains(
            "Emol: R$ 50,73 - Total: R$ 60,98 - ISS: R$ 1,42",
        ));
}

#[test]
fn seal_text_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("seal.txt");
    fs::write(&input, SEAL_TEXT).unwrap();

    selo(dir.path())
        .args(["seal", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Consultation code: MA0471131402"))
        .stdout(predicate::str::contains("  ISS: R$ 1,42"));
}

#[test]
fn seal_uses_configured_separator() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"extraction": {"values_separator": " | "}}"#,
    )
    .unwrap();
    let input = dir.path().join("seal.txt");
    fs::write(&input, SEAL_TEXT).unwrap();

    selo(dir.path())
        .arg("seal")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Emol: R$ 50,73 | Total: R$ 60,98 | ISS: R$ 1,42",
        ));
}

#[test]
fn seal_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    selo(dir.path())
        .arg("seal")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn seal_unsupported_format_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("seal.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    selo(dir.path())
        .arg("seal")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: pdf"));
}

#[test]
fn seal_image_with_broken_engine_yields_empty_record() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"ocr": {"command": "/nonexistent/tesseract"}}"#,
    )
    .unwrap();
    let input = dir.path().join("seal.png");
    fs::write(&input, b"not really a png").unwrap();

    selo(dir.path())
        .arg("seal")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""consultationCode":"""#))
        .stdout(predicate::str::contains(r#""actCount":"""#));
}

#[cfg(unix)]
#[test]
fn seal_image_with_slow_engine_times_out() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"ocr": {"command": "sh", "timeout_secs": 1}}"#,
    )
    .unwrap();
    // `sh` runs the image itself as its script.
    let input = dir.path().join("seal.png");
    fs::write(&input, "exec sleep 10\n").unwrap();

    let start = Instant::now();
    selo(dir.path())
        .arg("seal")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""securityCode":"""#));

    assert!(start.elapsed() < Duration::from_secs(6));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), SEAL_TEXT).unwrap();
    fs::write(inputs.join("b.txt"), "lorem ipsum no relevant fields").unwrap();

    let pattern = format!("{}/*.txt", inputs.display());
    selo(dir.path())
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files to process"));

    let a = fs::read_to_string(outputs.join("a.json")).unwrap();
    assert!(a.contains(r#""actCount":"1(7901)""#));
    assert!(outputs.join("b.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,"));
    assert!(summary.contains("a.txt,success,MA0471131402"));
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    selo(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn fees_table08_csv() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tabela08.txt");
    fs::write(
        &input,
        "| Habilitação de casamento | 120,50 | 5,74 | 114,76 | 6,03 | 3,00 | 129,53 | 8101 |\n",
    )
    .unwrap();

    selo(dir.path())
        .args(["fees", "--table", "08", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("description,gross_emolument"))
        .stdout(predicate::str::contains("Habilitação de casamento,120.50"))
        .stdout(predicate::str::contains("8101,Tabela 08"));
}

#[test]
fn fees_unknown_table_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tabela.txt");
    fs::write(&input, "").unwrap();

    selo(dir.path())
        .args(["fees", "--table", "09"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown fee table"));
}

#[test]
fn closing_report_text() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("fechamento.txt");
    fs::write(
        &input,
        "Total 10 5 0 1\nEmolumento Apurado: R$ 1.234,56\nISSQN recebido dos usuários: R$ 61,73\n",
    )
    .unwrap();

    selo(dir.path())
        .args(["closing", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Atos praticados:          16"))
        .stdout(predicate::str::contains("R$ 1.234,56"))
        .stdout(predicate::str::contains("R$ 61,73"));
}

#[test]
fn closing_totals_several_reports() {
    let dir = TempDir::new().unwrap();
    let january = dir.path().join("janeiro.txt");
    let february = dir.path().join("fevereiro.txt");
    fs::write(
        &january,
        "Total 10 5 0 1\nEmolumento Apurado: R$ 1.000,00\nISSQN recebido dos usuários: R$ 50,00\n",
    )
    .unwrap();
    fs::write(
        &february,
        "Total 4 0 0 0\nEmolumento Apurado: R$ 500,00\nTotal de despesas do mês: R$ 300,00\n",
    )
    .unwrap();

    selo(dir.path())
        .args(["closing", "--format", "text"])
        .arg(&january)
        .arg(&february)
        .assert()
        .success()
        .stdout(predicate::str::contains("Totais (2 relatórios)"))
        .stdout(predicate::str::contains("Atos praticados:          20"))
        .stdout(predicate::str::contains("Arrecadação:              R$ 1.550,00"))
        .stdout(predicate::str::contains("Custeio:                  R$ 300,00"))
        .stdout(predicate::str::contains("Repasses:                 R$ 50,00"));

    selo(dir.path())
        .arg("closing")
        .arg(&january)
        .arg(&february)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""totals""#))
        .stdout(predicate::str::contains("janeiro.txt"));
}

#[test]
fn closing_without_data_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("fechamento.txt");
    fs::write(&input, "lorem ipsum").unwrap();

    selo(dir.path())
        .arg("closing")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data found"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();

    selo(dir.path())
        .args(["config", "set", "ocr.timeout_secs", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set ocr.timeout_secs = 5"));

    selo(dir.path())
        .args(["config", "get", "ocr.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    selo(dir.path())
        .args(["config", "set", "ocr.unknown", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("selo.json");

    selo(dir.path())
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());

    selo(dir.path())
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
