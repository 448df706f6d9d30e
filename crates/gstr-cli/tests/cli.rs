use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "KIRANA WHOLESALE\nGSTIN: 37AAAPL1234C1ZV\nInvoice Date: 01/06/2024\nRice 25kg\nTotal: ₹1180.00\n";

fn gstr(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gstr").unwrap();
    cmd.arg("--config").arg(config_dir.path().join("config.json"));
    cmd
}

fn write_invoice(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn process_text_invoice_as_json() {
    let dir = TempDir::new().unwrap();
    let input = write_invoice(&dir, "invoice.txt", INVOICE);

    let output = gstr(&dir)
        .arg("process")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["breakdown"]["cgst"], "90.00");
    assert_eq!(json["breakdown"]["sgst"], "90.00");
    assert_eq!(json["filing_record"]["Place of Supply"], "37");
}

#[test]
fn process_text_invoice_as_csv() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();
    let input = write_invoice(&dir, "invoice.txt", INVOICE);

    gstr(&dir)
        .arg("process")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "GSTIN/UIN of Recipient,Invoice Date,Invoice Value,Place of Supply,Reverse Charge,Invoice Type",
        ))
        .stdout(predicate::str::contains(
            "37AAAPL1234C1ZV,2024-06-01,1180.00,37,N,Regular",
        ));
}

#[test]
fn export_csv_uses_filing_file_name() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();
    let input = write_invoice(&dir, "invoice.txt", INVOICE);
    let out_dir = dir.path().join("exports");

    gstr(&dir)
        .arg("process")
        .arg(&input)
        .arg("--export-csv")
        .arg(&out_dir)
        .assert()
        .success();

    let csv = fs::read_to_string(out_dir.join("GSTR-1_37AAAPL1234C1ZV_2024-06-01.csv")).unwrap();
    assert!(csv.ends_with("37AAAPL1234C1ZV,2024-06-01,1180.00,37,N,Regular\n"));
}

#[test]
fn process_ocr_json_fragments() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();
    let input = write_invoice(
        &dir,
        "ocr.json",
        r#"["GSTIN: 29AAAPL1234C1ZV", "Date: 12-Jan-2025", "Grand Total 2360.00"]"#,
    );

    let output = gstr(&dir).arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["regime"], "inter_state");
    assert_eq!(json["breakdown"]["igst"], "360.00");
    assert_eq!(json["filing_record"]["Invoice Date"], "2025-01-12");
}

#[test]
fn missing_fields_warn_and_use_placeholders() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();
    let input = write_invoice(&dir, "invoice.txt", "Thank you for shopping\n");

    gstr(&dir)
        .arg("process")
        .arg(&input)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GSTIN:   Not Found"))
        .stdout(predicate::str::contains("Place:   Unknown"))
        .stderr(predicate::str::contains("Could not extract tax id"));
}

#[test]
fn rejects_unsupported_upload() {
    let dir = TempDir::new().unwrap();
    let input = write_invoice(&dir, "scan.bmp", "BM");

    gstr(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload JPG or PNG"));
}

#[test]
fn rejects_missing_input() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();

    gstr(&dir)
        .arg("process")
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn config_set_changes_home_state() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();

    gstr(&dir)
        .args(["config", "set", "tax.intra_state_code", "29"])
        .assert()
        .success();
    gstr(&dir)
        .args(["config", "get", "tax.intra_state_code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"29\""));

    let input = write_invoice(&dir, "invoice.txt", &INVOICE.replace("37AAAPL", "29AAAPL"));
    let output = gstr(&dir).arg("process").arg(&input).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["regime"], "intra_state");
}

#[test]
fn config_set_rejects_invalid_state_code() {
    let dir = TempDir::new().unwrap();
    gstr(&dir).args(["config", "init"]).assert().success();

    gstr(&dir)
        .args(["config", "set", "tax.intra_state_code", "AP"])
        .assert()
        .failure();
}

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();

    gstr(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"intra_state_code\": \"37\""))
        .stdout(predicate::str::contains("\"standard_rate\": \"0.18\""));
}
