//! Runs the `launch-cycle` binary end to end against files in a temp dir.

use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_launch-cycle"))
}

const TOKENS: &str = r#"[
    {"id": "solana", "symbol": "SOL", "name": "Solana",
     "current_price": 150.0, "ath": 260.0, "market_cap_rank": 5,
     "launch_date": "2020-04-10", "launch_price": 0.95,
     "listed": true, "delisted": false},
    {"id": "tether", "symbol": "USDT", "name": "Tether",
     "current_price": 1.0, "launch_date": "2015-02-25", "launch_price": 1.0,
     "category": "Stablecoin"},
    {"id": "gone", "symbol": "GONE", "name": "Gone",
     "launch_date": "2022-03-01", "launch_price": 2.0,
     "binance_listed": true, "binance_delisted": true, "binance_delist_date": "2023-04-01"}
]"#;

#[test]
fn analyze_writes_report_and_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    let reference = dir.path().join("btc.json");
    let report = dir.path().join("report.json");
    let enriched = dir.path().join("enriched.json");
    std::fs::write(&tokens, TOKENS).unwrap();
    std::fs::write(
        &reference,
        r#"{"prices": [[1586476800000, 6800.0], [1646092800000, 43000.0], [1717200000000, 67500.0]]}"#,
    )
    .unwrap();

    let status = bin()
        .args(["analyze", "--tokens"])
        .arg(&tokens)
        .arg("--reference")
        .arg(&reference)
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .args(["--as-of", "2024-06-01", "--format", "json"])
        .arg("--output")
        .arg(&report)
        .arg("--tokens-output")
        .arg(&enriched)
        .status()
        .unwrap();
    assert!(status.success());

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["total_tokens"], 2);
    assert_eq!(value["transparency"]["excluded_stablecoin"], 1);
    assert_eq!(value["transparency"]["imputed_dead"], 1);
    assert!(value["primary_test"]["p_value"].is_null());
    assert_eq!(value["moving_average_robustness"].as_array().unwrap().len(), 4);

    let records: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&enriched).unwrap()).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["cycle_type"], "Bull");
    assert_eq!(records[1]["roi_since_launch"], -1.0);
}

#[test]
fn analyze_fails_on_missing_tokens_file() {
    let dir = tempfile::tempdir().unwrap();
    let status = bin()
        .args(["analyze", "--tokens"])
        .arg(dir.path().join("nope.json"))
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cycles_prints_canonical_table() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .arg("cycles")
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let cycles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cycles = cycles.as_array().unwrap();
    assert_eq!(cycles.len(), 12);
    assert_eq!(cycles[0]["name"], "Pre-2013 Early");
    assert_eq!(cycles[11]["type"], "Bear");
}
