//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tally_core::test_utils::MockMarketServer;
use tally_core::{HttpMarketData, JsonFileSink, LookupConfig, MemorySink, MockMarketData, ReportSink};
use tempfile::TempDir;

use crate::commands::{self, Session};

const LEDGER: &str = "Дата операции,Дата платежа,Номер карты,Сумма платежа,Категория,Описание
31.12.2021 16:44:00,31.12.2021,*7197,-160.89,Супермаркеты,Колхоз
30.12.2021 19:18:22,31.12.2021,*7197,-7.07,Каршеринг,Ситидрайв
29.12.2021 22:32:24,29.12.2021,*7197,-1.32,Каршеринг,Ситидрайв
16.12.2021 16:19:02,16.12.2021,,-200.00,Мобильная связь,Тинькофф Мобайл +7 995 555-55-55
20.11.2021 16:19:02,20.11.2021,*5091,-3.55,Каршеринг,Ситидрайв
";

/// Write the sample ledger and settings into a temp dir
fn setup_workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("operations.csv");
    std::fs::write(&ledger, LEDGER).unwrap();
    let settings = dir.path().join("user_settings.json");
    std::fs::write(
        &settings,
        r#"{"user_currencies": ["USD", "EUR"], "user_stocks": ["AAPL", "NOPE"]}"#,
    )
    .unwrap();
    (dir, ledger, settings)
}

fn output_json(out: &[u8]) -> Value {
    serde_json::from_slice(out).unwrap()
}

// ========== Shared Utility Tests ==========

#[test]
fn test_open_ledger_missing_file_names_path() {
    let err = commands::open_ledger(Path::new("/nonexistent/operations.csv")).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/operations.csv"));
}

#[test]
fn test_open_sink() {
    assert!(commands::open_sink(None).unwrap().is_none());

    let dir = TempDir::new().unwrap();
    let reports = dir.path().join("logs");
    let sink = commands::open_sink(Some(&reports)).unwrap().unwrap();
    assert!(reports.is_dir());
    assert_eq!(sink.dir(), reports.as_path());
}

#[test]
fn test_read_settings_missing_file_is_empty() {
    let settings = commands::read_settings(Path::new("/nonexistent/user_settings.json")).unwrap();
    assert!(settings.user_currencies.is_empty());
    assert!(settings.user_stocks.is_empty());
}

#[test]
fn test_read_settings_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user_settings.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(commands::read_settings(&path).is_err());
}

// ========== Phones Command Tests ==========

#[test]
fn test_cmd_phones() {
    let (_dir, ledger_path, _) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();
    let sink = MemorySink::new();

    let mut out = Vec::new();
    commands::cmd_phones(&ledger, Some(&sink), &mut out).unwrap();

    let json = output_json(&out);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["category"], "Мобильная связь");

    let reports = sink.reports();
    assert_eq!(reports[0].0, commands::PHONES_REPORT);
    assert_eq!(reports[0].1, json);
}

#[test]
fn test_cmd_phones_without_amount_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("operations.csv");
    std::fs::write(
        &path,
        "Дата операции,Категория,Описание\n16.12.2021 16:19:02,Мобильная связь,Тинькофф Мобайл +7 995 555-55-55\n",
    )
    .unwrap();
    let ledger = commands::open_ledger(&path).unwrap();

    let mut out = Vec::new();
    commands::cmd_phones(&ledger, None, &mut out).unwrap();
    assert_eq!(output_json(&out).as_array().unwrap().len(), 1);
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_category_report() {
    let (_dir, ledger_path, _) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();

    let mut out = Vec::new();
    commands::cmd_category_report(&ledger, "Каршеринг", Some("31.12.2021"), None, &mut out)
        .unwrap();

    let json = output_json(&out);
    let amounts: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![-3.55, -1.32, -7.07]);
}

#[test]
fn test_cmd_category_report_invalid_date() {
    let (_dir, ledger_path, _) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();

    let mut out = Vec::new();
    let err = commands::cmd_category_report(&ledger, "Каршеринг", Some("2021-12-31"), None, &mut out)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<tally_core::Error>(),
        Some(tally_core::Error::InvalidDateFormat { .. })
    ));
    assert!(out.is_empty());
}

#[test]
fn test_cmd_category_report_archived_to_disk() {
    let (dir, ledger_path, _) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();
    let sink = JsonFileSink::new(dir.path().join("logs")).unwrap();

    let mut out = Vec::new();
    commands::cmd_category_report(&ledger, "Каршеринг", Some("31.12.2021"), Some(&sink), &mut out)
        .unwrap();

    let archived = std::fs::read_to_string(sink.path_for(commands::CATEGORY_REPORT)).unwrap();
    let archived: Value = serde_json::from_str(&archived).unwrap();
    assert_eq!(archived, output_json(&out));
}

#[tokio::test]
async fn test_cmd_main_page_with_mock_market() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();

    let mut out = Vec::new();
    commands::cmd_main_page(
        &ledger,
        Some("2021-12-31 16:44:00"),
        &settings,
        &MockMarketData::new(),
        None,
        &mut out,
    )
    .await
    .unwrap();

    let json = output_json(&out);
    assert!(json["greeting"].as_str().unwrap().starts_with("Good "));
    assert_eq!(json["currency_rates"]["USD"], 80.0);
    assert_eq!(json["stock_prices"]["NOPE"], Value::Null);

    let card = &json["spending_data"]["*7197"];
    assert_eq!(card["last_4_digits"], "7197");
    assert_eq!(card["total_spent"], -169.28);
    assert_eq!(card["cashback"], -2.0);
    // *5091 only spent in November
    assert!(json["spending_data"].get("*5091").is_none());
}

#[tokio::test]
async fn test_cmd_main_page_with_mock_server() {
    let server = MockMarketServer::start().await;
    let config = LookupConfig::default()
        .with_base_url(&server.url())
        .with_keys("test-key", "test-key");
    let market = HttpMarketData::new(config).unwrap();

    let (_dir, ledger_path, settings) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();

    let mut out = Vec::new();
    commands::cmd_main_page(&ledger, Some("2021-12-31 16:44:00"), &settings, &market, None, &mut out)
        .await
        .unwrap();

    let json = output_json(&out);
    assert_eq!(json["currency_rates"]["USD"], 80.0);
    assert_eq!(json["stock_prices"]["AAPL"], 150.12);
    assert_eq!(json["stock_prices"]["NOPE"], Value::Null);
}

#[tokio::test]
async fn test_cmd_main_page_lookups_down() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let ledger = commands::open_ledger(&ledger_path).unwrap();

    let mut out = Vec::new();
    commands::cmd_main_page(
        &ledger,
        Some("2021-12-31 16:44:00"),
        &settings,
        &MockMarketData::unavailable(),
        None,
        &mut out,
    )
    .await
    .unwrap();

    let json = output_json(&out);
    assert_eq!(json["currency_rates"]["USD"], Value::Null);
    assert_eq!(json["stock_prices"]["AAPL"], Value::Null);
    assert!(json["spending_data"].get("*7197").is_some());
}

// ========== Interactive Command Tests ==========

/// Run one interactive round with `input`, returning everything printed
async fn run_interactive(ledger_path: &Path, settings: &Path, sink: Option<&dyn ReportSink>, input: &str) -> String {
    let market = MockMarketData::new();
    let session = Session {
        ledger_path,
        settings_path: settings,
        market: &market,
        sink,
    };
    let mut out = Vec::new();
    commands::cmd_interactive(&session, Cursor::new(input.to_string()), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_interactive_main_page_default_date() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let sink = MemorySink::new();

    let printed = run_interactive(&ledger_path, &settings, Some(&sink), "1\n\n").await;
    assert!(printed.contains("1 - main_page"));

    // 2021-12-31 00:00:00: the 16:44 supermarket row is excluded
    let reports = sink.reports();
    assert_eq!(reports[0].0, commands::MAIN_PAGE_REPORT);
    assert_eq!(reports[0].1["spending_data"]["*7197"]["total_spent"], -8.39);
}

#[tokio::test]
async fn test_interactive_phones_by_name() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let printed = run_interactive(&ledger_path, &settings, None, "filtered_by_phone\n").await;
    assert!(printed.contains("+7 995 555-55-55"));
}

#[tokio::test]
async fn test_interactive_report_default_date() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let sink = MemorySink::new();

    run_interactive(&ledger_path, &settings, Some(&sink), "3\nКаршеринг\n\n").await;

    let reports = sink.reports();
    assert_eq!(reports[0].0, commands::CATEGORY_REPORT);
    assert_eq!(reports[0].1.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_interactive_report_invalid_date() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let printed = run_interactive(&ledger_path, &settings, None, "3\nКаршеринг\n2021-12-31\n").await;
    assert!(printed.contains("Error: invalid date format. Use DD.MM.YYYY."));
}

#[tokio::test]
async fn test_interactive_main_page_invalid_date() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let printed = run_interactive(&ledger_path, &settings, None, "main_page\n31.12.2021\n").await;
    assert!(printed.contains("Error: invalid date format. Use YYYY-MM-DD HH:MM:SS."));
}

#[tokio::test]
async fn test_interactive_unknown_command() {
    let (_dir, ledger_path, settings) = setup_workspace();
    let printed = run_interactive(&ledger_path, &settings, None, "4\n").await;
    assert!(printed.contains("Error: unknown command"));
}

#[tokio::test]
async fn test_interactive_missing_ledger() {
    let (_dir, _, settings) = setup_workspace();
    let printed =
        run_interactive(Path::new("/nonexistent/operations.csv"), &settings, None, "2\n").await;
    assert!(printed.contains("Error: Failed to load ledger"));
}

#[tokio::test]
async fn test_cmd_main_page_without_card_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("operations.csv");
    std::fs::write(&path, "operation_date,amount,category\n01.12.2021 10:00:00,1500,Food\n").unwrap();
    let ledger = commands::open_ledger(&path).unwrap();

    let mut out = Vec::new();
    let err = commands::cmd_main_page(
        &ledger,
        Some("2021-12-31 00:00:00"),
        Path::new("/nonexistent/user_settings.json"),
        &MockMarketData::new(),
        None,
        &mut out,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<tally_core::Error>(),
        Some(tally_core::Error::MalformedInput(_))
    ));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_interactive_main_page_without_card_column() {
    let (dir, _, settings) = setup_workspace();
    let path = dir.path().join("no_cards.csv");
    std::fs::write(&path, "operation_date,amount,category\n01.12.2021 10:00:00,1500,Food\n").unwrap();

    let printed = run_interactive(&path, &settings, None, "1\n\n").await;
    assert!(printed.contains("card_number"));
}
