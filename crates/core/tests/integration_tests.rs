// ═══════════════════════════════════════════════════════════════════
// Integration Tests: PortfolioAnalytics facade end to end
// ═══════════════════════════════════════════════════════════════════

use portfolio_analytics_core::errors::{CoreError, View};
use portfolio_analytics_core::models::field::RawField;
use portfolio_analytics_core::models::settings::Settings;
use portfolio_analytics_core::models::summary::RiskLevel;
use portfolio_analytics_core::PortfolioAnalytics;

const IMPORTED: &str = r#"{
    "metadata": {"imported_at": "2024-07-15T10:00:00", "source_file": "Sample Portfolio Dataset for Assignment.xlsx", "version": "1.0"},
    "holdings": [
        {"symbol": "RELIANCE", "name": "Reliance Industries Ltd", "quantity": 50, "avgPrice": 2450.0, "currentPrice": 2680.5,
         "sector": "Energy", "marketCap": "Large", "exchange": "NSE",
         "value": 134025.0, "invested": 122500.0, "gainLoss": 11525.0, "gainLossPercent": 9.41},
        {"symbol": "ICICIBANK", "name": "ICICI Bank Limited", "quantity": 60, "avgPrice": 1100.0, "currentPrice": 1235.8,
         "sector": "Banking", "marketCap": "Large", "exchange": "NSE",
         "value": 74148.0, "invested": 66000.0, "gainLoss": 8148.0, "gainLossPercent": 12.35}
    ],
    "historical_performance": [
        {"date": "2024-01-01", "portfolio": 100, "nifty50": 100, "gold": 100, "portfolioReturn": 0.0},
        {"date": "2024-02-01", "portfolio": 110, "nifty50": 100, "gold": 100, "portfolioReturn": 10.0},
        {"date": "2024-03-01", "portfolio": 90, "nifty50": 100, "gold": 100, "portfolioReturn": -18.18},
        {"date": "2024-04-01", "portfolio": 120, "nifty50": 100, "gold": 100, "portfolioReturn": 33.33},
        {"date": "2024-05-01", "portfolio": 150, "nifty50": 100, "gold": 100, "portfolioReturn": 25.0}
    ],
    "sector_allocation": [
        {"sector": "Energy", "value": 134025.0, "percentage": 64.38, "holdingsCount": 1},
        {"sector": "Banking", "value": 74148.0, "percentage": 35.62, "holdingsCount": 1}
    ],
    "market_cap_allocation": [
        {"marketCap": "Large", "value": 208173.0, "percentage": 100.0, "holdingsCount": 2}
    ],
    "summary_metrics": {"Total Portfolio Value": 208173.0}
}"#;

// ═══════════════════════════════════════════════════════════════════
// Imported snapshot
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_imported_holdings() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let holdings = analytics.holdings().unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].symbol, "RELIANCE");
    assert_eq!(holdings[0].value, 134025.0);
    assert_eq!(holdings[1].gain_loss_percent, 12.35);
    assert!(!analytics.is_using_fallback());
}

#[test]
fn test_imported_summary() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let summary = analytics.summary().unwrap();
    assert_eq!(summary.total_gain_loss, 19673.0);
    assert_eq!(summary.total_gain_loss_percent, 10.44);
    assert_eq!(summary.top_performer.symbol, "ICICIBANK");
    assert_eq!(summary.worst_performer.symbol, "RELIANCE");
    assert_eq!(summary.diversification_score, 2.5);
    assert_eq!(summary.risk_level, RiskLevel::Low);
}

#[test]
fn test_imported_allocation_uses_precomputed() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let allocation = analytics.allocation().unwrap();
    assert_eq!(allocation.by_sector["Energy"].percentage, 64.38);
    assert_eq!(allocation.by_sector["Banking"].count, 1);
    assert_eq!(allocation.by_market_cap["Large"].value, 208173.0);
}

#[test]
fn test_imported_performance() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let performance = analytics.performance().unwrap();
    assert_eq!(performance.timeline.len(), 5);
    let portfolio = performance.returns["portfolio"];
    assert_eq!(portfolio.one_month, 25.0);
    assert_eq!(portfolio.three_months, 66.67);
    assert_eq!(portfolio.one_year, 50.0);
    assert_eq!(performance.returns["nifty50"].one_year, 0.0);
}

#[test]
fn test_metadata_exposed() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let meta = analytics.metadata();
    assert_eq!(
        meta.source_file.as_deref(),
        Some("Sample Portfolio Dataset for Assignment.xlsx")
    );
    assert_eq!(meta.imported_at.unwrap().to_string(), "2024-07-15 10:00:00");
}

// ═══════════════════════════════════════════════════════════════════
// Fallback
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_unreadable_source_serves_fallback() {
    let analytics = PortfolioAnalytics::from_json("this is not json");
    assert!(analytics.is_using_fallback());

    assert_eq!(analytics.holdings().unwrap().len(), 5);
    let allocation = analytics.allocation().unwrap();
    assert_eq!(allocation.by_sector["Technology"].percentage, 57.88);
    assert_eq!(allocation.by_sector["Banking"].percentage, 25.25);
    assert_eq!(allocation.by_sector["Energy"].percentage, 16.87);
    assert_eq!(allocation.by_market_cap["Large"].percentage, 100.0);
    assert_eq!(allocation.by_market_cap["Large"].count, 5);

    let summary = analytics.summary().unwrap();
    assert_eq!(summary.total_value, 794440.75);
    assert_eq!(summary.total_gain_loss_percent, 7.28);

    let performance = analytics.performance().unwrap();
    assert_eq!(performance.timeline.len(), 12);
}

#[test]
fn test_missing_data_file_serves_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        data_path: dir.path().join("portfolio_data.json"),
    };
    let analytics = PortfolioAnalytics::new(&settings);
    assert!(analytics.is_using_fallback());
    assert_eq!(
        analytics.metadata().source_file.as_deref(),
        Some("fallback_data")
    );
}

// ═══════════════════════════════════════════════════════════════════
// View independence
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_malformed_holding_fails_only_holding_views() {
    let json = r#"{
        "holdings": [{"name": "No Symbol", "quantity": 1, "avgPrice": 1, "currentPrice": 1,
                      "sector": "Energy", "marketCap": "Large"}],
        "historical_performance": [
            {"date": "2024-01-01", "portfolio": 100, "nifty50": 1, "gold": 1},
            {"date": "2024-02-01", "portfolio": 110, "nifty50": 1, "gold": 1}
        ],
        "sector_allocation": [{"sector": "Energy", "value": 1, "percentage": 100, "holdingsCount": 1}],
        "market_cap_allocation": [{"marketCap": "Large", "value": 1, "percentage": 100, "holdingsCount": 1}]
    }"#;
    let analytics = PortfolioAnalytics::from_json(json);
    assert!(!analytics.is_using_fallback());

    let err = analytics.holdings().unwrap_err();
    assert_eq!(err.view, View::Holdings);
    assert!(matches!(err.source, CoreError::MalformedRecord(_)));
    assert!(err.to_string().starts_with("Failed to compute holdings:"));

    let err = analytics.summary().unwrap_err();
    assert_eq!(err.view, View::Summary);
    assert!(matches!(err.source, CoreError::MalformedRecord(_)));

    // Precomputed allocation never touches the bad holding
    assert!(analytics.allocation().is_ok());
    assert_eq!(
        analytics.performance().unwrap().returns["portfolio"].one_month,
        10.0
    );
}

#[test]
fn test_malformed_performance_fails_only_performance() {
    let json = r#"{
        "holdings": [{"symbol": "A", "name": "A", "quantity": 1, "avgPrice": 1, "currentPrice": 2,
                      "sector": "Energy", "marketCap": "Large"}],
        "historical_performance": [{"date": "not-a-date", "portfolio": 1, "nifty50": 1, "gold": 1}]
    }"#;
    let analytics = PortfolioAnalytics::from_json(json);

    let err = analytics.performance().unwrap_err();
    assert_eq!(err.view, View::Performance);
    assert!(analytics.holdings().is_ok());
    assert!(analytics.allocation().is_ok());
    assert!(analytics.summary().is_ok());
}

#[test]
fn test_mistyped_quantity_fails_only_holding_views() {
    let json = r#"{
        "holdings": [{"symbol": "A", "name": "A", "quantity": "10", "avgPrice": 1, "currentPrice": 2,
                      "sector": "Energy", "marketCap": "Large"}],
        "historical_performance": [
            {"date": "2024-01-01", "portfolio": 100, "nifty50": 1, "gold": 1},
            {"date": "2024-02-01", "portfolio": 120, "nifty50": 1, "gold": 1}
        ]
    }"#;
    let analytics = PortfolioAnalytics::from_json(json);
    assert!(!analytics.is_using_fallback());

    let err = analytics.holdings().unwrap_err();
    assert_eq!(err.view, View::Holdings);
    assert!(matches!(err.source, CoreError::MalformedRecord(_)));
    assert!(err.to_string().contains("quantity"), "{err}");

    let err = analytics.summary().unwrap_err();
    assert_eq!(err.view, View::Summary);
    // derived allocation needs the holdings too
    assert_eq!(analytics.allocation().unwrap_err().view, View::Allocation);

    let performance = analytics.performance().unwrap();
    assert_eq!(performance.timeline.len(), 2);
    assert_eq!(performance.returns["portfolio"].one_month, 20.0);
}

#[test]
fn test_offset_import_timestamp_still_loads() {
    let json = r#"{
        "metadata": {"imported_at": "2024-07-15T10:00:00+05:30", "source_file": "sheet.xlsx"},
        "holdings": [{"symbol": "A", "name": "A", "quantity": 50.0, "avgPrice": 1, "currentPrice": 2,
                      "sector": "Energy", "marketCap": "Large"}]
    }"#;
    let analytics = PortfolioAnalytics::from_json(json);
    assert!(!analytics.is_using_fallback());
    assert_eq!(analytics.holdings().unwrap()[0].quantity, 50);
}

#[test]
fn test_empty_portfolio_summary_error() {
    let analytics = PortfolioAnalytics::from_json(r#"{"holdings": [], "historical_performance": []}"#);

    let err = analytics.summary().unwrap_err();
    assert!(matches!(err.source, CoreError::EmptyPortfolio));
    assert_eq!(
        err.to_string(),
        "Failed to compute summary: Portfolio has no holdings"
    );

    assert!(analytics.holdings().unwrap().is_empty());
    let allocation = analytics.allocation().unwrap();
    assert!(allocation.by_sector.is_empty());
    let performance = analytics.performance().unwrap();
    assert_eq!(performance.returns["portfolio"].one_year, 0.0);
}

// ═══════════════════════════════════════════════════════════════════
// Idempotence & reload
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_views_are_idempotent() {
    let analytics = PortfolioAnalytics::from_json("broken");
    for view in [View::Holdings, View::Allocation, View::Performance, View::Summary] {
        let first = analytics.view_json(view).unwrap();
        let second = analytics.view_json(view).unwrap();
        assert_eq!(first, second, "{view} differs between calls");
    }
    assert_eq!(analytics.generation(), 1);
}

#[test]
fn test_view_json_shape() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let perf: serde_json::Value =
        serde_json::from_str(&analytics.view_json(View::Performance).unwrap()).unwrap();
    assert_eq!(perf["returns"]["portfolio"]["3months"], 66.67);
    assert_eq!(perf["timeline"][0]["date"], "2024-01-01");

    let summary: serde_json::Value =
        serde_json::from_str(&analytics.view_json(View::Summary).unwrap()).unwrap();
    assert_eq!(summary["riskLevel"], "Low");
    assert_eq!(summary["holdingsCount"], 2);

    let err = PortfolioAnalytics::from_json(r#"{"holdings": []}"#)
        .view_json(View::Summary)
        .unwrap_err();
    assert_eq!(err.view, View::Summary);
}

#[test]
fn test_reload_rereads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio_data.json");
    std::fs::write(&path, IMPORTED).unwrap();

    let analytics = PortfolioAnalytics::new(&Settings {
        data_path: path.clone(),
    });
    let before = analytics.snapshot();
    assert_eq!(analytics.holdings().unwrap().len(), 2);

    let updated = IMPORTED.replace("\"quantity\": 60", "\"quantity\": 70");
    std::fs::write(&path, updated).unwrap();

    // Cached until reload
    assert_eq!(analytics.holdings().unwrap()[1].quantity, 60);

    analytics.reload();
    assert_eq!(analytics.holdings().unwrap()[1].quantity, 70);
    assert_eq!(analytics.generation(), 2);
    // The snapshot taken before reload is untouched
    assert_eq!(before.holdings[1].quantity, Some(RawField::Valid(60)));
}

#[test]
fn test_reload_before_any_load() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    analytics.reload();
    analytics.reload();
    assert_eq!(analytics.generation(), 0);
    assert!(analytics.summary().is_ok());
    assert_eq!(analytics.generation(), 1);
}

#[test]
fn test_shared_across_threads() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    std::thread::scope(|scope| {
        for i in 0..4 {
            let analytics = &analytics;
            scope.spawn(move || {
                for _ in 0..25 {
                    assert_eq!(analytics.summary().unwrap().holdings_count, 2);
                    assert!(analytics.allocation().is_ok());
                    if i == 0 {
                        analytics.reload();
                    }
                }
            });
        }
    });
}

#[test]
fn test_debug_format() {
    let analytics = PortfolioAnalytics::from_json(IMPORTED);
    let dbg = format!("{analytics:?}");
    assert!(dbg.contains("PortfolioAnalytics"));
    assert!(dbg.contains("in-memory snapshot"));
    assert!(dbg.contains("loaded: false"));

    analytics.holdings().unwrap();
    let dbg = format!("{analytics:?}");
    assert!(dbg.contains("loaded: true"));
    assert!(dbg.contains("generation: 1"));
}
