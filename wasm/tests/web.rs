#![cfg(target_arch = "wasm32")]

use pos_dashboard_wasm::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_sales_chart_uses_browser_clock() {
    let now = js_sys::Date::new_0().to_iso_string();
    let orders = format!(
        r#"[{{"status":"COMPLETED","total_amount":"12.50","created_at":"{}"}}]"#,
        String::from(now)
    );

    let json = sales_chart(&orders, None).unwrap();
    let view: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(view["series"].as_array().map(Vec::len), Some(7));
    assert_eq!(view["selected"], 6);
    assert_eq!(view["series"][6]["orders_count"], 1);
}

#[wasm_bindgen_test]
fn test_sales_chart_rejects_bad_json() {
    let err = sales_chart("{not json", None).unwrap_err();
    assert!(err.as_string().unwrap().starts_with("Invalid orders JSON"));
}

#[wasm_bindgen_test]
fn test_check_adjustment_refuses_overdraw() {
    assert!(check_adjustment(5, 0, "OUT", 10, "STORE").is_err());

    let json = check_adjustment(5, 0, "OUT", 3, "STORE").unwrap();
    let plan: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(plan["new_store_stock"], 2);
}

#[wasm_bindgen_test]
fn test_check_adjustment_unknown_kind() {
    let err = check_adjustment(5, 0, "LOST", 1, "STORE").unwrap_err();
    assert!(err.as_string().unwrap().contains("unknown movement kind"));
}
