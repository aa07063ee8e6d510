//! Order amount resolution
//!
//! Derives the charge amount and currency for an order from progressively
//! weaker sources: the authoritative `grand_total_cents` column, then
//! total-like keys in the legacy pricing snapshot, then the component sum,
//! then zero. Total function: bad snapshots and junk values are skipped,
//! never surfaced.

use serde_json::Value;
use shared::models::Order;

/// Snapshot keys probed for a total, in priority order.
const TOTAL_KEYS: [&str; 7] = [
    "grand_total_cents",
    "grandTotalCents",
    "total_cents",
    "totalCents",
    "grand_total",
    "grandTotal",
    "total",
];

/// Snapshot sub-objects probed after the top level.
const NESTED_KEYS: [&str; 2] = ["totals", "pricing"];

/// Resolved charge for an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTotal {
    /// Amount in minor units (cents)
    pub amount_cents: i64,
    /// Uppercase currency code
    pub currency: String,
}

/// Resolve the amount and currency to charge for `order`.
pub fn resolve(order: &Order) -> ResolvedTotal {
    let snapshot: Option<Value> = order
        .snapshot
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok());
    let snapshot_obj = snapshot.as_ref().and_then(Value::as_object);

    let amount_cents = order
        .grand_total_cents
        .filter(|cents| *cents > 0)
        .or_else(|| snapshot_obj.and_then(probe_total))
        .unwrap_or_else(|| component_sum(order));

    let currency = order
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| snapshot_obj.and_then(probe_currency))
        .unwrap_or_else(|| "USD".to_string())
        .to_uppercase();

    ResolvedTotal {
        amount_cents,
        currency,
    }
}

/// First positive integer under a total-like key: top level first, then the
/// `totals` / `pricing` sub-objects.
fn probe_total(obj: &serde_json::Map<String, Value>) -> Option<i64> {
    probe_keys(obj).or_else(|| {
        NESTED_KEYS
            .iter()
            .filter_map(|nested| obj.get(*nested).and_then(Value::as_object))
            .find_map(probe_keys)
    })
}

fn probe_keys(obj: &serde_json::Map<String, Value>) -> Option<i64> {
    TOTAL_KEYS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_positive_cents)
}

/// Accept JSON integers and integer-shaped strings; everything else is junk.
fn as_positive_cents(value: &Value) -> Option<i64> {
    let cents = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    cents.filter(|c| *c > 0)
}

fn probe_currency(obj: &serde_json::Map<String, Value>) -> Option<String> {
    currency_of(obj).or_else(|| {
        NESTED_KEYS
            .iter()
            .filter_map(|nested| obj.get(*nested).and_then(Value::as_object))
            .find_map(currency_of)
    })
}

fn currency_of(obj: &serde_json::Map<String, Value>) -> Option<String> {
    obj.get("currency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// `parts + assembly + mods + delivery + tax - discount`, NULLs as zero,
/// floored at zero.
fn component_sum(order: &Order) -> i64 {
    let sum = order.parts_cents.unwrap_or(0)
        + order.assembly_cents.unwrap_or(0)
        + order.mods_cents.unwrap_or(0)
        + order.delivery_cents.unwrap_or(0)
        + order.tax_cents.unwrap_or(0)
        - order.discount_cents.unwrap_or(0);
    sum.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_order() -> Order {
        Order {
            id: 1,
            order_number: "NJ-101-042425".to_string(),
            status: "accepted".to_string(),
            owner_group_id: Some(10),
            accepted_by_user_id: Some(20),
            parts_cents: None,
            assembly_cents: None,
            mods_cents: None,
            delivery_cents: None,
            tax_cents: None,
            discount_cents: None,
            grand_total_cents: None,
            currency: None,
            snapshot: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn grand_total_wins_over_everything() {
        let mut order = base_order();
        order.grand_total_cents = Some(145000);
        order.parts_cents = Some(99);
        order.snapshot = Some("{\"total\": 1}".to_string());

        let resolved = resolve(&order);
        assert_eq!(resolved.amount_cents, 145000);
        assert_eq!(resolved.currency, "USD");
    }

    #[test]
    fn zero_grand_total_falls_through_to_snapshot() {
        let mut order = base_order();
        order.grand_total_cents = Some(0);
        order.snapshot = Some("{\"grand_total_cents\":9876,\"currency\":\"usd\"}".to_string());

        let resolved = resolve(&order);
        assert_eq!(resolved.amount_cents, 9876);
        assert_eq!(resolved.currency, "USD");
    }

    #[test]
    fn negative_grand_total_is_not_authoritative() {
        let mut order = base_order();
        order.grand_total_cents = Some(-500);
        order.parts_cents = Some(1200);

        assert_eq!(resolve(&order).amount_cents, 1200);
    }

    #[test]
    fn snapshot_keys_probe_in_order() {
        let mut order = base_order();
        order.snapshot = Some("{\"total\": 100, \"totalCents\": 250}".to_string());

        // totalCents precedes total in the probe list
        assert_eq!(resolve(&order).amount_cents, 250);
    }

    #[test]
    fn snapshot_camel_case_key_accepted() {
        let mut order = base_order();
        order.snapshot = Some("{\"grandTotalCents\": 4321}".to_string());

        assert_eq!(resolve(&order).amount_cents, 4321);
    }

    #[test]
    fn snapshot_nested_totals_and_pricing() {
        let mut order = base_order();
        order.snapshot = Some("{\"totals\": {\"total_cents\": 777}}".to_string());
        assert_eq!(resolve(&order).amount_cents, 777);

        order.snapshot = Some("{\"pricing\": {\"grandTotal\": \"888\"}}".to_string());
        assert_eq!(resolve(&order).amount_cents, 888);
    }

    #[test]
    fn snapshot_top_level_beats_nested() {
        let mut order = base_order();
        order.snapshot =
            Some("{\"total\": 50, \"totals\": {\"grand_total_cents\": 9999}}".to_string());

        assert_eq!(resolve(&order).amount_cents, 50);
    }

    #[test]
    fn snapshot_integer_shaped_string_accepted() {
        let mut order = base_order();
        order.snapshot = Some("{\"total\": \" 1234 \"}".to_string());

        assert_eq!(resolve(&order).amount_cents, 1234);
    }

    #[test]
    fn snapshot_junk_values_skipped() {
        let mut order = base_order();
        // float, non-numeric string, bool, null: all skipped; last key wins
        order.snapshot = Some(
            "{\"grand_total_cents\": 12.5, \"total_cents\": \"12.50\", \"grandTotal\": true, \"totalCents\": null, \"total\": 321}"
                .to_string(),
        );

        assert_eq!(resolve(&order).amount_cents, 321);
    }

    #[test]
    fn snapshot_non_positive_values_skipped() {
        let mut order = base_order();
        order.snapshot = Some("{\"total_cents\": 0, \"total\": -5}".to_string());
        order.parts_cents = Some(600);

        assert_eq!(resolve(&order).amount_cents, 600);
    }

    #[test]
    fn snapshot_parse_failure_is_swallowed() {
        let mut order = base_order();
        order.snapshot = Some("not json at all {{{".to_string());
        order.parts_cents = Some(450);

        assert_eq!(resolve(&order).amount_cents, 450);
    }

    #[test]
    fn component_sum_adds_and_subtracts() {
        let mut order = base_order();
        order.parts_cents = Some(1000);
        order.assembly_cents = Some(500);
        order.mods_cents = Some(250);
        order.delivery_cents = Some(100);
        order.tax_cents = Some(150);
        order.discount_cents = Some(200);

        assert_eq!(resolve(&order).amount_cents, 1800);
    }

    #[test]
    fn component_sum_floors_at_zero() {
        let mut order = base_order();
        order.parts_cents = Some(100);
        order.discount_cents = Some(500);

        assert_eq!(resolve(&order).amount_cents, 0);
    }

    #[test]
    fn empty_order_defaults_to_zero_usd() {
        let resolved = resolve(&base_order());
        assert_eq!(resolved.amount_cents, 0);
        assert_eq!(resolved.currency, "USD");
    }

    #[test]
    fn order_currency_beats_snapshot_currency() {
        let mut order = base_order();
        order.currency = Some("eur".to_string());
        order.snapshot = Some("{\"currency\": \"gbp\", \"total\": 100}".to_string());

        assert_eq!(resolve(&order).currency, "EUR");
    }

    #[test]
    fn blank_order_currency_falls_through() {
        let mut order = base_order();
        order.currency = Some("  ".to_string());
        order.snapshot = Some("{\"totals\": {\"currency\": \"cad\"}}".to_string());

        assert_eq!(resolve(&order).currency, "CAD");
    }
}
