//! Row filter and SKU normalizer.
//!
//! Raw SKUs are matched by case-sensitive substring containment. Unpaid lines are
//! dropped before any mode rule runs.

use crate::domain::model::{FilterMode, NormalizedLine, OrderLine};

pub const MAT_SKU: &str = "elite-play-mat-v2";
pub const BALLS_SKU: &str = "pitballs-100";

/// Canonical SKUs for a raw SKU under `mode`, in emission order.
///
/// `accessories` can yield two SKUs (mat then balls); every other mode yields at most one.
pub fn canonical_skus(sku: &str, mode: FilterMode) -> Vec<String> {
    match mode {
        FilterMode::None => vec![sku.to_string()],
        FilterMode::Mats => {
            if is_mat(sku) {
                vec![MAT_SKU.to_string()]
            } else {
                Vec::new()
            }
        }
        FilterMode::Balls => {
            if sku.contains("playpen-mat-balls") {
                vec![BALLS_SKU.to_string()]
            } else if sku.contains("balls") {
                vec![sku.to_string()]
            } else {
                Vec::new()
            }
        }
        FilterMode::Playpens => {
            if sku.contains("playpen-mat") {
                // only two colours ship today
                let colour = if sku.contains("blue") {
                    "playpen-blue"
                } else {
                    "playpen-red"
                };
                vec![colour.to_string()]
            } else if sku.contains("playpen") {
                vec![sku.to_string()]
            } else {
                Vec::new()
            }
        }
        FilterMode::Accessories => {
            let mut skus = Vec::with_capacity(2);
            if is_mat(sku) {
                skus.push(MAT_SKU.to_string());
            }
            if sku.contains("playpen-mat-balls") || sku.contains(BALLS_SKU) {
                skus.push(BALLS_SKU.to_string());
            }
            skus
        }
    }
}

fn is_mat(sku: &str) -> bool {
    sku.contains("playpen-mat") || sku.contains("elite-play-mat")
}

pub fn normalize(line: &OrderLine, mode: FilterMode) -> Vec<NormalizedLine<'_>> {
    if !line.payment_status.is_paid() {
        return Vec::new();
    }

    canonical_skus(&line.sku, mode)
        .into_iter()
        .map(|canonical_sku| NormalizedLine {
            canonical_sku,
            line,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::model::{PaymentStatus, RiskLevel, ShippingAddress};

    pub(crate) fn paid_line(order_id: &str, sku: &str) -> OrderLine {
        OrderLine {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity: 1,
            payment_status: PaymentStatus::Paid,
            risk_level: RiskLevel::Low,
            shipping: ShippingAddress {
                name: "Jane Doe".to_string(),
                address1: "12 Main St".to_string(),
                city: "Fontana".to_string(),
                state: "CA".to_string(),
                zip: "92335".to_string(),
                country: "US".to_string(),
                phone: "(909) 555-0100".to_string(),
                email: "jane@example.com".to_string(),
                ..ShippingAddress::default()
            },
        }
    }

    fn skus(sku: &str, mode: FilterMode) -> Vec<String> {
        canonical_skus(sku, mode)
    }

    #[test]
    fn test_bundle_sku_per_mode() {
        let bundle = "playpen-mat-balls-blue";
        assert_eq!(skus(bundle, FilterMode::Mats), vec!["elite-play-mat-v2"]);
        assert_eq!(skus(bundle, FilterMode::Balls), vec!["pitballs-100"]);
        assert_eq!(skus(bundle, FilterMode::Playpens), vec!["playpen-blue"]);
        assert_eq!(
            skus(bundle, FilterMode::Accessories),
            vec!["elite-play-mat-v2", "pitballs-100"]
        );
        assert_eq!(skus(bundle, FilterMode::None), vec![bundle]);
    }

    #[test]
    fn test_mats_mode() {
        assert_eq!(skus("elite-play-mat", FilterMode::Mats), vec![MAT_SKU]);
        assert_eq!(skus("playpen-mat-red", FilterMode::Mats), vec![MAT_SKU]);
        assert!(skus("playpen-blue", FilterMode::Mats).is_empty());
        assert!(skus("pitballs-100", FilterMode::Mats).is_empty());
    }

    #[test]
    fn test_balls_mode_keeps_standalone_balls() {
        assert_eq!(skus("pitballs-200", FilterMode::Balls), vec!["pitballs-200"]);
        assert_eq!(skus("playpen-mat-balls-red", FilterMode::Balls), vec![BALLS_SKU]);
        assert!(skus("playpen-mat-red", FilterMode::Balls).is_empty());
    }

    #[test]
    fn test_playpens_mode() {
        assert_eq!(
            skus("playpen-red-standalone", FilterMode::Playpens),
            vec!["playpen-red-standalone"]
        );
        assert_eq!(skus("playpen-mat-red", FilterMode::Playpens), vec!["playpen-red"]);
        assert_eq!(skus("playpen-mat-green", FilterMode::Playpens), vec!["playpen-red"]);
        assert!(skus("elite-play-mat", FilterMode::Playpens).is_empty());
    }

    #[test]
    fn test_accessories_mode() {
        assert_eq!(skus("elite-play-mat", FilterMode::Accessories), vec![MAT_SKU]);
        assert_eq!(skus("pitballs-100", FilterMode::Accessories), vec![BALLS_SKU]);
        assert_eq!(skus("playpen-mat-blue", FilterMode::Accessories), vec![MAT_SKU]);
        assert!(skus("playpen-blue", FilterMode::Accessories).is_empty());
        assert!(skus("pitballs-200", FilterMode::Accessories).is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(skus("Playpen-Mat-Blue", FilterMode::Mats).is_empty());
    }

    #[test]
    fn test_unpaid_line_is_dropped_in_every_mode() {
        let mut line = paid_line("#1001", "playpen-mat-balls-blue");
        line.payment_status = PaymentStatus::Other("refunded".to_string());

        for mode in [
            FilterMode::None,
            FilterMode::Mats,
            FilterMode::Balls,
            FilterMode::Playpens,
            FilterMode::Accessories,
        ] {
            assert!(normalize(&line, mode).is_empty(), "mode {}", mode);
        }
    }

    #[test]
    fn test_normalize_keeps_reference_to_source_line() {
        let line = paid_line("#1002", "playpen-mat-balls-red");
        let normalized = normalize(&line, FilterMode::Accessories);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].canonical_sku, MAT_SKU);
        assert_eq!(normalized[1].canonical_sku, BALLS_SKU);
        assert!(normalized.iter().all(|n| n.order_id() == "#1002"));
    }
}
