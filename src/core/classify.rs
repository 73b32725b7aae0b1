//! Order aggregation and shipping-service classification.

use crate::domain::model::{Advisory, NormalizedLine, ServiceAssignment, ServiceTier};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

const HEAVY_SKUS: [&str; 6] = [
    "playpen-blue",
    "playpen-red",
    "playpen-mat-balls-blue",
    "playpen-mat-balls-red",
    "playpen-mat-blue",
    "playpen-mat-red",
];

/// Canonical SKUs per order, in first-seen order. Frozen once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderShippingGroups {
    orders: Vec<(String, Vec<String>)>,
}

impl OrderShippingGroups {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn items(&self, order_id: &str) -> Option<&[String]> {
        self.orders
            .iter()
            .find(|(id, _)| id == order_id)
            .map(|(_, items)| items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.orders
            .iter()
            .map(|(id, items)| (id.as_str(), items.as_slice()))
    }
}

#[derive(Debug, Default)]
pub struct ShippingGroupBuilder {
    index: HashMap<String, usize>,
    orders: Vec<(String, Vec<String>)>,
    advisories: Vec<Advisory>,
}

impl ShippingGroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: &NormalizedLine<'_>) {
        let order_id = line.order_id();
        if line.line.quantity > 1 {
            self.advisories.push(Advisory::QuantityAboveOne {
                order_id: order_id.to_string(),
                quantity: line.line.quantity,
            });
        }

        match self.index.get(order_id) {
            Some(&slot) => self.orders[slot].1.push(line.canonical_sku.clone()),
            None => {
                self.index.insert(order_id.to_string(), self.orders.len());
                self.orders
                    .push((order_id.to_string(), vec![line.canonical_sku.clone()]));
            }
        }
    }

    /// Freezes the groups and hands back the quantity advisories raised while adding.
    pub fn build(self) -> (OrderShippingGroups, Vec<Advisory>) {
        (
            OrderShippingGroups {
                orders: self.orders,
            },
            self.advisories,
        )
    }
}

/// Picks the tier for one order. Three or more items also return a review advisory.
pub fn classify_items(order_id: &str, items: &[String]) -> Result<(ServiceTier, Option<Advisory>)> {
    match items {
        [] => Err(EtlError::UnexpectedItemCombination {
            order_id: order_id.to_string(),
            items: Vec::new(),
        }),
        [item] => {
            let tier = if item.contains("elite-play-mat") {
                ServiceTier::SurepostUnder1lb
            } else if item.contains("playpen") {
                ServiceTier::SurepostOver1lb
            } else {
                ServiceTier::UpsGround
            };
            Ok((tier, None))
        }
        [_, _] => {
            let has = |sku: &str| items.iter().any(|item| item == sku);
            if HEAVY_SKUS.iter().any(|&sku| has(sku)) {
                Ok((ServiceTier::SurepostOver1lb, None))
            } else if (has("elite-play-mat-v2") || has("elite-play-mat")) && has("pitballs-100") {
                Ok((ServiceTier::UpsGround, None))
            } else {
                Err(EtlError::UnexpectedItemCombination {
                    order_id: order_id.to_string(),
                    items: items.to_vec(),
                })
            }
        }
        _ => Ok((
            ServiceTier::UpsGround,
            Some(Advisory::ManualServiceReview {
                order_id: order_id.to_string(),
                items: items.to_vec(),
            }),
        )),
    }
}

/// Classifies every order. The first unclassifiable order aborts the whole run.
pub fn classify(
    groups: &OrderShippingGroups,
    advisories: &mut Vec<Advisory>,
) -> Result<Vec<ServiceAssignment>> {
    let mut assignments = Vec::with_capacity(groups.len());

    for (order_id, items) in groups.iter() {
        let (tier, advisory) = classify_items(order_id, items)?;
        tracing::debug!("Order {} -> {} ({:?})", order_id, tier.name(), items);
        advisories.extend(advisory);
        assignments.push(ServiceAssignment {
            order_id: order_id.to_string(),
            tier,
            code: tier.code().to_string(),
        });
    }

    Ok(assignments)
}
