//! One ordered pass over the source lines: normalize, project, and for
//! destinations that need it, aggregate and classify shipping services.

use crate::core::classify::{classify, ShippingGroupBuilder};
use crate::core::mapper::{line_advisories, project};
use crate::core::normalize::normalize;
use crate::domain::model::{Conversion, ConversionStats, FieldConstants, FilterMode, OrderLine};
use crate::domain::ports::DestinationShape;
use crate::utils::error::Result;

pub fn convert(
    lines: &[OrderLine],
    mode: FilterMode,
    shape: &dyn DestinationShape,
    constants: &FieldConstants,
) -> Result<Conversion> {
    let mut stats = ConversionStats {
        lines_read: lines.len(),
        ..ConversionStats::default()
    };
    let mut rows = Vec::with_capacity(lines.len());
    let mut advisories = Vec::new();
    let mut groups = shape.classifies_service().then(ShippingGroupBuilder::new);

    for line in lines {
        if !line.payment_status.is_paid() {
            stats.lines_unpaid += 1;
            continue;
        }

        // accessories mode checks every paid line before picking its accessory rows
        if mode == FilterMode::Accessories {
            advisories.extend(line_advisories(line));
        }

        let normalized = normalize(line, mode);
        if normalized.is_empty() {
            tracing::debug!("Order {}: SKU '{}' dropped by {} filter", line.order_id, line.sku, mode);
            stats.lines_filtered += 1;
            continue;
        }

        if mode != FilterMode::Accessories {
            advisories.extend(line_advisories(line));
        }

        for item in &normalized {
            rows.push(project(item, shape, constants));
            if let Some(builder) = groups.as_mut() {
                builder.add(item);
            }
        }
    }
    stats.rows_emitted = rows.len();

    let services = match groups {
        Some(builder) => {
            let (groups, quantity_advisories) = builder.build();
            advisories.extend(quantity_advisories);
            Some(classify(&groups, &mut advisories)?)
        }
        None => None,
    };

    Ok(Conversion {
        shape: shape.name().to_string(),
        columns: shape.columns(),
        rows,
        services,
        advisories,
        stats,
    })
}
