//! Merge rules for folding variant values into a configurable parent.

use feedgen_core::{FieldValue, Scalar};

/// Merges the parent's own value with the values read from its variants.
///
/// The parent value is treated as a sequence (a single value, including
/// null, becomes a one-element sequence) and the already-flattened variant
/// values are appended in variant order. The result keeps the first
/// occurrence of each value, drops falsy values except numeric zero, and
/// collapses to a scalar when exactly one value is left.
#[must_use]
pub fn merge_values(base: FieldValue, associate_values: Vec<Scalar>) -> FieldValue {
    let mut merged = base.into_list();
    merged.extend(associate_values.into_iter().map(FieldValue::Scalar));

    let mut unique: Vec<FieldValue> = Vec::with_capacity(merged.len());
    for value in merged {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }

    unique.retain(|value| value.is_truthy() || value.is_numeric_zero());

    if unique.len() == 1 {
        unique.pop().unwrap_or_default()
    } else {
        FieldValue::List(unique)
    }
}

/// Availability of a configurable parent given its variants' availability.
///
/// An out-of-stock parent stays out of stock. Otherwise the parent is out of
/// stock only when it has variants and every one of them is out of stock.
#[must_use]
pub fn merge_availability(
    base: FieldValue,
    associate_values: &[Scalar],
    out_of_stock_label: &str,
) -> FieldValue {
    if base.as_str() == Some(out_of_stock_label) {
        return base;
    }

    let all_out_of_stock = !associate_values.is_empty()
        && associate_values
            .iter()
            .all(|value| value.as_str() == Some(out_of_stock_label));

    if all_out_of_stock {
        FieldValue::from(out_of_stock_label)
    } else {
        base
    }
}
