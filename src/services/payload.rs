use serde_json::{Map, Value};

use crate::models::domain::{Field, FieldKind, GridColumn};

/// Rewrites a stored submission payload so every grid answer uses one shape:
/// an object keyed by row label whose values are column labels.
///
/// Older clients wrote grid answers three different ways. In priority order
/// per row: a nested object keyed by row label, a flattened `field.row` key,
/// or a legacy `field[rowIndex]` key. This function is the only place that
/// understands all three; everything downstream sees the nested shape.
///
/// Column values given as a numeric index are resolved to the declared
/// column's label. Any other non-empty scalar is kept as a literal label so
/// unexpected answers still show up in aggregation instead of vanishing.
pub fn canonicalize(fields: &[Field], mut payload: Map<String, Value>) -> Map<String, Value> {
    for field in fields.iter().filter(|f| f.kind == FieldKind::RadioGrid) {
        let rows = field.rows.as_deref().unwrap_or(&[]);
        let columns = field.columns.as_deref().unwrap_or(&[]);

        let mut selections = Map::new();
        for (index, row) in rows.iter().enumerate() {
            let raw = nested_value(&payload, &field.name, row)
                .or_else(|| payload.get(&format!("{}.{}", field.name, row)))
                .or_else(|| payload.get(&format!("{}[{}]", field.name, index)))
                .filter(|value| !value.is_null());

            if let Some(label) = raw.and_then(|value| column_label(columns, value)) {
                selections.insert(row.clone(), Value::String(label));
            }
        }

        for (index, row) in rows.iter().enumerate() {
            payload.remove(&format!("{}.{}", field.name, row));
            payload.remove(&format!("{}[{}]", field.name, index));
        }
        if selections.is_empty() {
            payload.remove(&field.name);
        } else {
            payload.insert(field.name.clone(), Value::Object(selections));
        }
    }
    payload
}

fn nested_value<'a>(payload: &'a Map<String, Value>, field: &str, row: &str) -> Option<&'a Value> {
    payload
        .get(field)
        .and_then(Value::as_object)
        .and_then(|rows| rows.get(row))
        .filter(|value| !value.is_null())
}

fn column_label(columns: &[GridColumn], value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            let resolved = n
                .as_u64()
                .and_then(|i| columns.get(i as usize))
                .map(|c| c.label.clone());
            Some(resolved.unwrap_or_else(|| n.to_string()))
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
