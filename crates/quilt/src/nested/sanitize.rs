use quilt_core::{
    schema::{NestedAttributes, Relation, RelationKind},
    stmt::{Record, Value},
    Error, Result,
};

/// Normalizes a nested attributes payload into an ordered list of child
/// mappings.
///
/// A has-one relation accepts a single record; a has-many relation accepts a
/// list of records or a record of records, whose keys are discarded in favour
/// of insertion order. `Null` yields no mappings for either. Any other shape
/// fails with an invalid payload error, as does a has-many payload holding
/// more mappings than the relation's `limit`.
pub fn sanitize(
    relation: &Relation,
    config: &NestedAttributes,
    payload: &Value,
) -> Result<Vec<Record>> {
    let mappings = match relation.kind {
        RelationKind::HasOne => match payload {
            Value::Null => vec![],
            Value::Record(record) => vec![record.clone()],
            other => return Err(shape_mismatch(relation, "a record", other)),
        },
        RelationKind::HasMany => match payload {
            Value::Null => vec![],
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Record(record) => Ok(record.clone()),
                    other => Err(shape_mismatch(relation, "a list of records", other)),
                })
                .collect::<Result<_>>()?,
            Value::Record(keyed) => {
                if let Some((key, _)) = keyed.iter().find(|(_, value)| !value.is_record()) {
                    return Err(Error::invalid_payload(format!(
                        "expected a list of records for has-many `{}`, got a single record \
                         (`{key}` is not a record)",
                        relation.name
                    )));
                }
                keyed.values().filter_map(Value::as_record).cloned().collect()
            }
            other => return Err(shape_mismatch(relation, "a list of records", other)),
        },
    };

    if let Some(limit) = config.limit {
        if mappings.len() > limit {
            return Err(Error::too_many_records(format!(
                "`{}` accepts at most {} records, got {}",
                relation.name,
                limit,
                mappings.len()
            )));
        }
    }

    Ok(mappings)
}

fn shape_mismatch(relation: &Relation, expected: &str, got: &Value) -> Error {
    Error::invalid_payload(format!(
        "expected {expected} for {} `{}`, got a {}",
        relation.kind,
        relation.name,
        got.kind_name()
    ))
}
