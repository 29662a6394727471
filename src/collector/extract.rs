use super::error::CollectError;
use super::types::{SPLITS_FIELD, Share};
use crate::document::types::{Document, Value};
use crate::membership::types::MemberIndex;

/// Pulls the share out of the first batch a peer returned.
///
/// `Ok(None)` means the peer has no split for this record (no match, or the
/// field is absent); that is logged and is not an error. Anything else that
/// does not look like `{splits: [<binary>]}` is an invariant violation.
pub fn extract_share(
    batch: Vec<Document>,
    member: MemberIndex,
) -> Result<Option<Share>, CollectError> {
    if batch.len() > 1 {
        tracing::error!(
            "Point lookup on member {} returned {} records",
            member,
            batch.len()
        );
        return Err(CollectError::MultipleRecords {
            member,
            count: batch.len(),
        });
    }

    let Some(record) = batch.into_iter().next() else {
        tracing::warn!("Member {} has no record for this id", member);
        return Ok(None);
    };

    let Some(value) = record.get(SPLITS_FIELD) else {
        tracing::warn!(
            "Split field not found on member {}: {:?}",
            member,
            record
        );
        return Ok(None);
    };

    let items = value.as_array().ok_or_else(|| CollectError::NotAnArray {
        member,
        field: SPLITS_FIELD.to_string(),
        found: value.type_name(),
    })?;

    let first_type = items.first().map(|v| v.type_name()).unwrap_or("missing");
    tracing::debug!(
        "Member {} returned {} element(s), [0] is {}",
        member,
        items.len(),
        first_type
    );

    let first = items.first().ok_or_else(|| CollectError::EmptySplits {
        member,
        field: SPLITS_FIELD.to_string(),
    })?;

    match first {
        Value::Binary(data) => Ok(Some(Share {
            data: data.clone(),
            origin: member,
        })),
        other => {
            tracing::error!(
                "Member {} returned a {} split instead of binary",
                member,
                other.type_name()
            );
            Err(CollectError::NotBinary {
                member,
                found: other.type_name(),
            })
        }
    }
}
