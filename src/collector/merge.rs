use super::error::CollectError;
use super::types::{SPLITS_FIELD, Share};
use crate::document::types::{Document, Value};
use crate::membership::types::MemberIndex;

/// Reads the caller's own share: the single binary element of its splits array.
pub fn local_share(document: &Document, self_index: MemberIndex) -> Result<Share, CollectError> {
    let value = document
        .get(SPLITS_FIELD)
        .ok_or_else(|| CollectError::MissingLocalSplits(SPLITS_FIELD.to_string()))?;

    let items = value.as_array().ok_or_else(|| CollectError::NotAnArray {
        member: self_index,
        field: SPLITS_FIELD.to_string(),
        found: value.type_name(),
    })?;

    match items {
        [Value::Binary(data)] => Ok(Share {
            data: data.clone(),
            origin: self_index,
        }),
        [other] => Err(CollectError::NotBinary {
            member: self_index,
            found: other.type_name(),
        }),
        _ => Err(CollectError::UnexpectedLocalSplits(items.len())),
    }
}

/// Builds the merged document.
///
/// The splits field becomes `[[share, originIndex], ...]`: `collected` in the
/// order given, then the caller's own share. All other fields are carried over
/// unchanged. The input must still hold only the caller's own split; merging an
/// already merged document is rejected.
pub fn merge_splits(
    document: &Document,
    collected: Vec<Share>,
    self_index: MemberIndex,
) -> Result<Document, CollectError> {
    let own = local_share(document, self_index)?;

    let mut shares = collected;
    shares.push(own);

    for share in &shares {
        tracing::debug!(
            "Merging split from member {} ({} bytes)",
            share.origin,
            share.data.len()
        );
    }

    let rebuilt = shares
        .into_iter()
        .map(|share| {
            Value::Array(vec![
                Value::Binary(share.data),
                Value::Int(share.origin as i64),
            ])
        })
        .collect();

    document
        .with_field_replaced(SPLITS_FIELD, Value::Array(rebuilt))
        .ok_or_else(|| CollectError::MissingLocalSplits(SPLITS_FIELD.to_string()))
}

/// Reads a merged splits field back as shares, in stored order.
///
/// Returns `None` if the field is not in merged `[[binary, int], ...]` form.
pub fn merged_shares(document: &Document) -> Option<Vec<Share>> {
    document
        .get(SPLITS_FIELD)?
        .as_array()?
        .iter()
        .map(|pair| {
            let [data, origin] = pair.as_array()? else {
                return None;
            };
            let origin = origin.as_int().filter(|origin| *origin >= 0)?;
            Some(Share {
                data: data.as_binary()?.to_vec(),
                origin: origin as MemberIndex,
            })
        })
        .collect()
}
