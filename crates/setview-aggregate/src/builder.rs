//! Result model builder — pure transform from raw service records to an
//! [`AggregationResult`].

use std::collections::HashMap;

use serde_json::{Map, Value};
use setview_core::{
    display_type, AggregationResult, Error, ItemType, MemberObject, ResolvedSet, Result, Row,
    SetItemRef, SetStats, SetSummary,
};
use tracing::{debug, warn};

/// Member references with their type strings, in resolver order.
///
/// Every item must carry an info tuple with a type string.
pub fn member_refs(resolved: &ResolvedSet) -> Result<Vec<SetItemRef>> {
    resolved
        .data
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let info = item.info.as_ref().ok_or_else(|| {
                Error::MalformedResponse(format!("set item {} ({}) has no info", i, item.reference))
            })?;
            Ok(SetItemRef {
                reference: item.reference.clone(),
                type_string: info.type_string()?.to_string(),
            })
        })
        .collect()
}

/// Derive the set's item type from the full member type strings.
///
/// Any difference, including version, yields [`ItemType::Mixed`]. A uniform
/// type string that does not parse is shown raw.
pub fn infer_item_type(items: &[SetItemRef]) -> ItemType {
    let Some(first) = items.first() else {
        return ItemType::Empty;
    };
    if items[1..].iter().any(|i| i.type_string != first.type_string) {
        return ItemType::Mixed;
    }
    match display_type(&first.type_string) {
        Ok(name) => ItemType::Uniform(name),
        Err(e) => {
            warn!(type_string = %first.type_string, "Unparseable set item type: {}", e);
            ItemType::Uniform(first.type_string.clone())
        }
    }
}

/// Put fetched members into request order.
///
/// Members are matched by their `wsid/objid/version` info positions. When the
/// requested refs are not all in that form the returned order is trusted.
pub fn align_to_request_order(
    requested: &[SetItemRef],
    members: Vec<MemberObject>,
) -> Result<Vec<MemberObject>> {
    if members.len() != requested.len() {
        return Err(Error::Fetch(format!(
            "requested {} objects, received {}",
            requested.len(),
            members.len()
        )));
    }

    let mut by_ref: HashMap<String, usize> = HashMap::with_capacity(members.len());
    let mut identifiable = true;
    for (i, member) in members.iter().enumerate() {
        let Some(r) = member.info.canonical_ref() else {
            identifiable = false;
            break;
        };
        if by_ref.insert(r, i).is_some() {
            identifiable = false;
            break;
        }
    }
    if !identifiable {
        return Ok(members);
    }
    let positions: Option<Vec<usize>> = requested
        .iter()
        .map(|item| by_ref.get(&item.reference).copied())
        .collect();
    let Some(positions) = positions else {
        return Ok(members);
    };
    if positions.iter().enumerate().all(|(want, &got)| want == got) {
        return Ok(members);
    }

    debug!("Reordering {} fetched members to request order", members.len());
    let mut slots: Vec<Option<MemberObject>> = members.into_iter().map(Some).collect();
    positions
        .into_iter()
        .map(|p| {
            slots[p]
                .take()
                .ok_or_else(|| Error::Fetch("duplicate member in fetch response".into()))
        })
        .collect()
}

/// Non-negative integral numeric field, or `None` when absent or unusable.
fn count_field(data: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = data.get(key)?;
    let count = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    });
    if count.is_none() {
        debug!("Ignoring non-count {} value {}", key, value);
    }
    count
}

/// Sum read counts and base pairs in one pass over the members.
///
/// A member with `read_count` but no `read_size` adds its reads and no base pairs.
pub fn accumulate<'a>(rows: impl IntoIterator<Item = &'a Row>) -> SetStats {
    let mut stats = SetStats::default();
    for row in rows {
        if let Some(reads) = row.read_count {
            stats.read_count = stats.read_count.saturating_add(reads);
            if let Some(size) = row.read_size {
                stats.base_pair_count = stats
                    .base_pair_count
                    .saturating_add(reads.saturating_mul(size));
            }
        }
    }
    stats
}

fn build_row(item: &SetItemRef, member: MemberObject) -> Result<Row> {
    let raw_type = member.info.type_string()?;
    let type_name = match display_type(raw_type) {
        Ok(name) => Some(name),
        Err(e) => {
            warn!(reference = %item.reference, "Member type not shown: {}", e);
            None
        }
    };
    Ok(Row {
        reference: item.reference.clone(),
        name: member.info.name()?.to_string(),
        type_name,
        read_count: count_field(&member.data, "read_count"),
        read_size: count_field(&member.data, "read_size"),
        insert_size_mean: member.data.get("insert_size_mean").and_then(Value::as_f64),
        data: member.data,
    })
}

/// Assemble the aggregate from a resolution response and the fetched members.
pub fn build_result(resolved: &ResolvedSet, members: Vec<MemberObject>) -> Result<AggregationResult> {
    let items = member_refs(resolved)?;
    let item_type = infer_item_type(&items);
    let members = align_to_request_order(&items, members)?;

    let rows = items
        .iter()
        .zip(members)
        .map(|(item, member)| build_row(item, member))
        .collect::<Result<Vec<_>>>()?;
    let stats = accumulate(&rows);

    Ok(AggregationResult {
        set: SetSummary {
            name: resolved.info.name()?.to_string(),
            description: resolved.data.description.clone(),
            item_type,
            item_count: items.len(),
            stats,
            items: resolved.data.items.clone(),
        },
        rows,
    })
}
