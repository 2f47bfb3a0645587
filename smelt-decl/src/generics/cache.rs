//! Process-wide cache of synthesized generic-parameter backing types.
//!
//! Keyed by structural equality of the descriptor, not object identity, so
//! independently-constructed equal descriptors collapse to one compiled type.
//! Insert-if-absent semantics keep concurrent graph builds from racing: when
//! two threads synthesize the same key, the first insertion wins and both
//! observe the same type.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use smelt_expr::TypeInfo;
use tracing::debug;

use crate::error::Result;
use crate::generics::param::GenericParamData;

/// Structural identity of a generic-parameter descriptor: name, constraint
/// flags, and the type constraints as an order-insensitive multiset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GenericParamKey {
    name: String,
    struct_constraint: bool,
    class_constraint: bool,
    newable: bool,
    constraints: Vec<String>,
}

impl GenericParamKey {
    pub(crate) fn of(data: &GenericParamData) -> Self {
        let mut constraints: Vec<String> =
            data.constraints.iter().map(|c| c.label()).collect();
        constraints.sort();
        Self {
            name: data.name.clone(),
            struct_constraint: data.struct_constraint,
            class_constraint: data.class_constraint,
            newable: data.newable,
            constraints,
        }
    }
}

static SYNTHESIZED: Lazy<DashMap<GenericParamKey, Arc<TypeInfo>>> = Lazy::new(DashMap::new);

/// Look up `key`, synthesizing with `build` on a miss.
pub(crate) fn get_or_synthesize(
    key: GenericParamKey,
    build: impl FnOnce() -> Result<Arc<TypeInfo>>,
) -> Result<Arc<TypeInfo>> {
    if let Some(hit) = SYNTHESIZED.get(&key) {
        debug!(parameter = %key.name, "generic parameter cache hit");
        return Ok(hit.clone());
    }
    debug!(parameter = %key.name, "generic parameter cache miss; synthesizing");
    let built = build()?;
    let entry = SYNTHESIZED.entry(key).or_insert(built);
    Ok(entry.clone())
}
