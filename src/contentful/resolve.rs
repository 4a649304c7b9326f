//! Link resolution for delivery API responses.
//!
//! Links of the form `{"sys": {"type": "Link", "linkType": "Entry", "id": "..."}}` inside an
//! entry's `fields` are replaced with the matching entity from `items` or `includes`. Within one
//! top-level entry each entity is inlined at most once; later links to it, links that cannot be
//! found, and links below the depth cap are kept as links. The resolved size of an entry is
//! therefore bounded by the size of the page it came from.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::types::{EntryCollection, ResolvedEntry};

/// Maximum nesting of inlined entities below a top-level entry.
pub const MAX_RESOLVE_DEPTH: usize = 10;

type EntityKey = (String, String);

/// Resolve every item of a page against the page's own items and includes.
pub fn resolve_collection(collection: EntryCollection) -> Vec<ResolvedEntry> {
    let EntryCollection { items, includes, .. } = collection;

    let mut lookup: HashMap<EntityKey, &Value> = HashMap::new();
    for entity in items
        .iter()
        .chain(includes.entries.iter())
        .chain(includes.assets.iter())
    {
        if let Some(key) = entity_key(entity) {
            lookup.entry(key).or_insert(entity);
        }
    }

    let mut resolver = Resolver {
        lookup,
        expanded: HashSet::new(),
    };
    items
        .iter()
        .filter_map(|item| ResolvedEntry::from_value(resolver.resolve_item(item)))
        .collect()
}

struct Resolver<'a> {
    lookup: HashMap<EntityKey, &'a Value>,
    /// Entities already inlined into the current top-level entry.
    expanded: HashSet<EntityKey>,
}

impl<'a> Resolver<'a> {
    fn resolve_item(&mut self, item: &Value) -> Value {
        self.expanded.clear();
        if let Some(key) = entity_key(item) {
            self.expanded.insert(key);
        }
        self.resolve_entity(item, 0)
    }

    fn resolve_entity(&mut self, entity: &Value, depth: usize) -> Value {
        let Value::Object(object) = entity else {
            return entity.clone();
        };

        let mut resolved = Map::with_capacity(object.len());
        for (name, value) in object {
            let value = if name == "fields" {
                self.resolve_value(value, depth)
            } else {
                value.clone()
            };
            resolved.insert(name.clone(), value);
        }
        Value::Object(resolved)
    }

    fn resolve_value(&mut self, value: &Value, depth: usize) -> Value {
        match value {
            Value::Object(object) => {
                if let Some(key) = link_key(value) {
                    return match self.inline_target(key, depth) {
                        Some(target) => self.resolve_entity(target, depth + 1),
                        None => value.clone(),
                    };
                }
                Value::Object(
                    object
                        .iter()
                        .map(|(name, nested)| (name.clone(), self.resolve_value(nested, depth)))
                        .collect(),
                )
            }
            Value::Array(values) => Value::Array(
                values
                    .iter()
                    .map(|nested| self.resolve_value(nested, depth))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Claim `key` for inlining at `depth + 1`, or `None` when the link should stay a link.
    fn inline_target(&mut self, key: EntityKey, depth: usize) -> Option<&'a Value> {
        if depth >= MAX_RESOLVE_DEPTH {
            return None;
        }
        let target = *self.lookup.get(&key)?;
        self.expanded.insert(key).then_some(target)
    }
}

/// `(type, id)` of a concrete entry or asset.
fn entity_key(value: &Value) -> Option<EntityKey> {
    let sys = value.get("sys")?;
    let kind = sys.get("type")?.as_str()?;
    if kind != "Entry" && kind != "Asset" {
        return None;
    }
    let id = sys.get("id")?.as_str()?;
    Some((kind.to_string(), id.to_string()))
}

/// `(linkType, id)` of a link pointer to an entry or asset.
fn link_key(value: &Value) -> Option<EntityKey> {
    let sys = value.get("sys")?;
    if sys.get("type")?.as_str()? != "Link" {
        return None;
    }
    let link_type = sys.get("linkType")?.as_str()?;
    if link_type != "Entry" && link_type != "Asset" {
        return None;
    }
    let id = sys.get("id")?.as_str()?;
    Some((link_type.to_string(), id.to_string()))
}
