use serde_yaml::Value;

/// Collect every value associated with `key` anywhere in `root`, in document
/// order. Mappings preserve insertion order in serde_yaml, so "document
/// order" is the order the calendar was composed in. A miss returns an empty
/// vector; a key present with a null value contributes `Value::Null`.
pub fn find_all(root: &Value, key: &str) -> Vec<Value> {
    let mut found = Vec::new();
    collect(root, key, &mut found);
    found
}

/// First match only. This is the legacy single-rotation query contract and
/// is deliberately kept distinct from `find_all`.
pub fn find_first(root: &Value, key: &str) -> Option<Value> {
    find_all(root, key).into_iter().next()
}

fn collect(node: &Value, key: &str, found: &mut Vec<Value>) {
    match node {
        Value::Mapping(map) => {
            for (k, v) in map {
                if k.as_str() == Some(key) {
                    found.push(v.clone());
                }
                collect(v, key, found);
            }
        }
        Value::Sequence(seq) => {
            for item in seq {
                collect(item, key, found);
            }
        }
        _ => {}
    }
}
