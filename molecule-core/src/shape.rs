//! Construction-time validation of struct, table and union member sets

use std::collections::HashSet;

use crate::codec::AnyCodec;
use crate::error::ShapeError;

/// Order declared members by `keys`
///
/// `keys` must be an exact permutation of the declared member names: no
/// duplicates, no unknown names, nothing left out.
pub(crate) fn order_members<I, K, C, S>(
    members: I,
    keys: &[S],
) -> Result<Vec<(String, AnyCodec)>, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
    S: AsRef<str>,
{
    let mut declared: Vec<(String, AnyCodec)> = Vec::new();
    for (name, codec) in members {
        let name = name.into();
        if declared.iter().any(|(existing, _)| *existing == name) {
            return Err(ShapeError::DuplicateKey(name));
        }
        declared.push((name, codec.into()));
    }

    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        if !seen.insert(key) {
            return Err(ShapeError::DuplicateKey(key.to_string()));
        }
        match declared.iter().find(|(name, _)| name == key) {
            Some((name, codec)) => ordered.push((name.clone(), codec.clone())),
            None => return Err(ShapeError::UnknownKey(key.to_string())),
        }
    }

    let missing: Vec<String> = declared
        .iter()
        .filter(|(name, _)| !seen.contains(name.as_str()))
        .map(|(name, _)| name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ShapeError::MissingKeys(missing));
    }

    Ok(ordered)
}
