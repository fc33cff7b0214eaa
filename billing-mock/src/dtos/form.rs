//! Flattened form bodies used by the legacy admin calls.
//!
//! Nested structures arrive as bracketed keys, e.g.
//! `service[0][tier][0][schedule][0][from]=1`. Scalars are untyped text and
//! numbers may be written as integers or floats (`2`, `2.0`).

use crate::error::MockError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Result<Self, MockError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|e| MockError::decode(e.to_string()))?;
        Ok(Self { pairs })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `key`.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn string(&self, key: &str) -> String {
        self.str(key).unwrap_or_default().to_string()
    }

    pub fn required_str(&self, key: &str) -> Result<&str, MockError> {
        self.str(key)
            .ok_or_else(|| MockError::decode(format!("missing field `{}`", key)))
    }

    pub fn int(&self, key: &str) -> Result<Option<i64>, MockError> {
        self.str(key).map(|raw| coerce_int(key, raw)).transpose()
    }

    pub fn float(&self, key: &str) -> Result<Option<f64>, MockError> {
        self.str(key)
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| invalid_type(key, raw, "a number"))
            })
            .transpose()
    }

    /// Distinct indices `N` used in keys of the form `prefix[N]...`, ascending.
    pub fn indices(&self, prefix: &str) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .pairs
            .iter()
            .filter_map(|(k, _)| split_index(k, prefix).map(|(idx, _)| idx))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// The fields under `prefix[idx]`, re-keyed relative to that element.
    ///
    /// `service[0][tier][1][from]` seen through `nested("service", 0)` becomes
    /// `tier[1][from]`.
    pub fn nested(&self, prefix: &str, idx: usize) -> FormFields {
        let pairs = self
            .pairs
            .iter()
            .filter_map(|(k, v)| {
                let (i, rest) = split_index(k, prefix)?;
                if i != idx {
                    return None;
                }
                let inner = rest.strip_prefix('[')?;
                let close = inner.find(']')?;
                let key = format!("{}{}", &inner[..close], &inner[close + 1..]);
                Some((key, v.clone()))
            })
            .collect();
        FormFields { pairs }
    }

    /// Every element of a scalar list: `prefix[N]=v` keys in index order,
    /// then repeated bare `prefix=v` keys.
    pub fn int_list(&self, prefix: &str) -> Result<Vec<i64>, MockError> {
        let mut indexed: Vec<(usize, &str)> = self
            .pairs
            .iter()
            .filter_map(|(k, v)| match split_index(k, prefix) {
                Some((idx, "")) => Some((idx, v.as_str())),
                _ => None,
            })
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);

        let bare = self
            .pairs
            .iter()
            .filter(|(k, _)| k == prefix)
            .map(|(_, v)| v.as_str());

        indexed
            .into_iter()
            .map(|(_, v)| v)
            .chain(bare)
            .map(|raw| coerce_int(prefix, raw))
            .collect()
    }

    /// Every value of a repeated string list, `prefix[N]` or bare `prefix`.
    pub fn str_list(&self, prefix: &str) -> Vec<String> {
        let mut indexed: Vec<(usize, String)> = self
            .pairs
            .iter()
            .filter_map(|(k, v)| match split_index(k, prefix) {
                Some((idx, "")) => Some((idx, v.clone())),
                _ => None,
            })
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);
        indexed
            .into_iter()
            .map(|(_, v)| v)
            .chain(
                self.pairs
                    .iter()
                    .filter(|(k, _)| k == prefix)
                    .map(|(_, v)| v.clone()),
            )
            .collect()
    }
}

/// Split `prefix[N]rest` into `(N, rest)`.
fn split_index<'k>(key: &'k str, prefix: &str) -> Option<(usize, &'k str)> {
    let after = key.strip_prefix(prefix)?.strip_prefix('[')?;
    let close = after.find(']')?;
    let idx = after[..close].parse().ok()?;
    Some((idx, &after[close + 1..]))
}

fn coerce_int(key: &str, raw: &str) -> Result<i64, MockError> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        _ => Err(invalid_type(key, raw, "an integer")),
    }
}

fn invalid_type(key: &str, raw: &str, expected: &str) -> MockError {
    MockError::decode(format!(
        "invalid value `{}` for `{}`, expected {}",
        raw, key, expected
    ))
}
