use std::{collections::BTreeMap, path::Path};

use crate::error::ConfigError;

/// A read-only store of calibration values addressed by `SECTION.key`.
///
/// Keys are case-sensitive: `STEREO.BaseLine` and `STEREO.Baseline` are distinct.
pub trait CalibrationSource {
    /// Look up a numeric value.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// The key exists but its value is not a number.
    fn lookup(&self, key: &str) -> Result<Option<f64>, ConfigError>;

    /// Look up the first present key of `keys`, in order.
    fn lookup_first(&self, keys: &[&str]) -> Result<Option<f64>, ConfigError> {
        for key in keys {
            if let Some(value) = self.lookup(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// An in-memory calibration store.
///
/// It can be filled programmatically with [`KeyValueCalibration::insert`] or parsed from the
/// INI-style text of a factory calibration file:
///
/// ```text
/// [STEREO]
/// Baseline = 120.0
/// RX_HD = 0.0011
///
/// [LEFT_CAM_HD]
/// fx = 700.0
/// ```
///
/// # Examples
///
/// ```
/// use zed_stereo::{CalibrationSource, KeyValueCalibration};
///
/// let calibration = KeyValueCalibration::from_ini_str("[STEREO]\nBaseLine=120\n").unwrap();
/// assert_eq!(calibration.lookup("STEREO.BaseLine").unwrap(), Some(120.0));
/// assert_eq!(calibration.lookup("STEREO.Baseline").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueCalibration {
    values: BTreeMap<String, String>,
}

impl KeyValueCalibration {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// The number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no key is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses INI-style calibration text.
    ///
    /// `[SECTION]` headers prefix the following keys with `SECTION.`; `#` and `;` start comment
    /// lines; blank lines are ignored. Keys before the first section are stored as is.
    ///
    /// # Errors
    ///
    /// A line is neither a section header, a comment nor a `key = value` pair.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        let mut section: Option<&str> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let malformed = || ConfigError::MalformedLine {
                line: idx + 1,
                content: raw.to_string(),
            };

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(malformed)?.trim();
                if name.is_empty() {
                    return Err(malformed());
                }
                section = Some(name);
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(malformed)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed());
            }

            let full_key = match section {
                Some(section) => format!("{section}.{key}"),
                None => key.to_string(),
            };
            store.insert(full_key, value.trim());
        }

        Ok(store)
    }

    /// Reads and parses an INI-style calibration file.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_ini_str(&text)?;
        log::info!(
            "loaded {} calibration values from {}",
            store.len(),
            path.display()
        );

        Ok(store)
    }
}

impl CalibrationSource for KeyValueCalibration {
    fn lookup(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        let Some(raw) = self.values.get(key) else {
            return Ok(None);
        };

        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
            })
    }
}
