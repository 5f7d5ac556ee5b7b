//! Parameter Storage Types
//!
//! Provides the typed key-value `ParameterStore` that missions read their
//! flags and tunables from. Keys are `<MISSION>_<NAME>` (e.g. `PLAN20_RUN`),
//! which gives one namespace per mission. Persistence to disk is handled by
//! the SITL crate.

use core::fmt::{self, Write};

use heapless::{FnvIndexMap, String};

use super::error::ParameterError;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 24;

/// Maximum number of parameters (power of two, required by the index map)
pub const MAX_PARAMS: usize = 64;

/// Maximum string parameter length
pub const MAX_STRING_LEN: usize = 63;

/// Parameter name
pub type ParamName = String<PARAM_NAME_LEN>;

/// Parameter value types
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String parameter (max 63 chars)
    String(String<MAX_STRING_LEN>),
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Infer a typed value from configuration text.
    ///
    /// `true`/`false` become `Bool`, integers `Int`, decimals `Float`;
    /// anything else is kept as a `String`.
    pub fn parse(text: &str) -> Result<Self, ParameterError> {
        let text = text.trim();
        match text {
            "true" => return Ok(ParamValue::Bool(true)),
            "false" => return Ok(ParamValue::Bool(false)),
            _ => {}
        }
        if let Ok(v) = text.parse::<i32>() {
            return Ok(ParamValue::Int(v));
        }
        if let Ok(v) = text.parse::<f32>() {
            return Ok(ParamValue::Float(v));
        }
        String::try_from(text)
            .map(ParamValue::String)
            .map_err(|_| ParameterError::ValueTooLong)
    }

    /// Parse text as the same type as `self`.
    pub fn parse_like(&self, text: &str) -> Result<Self, ParameterError> {
        let text = text.trim();
        match self {
            ParamValue::Bool(_) => match text {
                "true" | "1" => Ok(ParamValue::Bool(true)),
                "false" | "0" => Ok(ParamValue::Bool(false)),
                _ => Err(ParameterError::InvalidValue),
            },
            ParamValue::Int(_) => text
                .parse::<i32>()
                .map(ParamValue::Int)
                .map_err(|_| ParameterError::InvalidValue),
            ParamValue::Float(_) => text
                .parse::<f32>()
                .map(ParamValue::Float)
                .map_err(|_| ParameterError::InvalidValue),
            ParamValue::String(_) => String::try_from(text)
                .map(ParamValue::String)
                .map_err(|_| ParameterError::ValueTooLong),
        }
    }

    /// Value as bool (`Int` 0 is false, anything else true)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            ParamValue::Int(v) => Some(*v != 0),
            ParamValue::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            ParamValue::Float(_) => None,
        }
    }

    /// Value as f32 (integers widen)
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Value as u32 (negative integers rejected)
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ParamValue::Int(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            // Debug keeps the decimal point so `1.0` reads back as a float
            ParamValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Parameter store for configuration management
///
/// Stores parameters as key-value pairs. Registration is idempotent, which
/// is how first-run defaults are seeded without clobbering stored values.
#[derive(Debug)]
pub struct ParameterStore {
    /// Parameter values, in registration order
    parameters: FnvIndexMap<ParamName, ParamValue, MAX_PARAMS>,
    /// Dirty flag (needs write-back)
    dirty: bool,
}

fn key(name: &str) -> Result<ParamName, ParameterError> {
    String::try_from(name).map_err(|_| ParameterError::NameTooLong)
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = key(name).ok()?;
        self.parameters.get(&key)
    }

    /// Check whether a parameter exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set parameter value
    ///
    /// Marks the store as dirty (needs write-back).
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = key(name)?;
        if !self.parameters.contains_key(&key) {
            return Err(ParameterError::UnknownParameter);
        }
        self.parameters
            .insert(key, value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Register a new parameter with a default value
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(&mut self, name: &str, default_value: ParamValue) -> Result<(), ParameterError> {
        let key = key(name)?;
        if self.parameters.contains_key(&key) {
            // Already exists, don't overwrite
            return Ok(());
        }
        self.parameters
            .insert(key, default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a parameter rendered as text
    pub fn get_str(&self, name: &str) -> Option<String<MAX_STRING_LEN>> {
        let value = self.get(name)?;
        let mut text = String::new();
        write!(text, "{}", value).ok()?;
        Some(text)
    }

    /// Set a parameter from text
    ///
    /// Existing parameters keep their type; unknown ones are created with
    /// an inferred type.
    pub fn set_str(&mut self, name: &str, text: &str) -> Result<(), ParameterError> {
        match self.get(name) {
            Some(current) => {
                let value = current.parse_like(text)?;
                self.set(name, value)
            }
            None => {
                let value = ParamValue::parse(text)?;
                self.insert_raw(key(name)?, value)?;
                self.dirty = true;
                Ok(())
            }
        }
    }

    /// Read a bool parameter, falling back to `default`
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(ParamValue::as_bool).unwrap_or(default)
    }

    /// Read an f32 parameter, falling back to `default`
    pub fn get_f32(&self, name: &str, default: f32) -> f32 {
        self.get(name)
            .and_then(ParamValue::as_f32)
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Read a u32 parameter, falling back to `default`
    pub fn get_u32(&self, name: &str, default: u32) -> u32 {
        self.get(name).and_then(ParamValue::as_u32).unwrap_or(default)
    }

    /// Check if store has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear dirty flag (called after a successful write-back)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Get total parameter count
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate over all parameters as (name, value) pairs
    pub fn iter_all(&self) -> impl Iterator<Item = (&ParamName, &ParamValue)> {
        self.parameters.iter()
    }

    /// Insert a parameter without the existence check
    ///
    /// Used when loading from disk. Does not mark the store dirty.
    pub fn insert_raw(&mut self, name: ParamName, value: ParamValue) -> Result<(), ParameterError> {
        self.parameters
            .insert(name, value)
            .map(|_| ())
            .map_err(|_| ParameterError::StoreFull)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
