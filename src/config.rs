//! Typed configuration attached to a topology entry.
//!
//! A [`Config`] is a key-unique collection of [`ConfigEntry`] values. Each
//! entry stores either a string or one of the integral types; retrieval is
//! type-checked, with integral narrowing ruled by the [`cast`](crate::cast)
//! checker.

use crate::cast::{self, Integral, IntegralType};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A value held by a config entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
}

impl ConfigValue {
    /// Display name of the stored type.
    pub fn type_name(&self) -> &'static str {
        match self.integral_type() {
            Some(kind) => kind.name(),
            None => "String",
        }
    }

    /// Token of the stored integral type, `None` for strings.
    pub fn integral_type(&self) -> Option<IntegralType> {
        Some(match self {
            Self::String(_) => return None,
            Self::Bool(_) => IntegralType::Bool,
            Self::U8(_) => IntegralType::U8,
            Self::I8(_) => IntegralType::I8,
            Self::U16(_) => IntegralType::U16,
            Self::I16(_) => IntegralType::I16,
            Self::U32(_) => IntegralType::U32,
            Self::I32(_) => IntegralType::I32,
            Self::U64(_) => IntegralType::U64,
            Self::I64(_) => IntegralType::I64,
        })
    }

    fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Self::String(_) => return None,
            Self::Bool(v) => v as i128,
            Self::U8(v) => v as i128,
            Self::I8(v) => v as i128,
            Self::U16(v) => v as i128,
            Self::I16(v) => v as i128,
            Self::U32(v) => v as i128,
            Self::I32(v) => v as i128,
            Self::U64(v) => v as i128,
            Self::I64(v) => v as i128,
        })
    }
}

/// String form: identity for strings, canonical decimal for integrals,
/// `true`/`false` for bool.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
        }
    }
}

/// Conversion into a stored config value, implemented for the supported
/// closed set of types. Used by the topology builder.
pub trait IntoConfigValue {
    fn into_config_value(self) -> ConfigValue;
}

macro_rules! impl_into_config_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoConfigValue for $ty {
                #[inline]
                fn into_config_value(self) -> ConfigValue {
                    ConfigValue::$variant(self)
                }
            }
        )*
    };
}

impl_into_config_value! {
    String => String,
    bool => Bool,
    u8 => U8, i8 => I8,
    u16 => U16, i16 => I16,
    u32 => U32, i32 => I32,
    u64 => U64, i64 => I64,
}

impl IntoConfigValue for &str {
    #[inline]
    fn into_config_value(self) -> ConfigValue {
        ConfigValue::String(self.to_owned())
    }
}

/// Typed retrieval out of a config entry. Implemented for `String` and the
/// integral types; integral reads narrower than the stored type succeed iff
/// the value is in range.
pub trait FromConfigValue: Sized {
    fn from_entry(entry: &ConfigEntry) -> Result<Self>;
}

impl FromConfigValue for String {
    fn from_entry(entry: &ConfigEntry) -> Result<Self> {
        match entry.value() {
            ConfigValue::String(v) => Ok(v.clone()),
            other => Err(cast_error(entry, other.type_name(), "String")),
        }
    }
}

macro_rules! impl_from_config_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                fn from_entry(entry: &ConfigEntry) -> Result<Self> {
                    integral_from_entry(entry)
                }
            }
        )*
    };
}

impl_from_config_value!(bool, u8, i8, u16, i16, u32, i32, u64, i64);

fn integral_from_entry<T: Integral>(entry: &ConfigEntry) -> Result<T> {
    let stored = entry.value();
    match (stored.integral_type(), stored.as_i128()) {
        (Some(source), Some(value)) if cast::fits(value, source, T::TYPE) => {
            Ok(T::from_i128(value))
        }
        _ => Err(cast_error(entry, stored.type_name(), T::TYPE.name())),
    }
}

fn cast_error(entry: &ConfigEntry, source: &'static str, target: &'static str) -> Error {
    Error::ConfigEntryCastError {
        key: entry.key().to_owned(),
        value: entry.value().to_string(),
        source_type: source,
        target,
    }
}

/// One `key = value` pair of a component configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    key: String,
    value: ConfigValue,
}

impl ConfigEntry {
    /// Create an entry. Keys shall be non-empty; the builder and loader
    /// enforce this before construction.
    pub fn new(key: impl Into<String>, value: impl IntoConfigValue) -> Self {
        Self {
            key: key.into(),
            value: value.into_config_value(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    /// Display name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Retrieve the value as `T`.
    ///
    /// String entries read as `String`, integral entries read as any integral
    /// type that passes the reinterpretation check. Every other combination
    /// fails with [`Error::ConfigEntryCastError`].
    pub fn get<T: FromConfigValue>(&self) -> Result<T> {
        T::from_entry(self)
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Configuration of one component instance: entries with unique keys,
/// iterated in key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    entries: BTreeMap<String, ConfigEntry>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, failing with [`Error::ConfigEntryKeyDuplicated`] if
    /// the key is already present.
    pub fn insert(&mut self, entry: ConfigEntry) -> Result<()> {
        if self.entries.contains_key(entry.key()) {
            return Err(Error::ConfigEntryKeyDuplicated {
                key: entry.key().to_owned(),
            });
        }
        self.entries.insert(entry.key().to_owned(), entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }
}
