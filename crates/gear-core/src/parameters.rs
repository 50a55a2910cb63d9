//! Generic named parameters.
//!
//! [`GearParameters`] is the open-ended key/value record used for user-defined
//! detectors. The TPC and calorimeter records embed one as well, so every
//! detector can carry free-form extras next to its fixed schema.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Typed key/value parameter set.
///
/// Each value kind lives in its own map, so the same key may be used for an
/// `int` and a `double` at the same time. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GearParameters {
    int_vals: BTreeMap<String, i32>,
    double_vals: BTreeMap<String, f64>,
    string_vals: BTreeMap<String, String>,
    int_vec_vals: BTreeMap<String, Vec<i32>>,
    double_vec_vals: BTreeMap<String, Vec<f64>>,
    string_vec_vals: BTreeMap<String, Vec<String>>,
}

fn lookup<'a, T>(map: &'a BTreeMap<String, T>, key: &str) -> Result<&'a T> {
    map.get(key).ok_or_else(|| Error::UnknownParameter(key.to_string()))
}

fn entries<T>(map: &BTreeMap<String, Vec<T>>) -> impl Iterator<Item = (&str, &[T])> {
    map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
}

impl GearParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no value of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.int_vals.is_empty()
            && self.double_vals.is_empty()
            && self.string_vals.is_empty()
            && self.int_vec_vals.is_empty()
            && self.double_vec_vals.is_empty()
            && self.string_vec_vals.is_empty()
    }

    pub fn set_int_val(&mut self, key: impl Into<String>, val: i32) {
        self.int_vals.insert(key.into(), val);
    }

    pub fn int_val(&self, key: &str) -> Result<i32> {
        lookup(&self.int_vals, key).copied()
    }

    pub fn set_double_val(&mut self, key: impl Into<String>, val: f64) {
        self.double_vals.insert(key.into(), val);
    }

    pub fn double_val(&self, key: &str) -> Result<f64> {
        lookup(&self.double_vals, key).copied()
    }

    pub fn set_string_val(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.string_vals.insert(key.into(), val.into());
    }

    pub fn string_val(&self, key: &str) -> Result<&str> {
        lookup(&self.string_vals, key).map(String::as_str)
    }

    pub fn set_int_vals(&mut self, key: impl Into<String>, vals: Vec<i32>) {
        self.int_vec_vals.insert(key.into(), vals);
    }

    pub fn int_vals(&self, key: &str) -> Result<&[i32]> {
        lookup(&self.int_vec_vals, key).map(Vec::as_slice)
    }

    pub fn set_double_vals(&mut self, key: impl Into<String>, vals: Vec<f64>) {
        self.double_vec_vals.insert(key.into(), vals);
    }

    pub fn double_vals(&self, key: &str) -> Result<&[f64]> {
        lookup(&self.double_vec_vals, key).map(Vec::as_slice)
    }

    /// Set a string vector.
    ///
    /// Entries must be non-empty and free of whitespace: string vectors are
    /// stored whitespace-separated, so anything else could not be read back.
    pub fn set_string_vals(&mut self, key: impl Into<String>, vals: Vec<String>) -> Result<()> {
        let key = key.into();
        if let Some(bad) = vals.iter().find(|v| v.is_empty() || v.chars().any(char::is_whitespace)) {
            return Err(Error::Validation(format!(
                "string vector '{key}' entry {bad:?} is empty or contains whitespace"
            )));
        }
        self.string_vec_vals.insert(key, vals);
        Ok(())
    }

    pub fn string_vals(&self, key: &str) -> Result<&[String]> {
        lookup(&self.string_vec_vals, key).map(Vec::as_slice)
    }

    /// `(key, value)` pairs in key order; likewise for the other kinds.
    pub fn int_entries(&self) -> impl Iterator<Item = (&str, i32)> {
        self.int_vals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn double_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.double_vals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn string_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.string_vals.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn int_vec_entries(&self) -> impl Iterator<Item = (&str, &[i32])> {
        entries(&self.int_vec_vals)
    }

    pub fn double_vec_entries(&self) -> impl Iterator<Item = (&str, &[f64])> {
        entries(&self.double_vec_vals)
    }

    pub fn string_vec_entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        entries(&self.string_vec_vals)
    }
}
