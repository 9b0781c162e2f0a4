// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Boolean(bool),
    Integer(i64),
    Float(Float),
    Color(RGBSpectrum),
    Vector(Vector3f),
    String(String),
}

impl From<bool> for Property {
    fn from(v: bool) -> Self {
        Property::Boolean(v)
    }
}

impl From<i64> for Property {
    fn from(v: i64) -> Self {
        Property::Integer(v)
    }
}

impl From<i32> for Property {
    fn from(v: i32) -> Self {
        Property::Integer(v as i64)
    }
}

impl From<Float> for Property {
    fn from(v: Float) -> Self {
        Property::Float(v)
    }
}

impl From<RGBSpectrum> for Property {
    fn from(v: RGBSpectrum) -> Self {
        Property::Color(v)
    }
}

impl From<Vector3f> for Property {
    fn from(v: Vector3f) -> Self {
        Property::Vector(v)
    }
}

impl From<&str> for Property {
    fn from(v: &str) -> Self {
        Property::String(v.to_string())
    }
}

/// Named parameters handed to an object's constructor. Getters fall back
/// to the supplied default when a name is absent and fail when it is
/// present with the wrong type.
#[derive(Debug, Clone, Default)]
pub struct PropertyList {
    entries: HashMap<String, Property>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<V: Into<Property>>(&mut self, name: &str, value: V) {
        self.entries.insert(name.to_string(), value.into());
    }

    pub fn with<V: Into<Property>>(mut self, name: &str, value: V) -> Self {
        self.set(name, value);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn mismatch(name: &str, expected: &'static str) -> RenderError {
        RenderError::InvalidProperty { name: name.to_string(), expected }
    }

    pub fn get_boolean(&self, name: &str, default: bool) -> Result<bool> {
        match self.entries.get(name) {
            None => Ok(default),
            Some(Property::Boolean(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "boolean")),
        }
    }

    pub fn get_integer(&self, name: &str, default: i64) -> Result<i64> {
        match self.entries.get(name) {
            None => Ok(default),
            Some(Property::Integer(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "integer")),
        }
    }

    /// Integers are accepted where a float is expected.
    pub fn get_float(&self, name: &str, default: Float) -> Result<Float> {
        match self.entries.get(name) {
            None => Ok(default),
            Some(Property::Float(v)) => Ok(*v),
            Some(Property::Integer(v)) => Ok(*v as Float),
            Some(_) => Err(Self::mismatch(name, "float")),
        }
    }

    /// A scalar is broadcast to a grey color.
    pub fn get_color(&self, name: &str, default: RGBSpectrum) -> Result<RGBSpectrum> {
        match self.entries.get(name) {
            None => Ok(default),
            Some(Property::Color(v)) => Ok(*v),
            Some(Property::Float(v)) => Ok(RGBSpectrum::splat(*v)),
            Some(_) => Err(Self::mismatch(name, "color")),
        }
    }

    pub fn get_vector(&self, name: &str, default: Vector3f) -> Result<Vector3f> {
        match self.entries.get(name) {
            None => Ok(default),
            Some(Property::Vector(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "vector")),
        }
    }

    pub fn get_string(&self, name: &str, default: &str) -> Result<String> {
        match self.entries.get(name) {
            None => Ok(default.to_string()),
            Some(Property::String(v)) => Ok(v.clone()),
            Some(_) => Err(Self::mismatch(name, "string")),
        }
    }
}
