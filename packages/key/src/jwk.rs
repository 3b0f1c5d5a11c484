//! JSON Web Key record
//!
//! [`Jwk`] is a structured view of an RFC 7517/7518 key object restricted to
//! the RSA and EC members this crate converts. Numeric members are held as
//! [`Param`], which is either the base64url text found in JSON or the raw
//! big-endian bytes produced while a codec works on the key. Serialization
//! always writes base64url text.

use crate::codec::numeric;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One numeric JWK member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// base64url text (padding and the standard alphabet are tolerated)
    Encoded(String),
    /// Unsigned big-endian bytes
    Raw(Vec<u8>),
}

impl Param {
    /// Big-endian bytes of this value
    ///
    /// # Errors
    /// Returns a validation error when encoded text is not valid base64url.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Param::Raw(bytes) => Ok(bytes.clone()),
            Param::Encoded(text) => numeric::decode_base64url(text),
        }
    }

    /// base64url text of this value
    #[must_use]
    pub fn to_encoded(&self) -> String {
        match self {
            Param::Encoded(text) => text.clone(),
            Param::Raw(bytes) => numeric::encode_base64url(bytes),
        }
    }

    /// Empty string or empty buffer
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Param::Encoded(text) => text.is_empty(),
            Param::Raw(bytes) => bytes.is_empty(),
        }
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_encoded())
    }
}

impl From<Vec<u8>> for Param {
    fn from(bytes: Vec<u8>) -> Self {
        Param::Raw(bytes)
    }
}

impl From<&[u8]> for Param {
    fn from(bytes: &[u8]) -> Self {
        Param::Raw(bytes.to_vec())
    }
}

impl From<String> for Param {
    fn from(text: String) -> Self {
        Param::Encoded(text)
    }
}

impl From<&str> for Param {
    fn from(text: &str) -> Self {
        Param::Encoded(text.to_string())
    }
}

/// Numeric JWK members, including the legacy aliases accepted on input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// EC x coordinate
    X,
    /// EC y coordinate
    Y,
    /// RSA modulus
    N,
    /// RSA public exponent
    E,
    /// Private exponent (RSA) or scalar (EC)
    D,
    /// First RSA prime
    P,
    /// Second RSA prime
    Q,
    /// d mod (p - 1)
    Dp,
    /// d mod (q - 1)
    Dq,
    /// q^-1 mod p
    Qi,
    /// Alias of `dp`
    Dmp1,
    /// Alias of `dq`
    Dmq1,
    /// Alias of `qi`
    Coeff,
    /// Alias of `n`
    Modulus,
    /// Alias of `e`
    Exponent,
}

impl Field {
    /// Every numeric member, canonical names first
    pub const ALL: [Field; 15] = [
        Field::X,
        Field::Y,
        Field::N,
        Field::E,
        Field::D,
        Field::P,
        Field::Q,
        Field::Dp,
        Field::Dq,
        Field::Qi,
        Field::Dmp1,
        Field::Dmq1,
        Field::Coeff,
        Field::Modulus,
        Field::Exponent,
    ];

    /// JSON member name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::N => "n",
            Field::E => "e",
            Field::D => "d",
            Field::P => "p",
            Field::Q => "q",
            Field::Dp => "dp",
            Field::Dq => "dq",
            Field::Qi => "qi",
            Field::Dmp1 => "dmp1",
            Field::Dmq1 => "dmq1",
            Field::Coeff => "coeff",
            Field::Modulus => "modulus",
            Field::Exponent => "exponent",
        }
    }

    /// Look a member up by its JSON name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// JSON Web Key for RSA or EC key material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Jwk {
    /// Key type, `RSA` or `EC`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Curve name for EC keys (`P-256`, `P-384`; platform names tolerated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC x coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Param>,
    /// EC y coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Param>,
    /// RSA modulus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<Param>,
    /// RSA public exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<Param>,
    /// Private exponent or scalar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Param>,
    /// First RSA prime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<Param>,
    /// Second RSA prime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<Param>,
    /// First CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<Param>,
    /// Second CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<Param>,
    /// CRT coefficient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<Param>,
    /// Legacy alias of `dp`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dmp1: Option<Param>,
    /// Legacy alias of `dq`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dmq1: Option<Param>,
    /// Legacy alias of `qi`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coeff: Option<Param>,
    /// Alias of `n`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulus: Option<Param>,
    /// Alias of `e`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<Param>,
    /// Members this crate does not interpret (`kid`, `use`, `alg`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Jwk {
    /// Empty JWK of the given key type
    #[must_use]
    pub fn with_kty(kty: &str) -> Self {
        Self {
            kty: Some(kty.to_string()),
            ..Self::default()
        }
    }

    /// Parse a JWK from JSON text
    ///
    /// # Errors
    /// Returns a validation error for malformed JSON, mistyped members or a
    /// partially typed key.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            Error::validation().context(format!("Invalid JWK format. Malformed JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    /// Build a JWK from a JSON value
    ///
    /// # Errors
    /// Returns a validation error when the value is not an object, a member
    /// is mistyped, or the key mixes RSA and EC members.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(Error::validation().context(format!(
                "Invalid JWK format. Expected a JSON object, found {} instead.",
                json_type(&other)
            ))),
        }
    }

    /// Serialize to a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Member by field
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&Param> {
        match field {
            Field::X => self.x.as_ref(),
            Field::Y => self.y.as_ref(),
            Field::N => self.n.as_ref(),
            Field::E => self.e.as_ref(),
            Field::D => self.d.as_ref(),
            Field::P => self.p.as_ref(),
            Field::Q => self.q.as_ref(),
            Field::Dp => self.dp.as_ref(),
            Field::Dq => self.dq.as_ref(),
            Field::Qi => self.qi.as_ref(),
            Field::Dmp1 => self.dmp1.as_ref(),
            Field::Dmq1 => self.dmq1.as_ref(),
            Field::Coeff => self.coeff.as_ref(),
            Field::Modulus => self.modulus.as_ref(),
            Field::Exponent => self.exponent.as_ref(),
        }
    }

    /// Mutable slot of a member
    pub fn slot(&mut self, field: Field) -> &mut Option<Param> {
        match field {
            Field::X => &mut self.x,
            Field::Y => &mut self.y,
            Field::N => &mut self.n,
            Field::E => &mut self.e,
            Field::D => &mut self.d,
            Field::P => &mut self.p,
            Field::Q => &mut self.q,
            Field::Dp => &mut self.dp,
            Field::Dq => &mut self.dq,
            Field::Qi => &mut self.qi,
            Field::Dmp1 => &mut self.dmp1,
            Field::Dmq1 => &mut self.dmq1,
            Field::Coeff => &mut self.coeff,
            Field::Modulus => &mut self.modulus,
            Field::Exponent => &mut self.exponent,
        }
    }

    /// Bytes of a member, if present
    ///
    /// # Errors
    /// Returns a validation error naming the member when it is not valid
    /// base64url.
    pub fn bytes(&self, field: Field) -> Result<Option<Vec<u8>>> {
        self.get(field)
            .map(|param| {
                param.to_bytes().map_err(|e| {
                    e.context(format!("'{}' is not a valid base64url value", field.name()))
                })
            })
            .transpose()
    }

    /// Bytes of a member that must be present and non-empty
    ///
    /// # Errors
    /// Returns a validation error when the member is missing or malformed.
    pub fn require(&self, field: Field) -> Result<Vec<u8>> {
        match self.bytes(field)? {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(Error::validation().context(format!("Missing required '{}'", field.name()))),
        }
    }

    /// Whether the key carries a private member
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.d.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Whether this is an EC key (decided by `crv`, then `kty`)
    #[must_use]
    pub fn is_ec(&self) -> bool {
        self.crv.is_some() || self.kty.as_deref().is_some_and(|k| k.eq_ignore_ascii_case("EC"))
    }

    /// Reject keys that mix RSA and EC members
    ///
    /// # Errors
    /// Returns a validation error for a partially typed key.
    pub fn check_typing(&self) -> Result<()> {
        match self.kty.as_deref() {
            Some(kty) if kty.eq_ignore_ascii_case("RSA") && self.crv.is_some() => {
                Err(Error::validation()
                    .context("Invalid JWK format. An RSA key must not carry 'crv'."))
            }
            Some(kty)
                if kty.eq_ignore_ascii_case("EC") && (self.n.is_some() || self.e.is_some()) =>
            {
                Err(Error::validation()
                    .context("Invalid JWK format. An EC key must not carry 'n' or 'e'."))
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<Map<String, Value>> for Jwk {
    type Error = Error;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        let mut jwk = Jwk::default();
        for (name, value) in map {
            match name.as_str() {
                "kty" | "crv" => {
                    let text = match value {
                        Value::String(text) => Some(text),
                        Value::Null => None,
                        other => {
                            return Err(Error::validation().context(format!(
                                "'{name}' is expected to be a string, found {} instead.",
                                json_type(&other)
                            )))
                        }
                    };
                    if name == "kty" {
                        jwk.kty = text;
                    } else {
                        jwk.crv = text;
                    }
                }
                _ => match Field::from_name(&name) {
                    Some(field) => *jwk.slot(field) = param_from_value(field, value)?,
                    None => {
                        jwk.extra.insert(name, value);
                    }
                },
            }
        }
        jwk.check_typing()?;
        Ok(jwk)
    }
}

fn param_from_value(field: Field, value: Value) -> Result<Option<Param>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(Param::Encoded(text))),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(|bytes| Some(Param::Raw(bytes)))
            .ok_or_else(|| {
                Error::validation().context(format!(
                    "'{}' is expected to be a base64 string or a buffer, found an array of non-bytes instead.",
                    field.name()
                ))
            }),
        other => Err(Error::validation().context(format!(
            "'{}' is expected to be a base64 string or a buffer, found {} instead.",
            field.name(),
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
