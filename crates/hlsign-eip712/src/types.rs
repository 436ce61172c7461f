//! Typed-data descriptors and values.

use std::collections::BTreeMap;

use hlsign_crypto::Address;

use crate::error::{Eip712Error, Result};

/// One (fieldName, abiTypeName) pair of a struct type declaration.
/// Declaration order is part of the hash, so descriptors are kept in
/// ordered lists, never maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Registry mapping struct type name to its field descriptors, used to
/// expand nested and array types during hashing. Populated once, then
/// read-only.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, fields: Vec<FieldDescriptor>) {
        self.types.insert(name.into(), fields);
    }

    pub(crate) fn get(&self, name: &str) -> Result<&[FieldDescriptor]> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Eip712Error::UnknownType(name.to_string()))
    }
}

/// A value for one typed field.
///
/// This is a closed variant set: the canonicalizer constructs these
/// explicitly from the action payload, so an unsupported runtime value kind
/// fails loudly at construction instead of being silently miscoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Uint64(u64),
    Uint256(u128),
    Bool(bool),
    Address(Address),
    Bytes32([u8; 32]),
    Bytes(Vec<u8>),
    /// Field values of a nested struct, in that struct's declared order.
    Struct(Vec<TypedValue>),
    /// Homogeneous array of the field's element type.
    Array(Vec<TypedValue>),
}

/// The EIP712Domain separator contents used by the exchange: name, version,
/// chainId and verifyingContract (no salt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    pub fn new(name: impl Into<String>, version: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract: Address::ZERO,
        }
    }

    pub(crate) fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name", "string"),
            FieldDescriptor::new("version", "string"),
            FieldDescriptor::new("chainId", "uint256"),
            FieldDescriptor::new("verifyingContract", "address"),
        ]
    }

    pub(crate) fn values(&self) -> Vec<TypedValue> {
        vec![
            TypedValue::String(self.name.clone()),
            TypedValue::String(self.version.clone()),
            TypedValue::Uint256(self.chain_id as u128),
            TypedValue::Address(self.verifying_contract),
        ]
    }
}
