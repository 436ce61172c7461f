//! Struct hashing and the final hash-to-sign.

use std::collections::BTreeSet;

use hlsign_crypto::{keccak256, Digest, Keccak256};

use crate::error::{Eip712Error, Result};
use crate::types::{Eip712Domain, FieldDescriptor, TypeRegistry, TypedValue};

/// Whether a type name refers to a struct in the registry (as opposed to an
/// ABI primitive or an array).
fn is_reference_type(type_name: &str) -> bool {
    !type_name.contains('[') && !is_atomic(type_name)
}

fn is_atomic(type_name: &str) -> bool {
    matches!(type_name, "bytes" | "string" | "bool" | "address") || is_sized_primitive(type_name)
}

/// bytesN / uintN / intN.
fn is_sized_primitive(type_name: &str) -> bool {
    for prefix in ["bytes", "uint", "int"] {
        if let Some(rest) = type_name.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Element type of an array type name ("uint64[]" -> "uint64").
fn element_type(type_name: &str) -> &str {
    match type_name.find('[') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    }
}

/// The canonical type signature: the primary type's signature followed by
/// the signatures of every distinct referenced struct type, sorted
/// lexicographically by type name.
pub fn encode_type(registry: &TypeRegistry, primary_type: &str) -> Result<String> {
    let mut referenced = BTreeSet::new();
    collect_referenced(registry, primary_type, &mut referenced)?;
    referenced.remove(primary_type);

    let mut out = type_signature(registry, primary_type)?;
    for name in &referenced {
        out.push_str(&type_signature(registry, name)?);
    }
    Ok(out)
}

fn collect_referenced(
    registry: &TypeRegistry,
    type_name: &str,
    seen: &mut BTreeSet<String>,
) -> Result<()> {
    for field in registry.get(type_name)? {
        let elem = element_type(&field.type_name);
        if is_reference_type(elem) && seen.insert(elem.to_string()) {
            collect_referenced(registry, elem, seen)?;
        }
    }
    Ok(())
}

fn type_signature(registry: &TypeRegistry, type_name: &str) -> Result<String> {
    let fields = registry.get(type_name)?;
    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();
    Ok(format!("{}({})", type_name, members.join(",")))
}

/// keccak256 of the UTF-8 canonical type signature.
pub fn type_hash(registry: &TypeRegistry, type_name: &str) -> Result<Digest> {
    Ok(keccak256(encode_type(registry, type_name)?.as_bytes()))
}

/// hashStruct = keccak256(typeHash || encodeData(values)).
pub fn hash_struct(
    registry: &TypeRegistry,
    type_name: &str,
    values: &[TypedValue],
) -> Result<Digest> {
    let mut buf = Vec::with_capacity(32 * (values.len() + 1));
    buf.extend_from_slice(type_hash(registry, type_name)?.as_bytes());
    let fields = registry.get(type_name)?;
    if fields.len() != values.len() {
        return Err(Eip712Error::ArityMismatch {
            type_name: type_name.to_string(),
            expected: fields.len(),
            got: values.len(),
        });
    }
    for (field, value) in fields.iter().zip(values) {
        encode_value(registry, field, &field.type_name, value, &mut buf)?;
    }
    Ok(keccak256(&buf))
}

/// Serialize one field into its 32-byte static encoding:
/// - struct fields recurse into hashStruct
/// - string/bytes are keccak256 hashed
/// - arrays encode each element per the element type, then hash the
///   concatenation
/// - fixed-size primitives are padded to 32 bytes per the ABI rule
fn encode_value(
    registry: &TypeRegistry,
    field: &FieldDescriptor,
    type_name: &str,
    value: &TypedValue,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mismatch = || Eip712Error::ValueMismatch {
        field: field.name.clone(),
        type_name: type_name.to_string(),
    };

    if type_name.contains('[') {
        let TypedValue::Array(items) = value else {
            return Err(mismatch());
        };
        let elem = element_type(type_name);
        let mut inner = Vec::with_capacity(32 * items.len());
        for item in items {
            encode_value(registry, field, elem, item, &mut inner)?;
        }
        out.extend_from_slice(keccak256(&inner).as_bytes());
        return Ok(());
    }

    if is_reference_type(type_name) {
        let TypedValue::Struct(inner_values) = value else {
            return Err(mismatch());
        };
        out.extend_from_slice(hash_struct(registry, type_name, inner_values)?.as_bytes());
        return Ok(());
    }

    match type_name {
        "string" => {
            let TypedValue::String(s) = value else {
                return Err(mismatch());
            };
            out.extend_from_slice(keccak256(s.as_bytes()).as_bytes());
        }
        "bytes" => {
            let TypedValue::Bytes(b) = value else {
                return Err(mismatch());
            };
            out.extend_from_slice(keccak256(b).as_bytes());
        }
        "bytes32" => {
            let TypedValue::Bytes32(b) = value else {
                return Err(mismatch());
            };
            out.extend_from_slice(b);
        }
        "address" => {
            let TypedValue::Address(a) = value else {
                return Err(mismatch());
            };
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(a.as_bytes());
        }
        "bool" => {
            let TypedValue::Bool(b) = value else {
                return Err(mismatch());
            };
            let mut word = [0u8; 32];
            word[31] = *b as u8;
            out.extend_from_slice(&word);
        }
        t if t.starts_with("uint") || t.starts_with("int") => {
            let v: u128 = match value {
                TypedValue::Uint64(v) => *v as u128,
                TypedValue::Uint256(v) => *v,
                _ => return Err(mismatch()),
            };
            let mut word = [0u8; 32];
            word[16..].copy_from_slice(&v.to_be_bytes());
            out.extend_from_slice(&word);
        }
        other => return Err(Eip712Error::UnsupportedType(other.to_string())),
    }
    Ok(())
}

/// The final 32-byte hash-to-sign:
/// keccak256(0x19 || 0x01 || hashStruct(domain) || hashStruct(primary)).
pub fn signing_hash(
    domain: &Eip712Domain,
    registry: &TypeRegistry,
    primary_type: &str,
    message: &[TypedValue],
) -> Result<Digest> {
    let mut domain_registry = TypeRegistry::new();
    domain_registry.register("EIP712Domain", Eip712Domain::descriptors());
    let separator = hash_struct(&domain_registry, "EIP712Domain", &domain.values())?;

    let mut hasher = Keccak256::new();
    hasher.update(&[0x19, 0x01]);
    hasher.update(separator.as_bytes());
    hasher.update(hash_struct(registry, primary_type, message)?.as_bytes());
    Ok(hasher.finalize())
}
