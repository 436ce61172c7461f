//! Canonical action hashing ("connection id").
//!
//! The action payload is packed with msgpack in named/map form so the bytes
//! match the reference SDK exactly, then extended with the nonce, the
//! optional vault address and the optional expiry:
//!
//! ```text
//! msgpack(action) || nonce_be8 || (0x00 | 0x01 || vault20) [|| 0x00 || expiry_be8]
//! ```
//!
//! The vault slot always contributes its presence byte; the expiry block is
//! entirely absent when no expiry is set. Keccak-256 over the whole buffer
//! yields the connection id signed through the phantom agent.

use hlsign_crypto::{keccak256, Address, Digest};
use serde::Serialize;

use crate::error::{AuthError, Result};

/// Compute the connection id for an exchange action.
///
/// # Errors
/// `AuthError::Serialization` when the action cannot be msgpack-encoded.
pub fn action_hash<A: Serialize>(
    action: &A,
    nonce: u64,
    vault_address: Option<&Address>,
    expires_after: Option<u64>,
) -> Result<Digest> {
    let mut data =
        rmp_serde::to_vec_named(action).map_err(|e| AuthError::Serialization(e.to_string()))?;

    data.extend_from_slice(&nonce.to_be_bytes());

    match vault_address {
        None => data.push(0x00),
        Some(addr) => {
            data.push(0x01);
            data.extend_from_slice(addr.as_bytes());
        }
    }

    if let Some(expires) = expires_after {
        data.push(0x00);
        data.extend_from_slice(&expires.to_be_bytes());
    }

    Ok(keccak256(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Action, CancelWire, OrderTypeWire, OrderWire};

    fn reference_order_action() -> Action {
        Action::order(vec![OrderWire {
            asset: 110027,
            is_buy: true,
            limit_px: "105.00".into(),
            sz: "0.2".into(),
            reduce_only: false,
            order_type: OrderTypeWire::ioc(),
            cloid: Some("0x0de3e244a8f44fc28a6b7bc852d66d19".into()),
        }])
    }

    /// Msgpack bytes must match the reference SDK byte for byte; a single
    /// reordered key or widened integer changes the hash and the exchange
    /// rejects the signature.
    #[test]
    fn test_msgpack_matches_reference_sdk() {
        let packed = rmp_serde::to_vec_named(&reference_order_action()).unwrap();
        let expected = "83a474797065a56f72646572a66f72646572739187a161ce0001adcba162c3a170a6\
                        3130352e3030a173a3302e32a172c2a17481a56c696d697481a3746966a3496f63a1\
                        63d92230783064653365323434613866343466633238613662376263383532643636\
                        643139a867726f7570696e67a26e61";
        assert_eq!(hex::encode(&packed), expected);
    }

    #[test]
    fn test_action_hash_matches_reference_sdk() {
        let hash = action_hash(&reference_order_action(), 1769339470576, None, None).unwrap();
        assert_eq!(
            hash.to_hex(),
            "904c57b8f4b75ac9da005b49298dc39af735ed8c3a89b241f5f1e061e0207868"
        );
    }

    fn simple_order_action() -> Action {
        Action::order(vec![OrderWire {
            asset: 0,
            is_buy: true,
            limit_px: "30000.0".into(),
            sz: "0.01".into(),
            reduce_only: false,
            order_type: OrderTypeWire::gtc(),
            cloid: None,
        }])
    }

    #[test]
    fn test_every_input_field_perturbs_the_hash() {
        let action = simple_order_action();
        let nonce = 1_700_000_000_000u64;
        let vault: Address = "0x1234567890123456789012345678901234567890".parse().unwrap();

        let base = action_hash(&action, nonce, None, None).unwrap();
        assert_eq!(
            base.to_hex(),
            "9b915ec584adc3b6d47319d2a5881a9ac0a3c01f865f18b410a7a6c30a77478b"
        );

        let bumped_nonce = action_hash(&action, nonce + 1, None, None).unwrap();
        assert_eq!(
            bumped_nonce.to_hex(),
            "34c39716e5ee7dfa24ed1aaf681363214b780b927ed608f1d8b6756ab5bf3daf"
        );

        let with_vault = action_hash(&action, nonce, Some(&vault), None).unwrap();
        assert_eq!(
            with_vault.to_hex(),
            "5b9dc78564839f0be7b6fef8d7c1e341a1c8ad317b37c905f0bcd8fac6d616a3"
        );

        let with_expiry = action_hash(&action, nonce, None, Some(1_700_000_600_000)).unwrap();
        assert_eq!(
            with_expiry.to_hex(),
            "8a4d5ea12bc5bdf156f54a371e34af8f6d8c7fb312a7e8e525ca09e88cfd7911"
        );

        let digests = [base, bumped_nonce, with_vault, with_expiry];
        for (i, a) in digests.iter().enumerate() {
            for b in &digests[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_cancel_hash_differs_from_order() {
        let nonce = 1000u64;
        let order = action_hash(&simple_order_action(), nonce, None, None).unwrap();
        let cancel = action_hash(
            &Action::cancel(vec![CancelWire { asset: 5, oid: 123 }]),
            nonce,
            None,
            None,
        )
        .unwrap();
        assert_ne!(order, cancel);
    }

    #[test]
    fn test_expiry_one_unit_sensitivity() {
        let action = simple_order_action();
        let a = action_hash(&action, 1000, None, Some(5000)).unwrap();
        let b = action_hash(&action, 1000, None, Some(5001)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_json_value_map_packs_like_struct() {
        // The orchestrator receives actions as (order-preserving) JSON maps;
        // packing the map must produce the same bytes as the typed struct.
        let action = reference_order_action();
        let as_value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            rmp_serde::to_vec_named(&action).unwrap(),
            rmp_serde::to_vec_named(&as_value).unwrap()
        );
    }
}
