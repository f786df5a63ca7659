//! # Proof Types and Circuits
//!
//! The circuit catalogue offered per proof type, and the mapping from the
//! circuit chosen in the form to the identifier placed in query objects.
//!
//! ## Naming Convention
//!
//! V3-family and on-chain circuits are recognised by substring (`V3`,
//! `OnChain`) of their identifier. The identifiers are the only signal, so
//! a new circuit must follow the same naming to be classified correctly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Circuit tag for linked multi-condition query groups.
pub const LINKED_MULTI_QUERY_CIRCUIT: &str = "linkedMultiQuery10-beta.1";

const V3_SIG_BETA: &str = "credentialAtomicQueryV3-beta.1";
const V3_MTP_BETA: &str = "credentialAtomicQueryMTPV3-beta.1";
const V3_ON_CHAIN_SIG_BETA: &str = "credentialAtomicQueryV3OnChain-beta.1";
const V3_ON_CHAIN_MTP_BETA: &str = "credentialAtomicQueryMTPV3OnChain-beta.1";

/// How the issuer's claim is proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    /// BJJ signature proof.
    #[serde(rename = "SIG")]
    Sig,
    /// Sparse Merkle tree inclusion proof.
    #[serde(rename = "MTP")]
    Mtp,
}

/// Circuits selectable in the query form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitId {
    #[serde(rename = "credentialAtomicQuerySigV2")]
    SigV2,
    #[serde(rename = "credentialAtomicQuerySigV2OnChain")]
    SigV2OnChain,
    #[serde(rename = "credentialAtomicQueryMTPV2")]
    MtpV2,
    #[serde(rename = "credentialAtomicQueryMTPV2OnChain")]
    MtpV2OnChain,
    #[serde(rename = "credentialAtomicQueryV3")]
    V3,
    #[serde(rename = "credentialAtomicQueryV3OnChain")]
    V3OnChain,
}

impl CircuitId {
    pub fn all() -> &'static [CircuitId] {
        &[
            Self::SigV2,
            Self::SigV2OnChain,
            Self::MtpV2,
            Self::MtpV2OnChain,
            Self::V3,
            Self::V3OnChain,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SigV2 => "credentialAtomicQuerySigV2",
            Self::SigV2OnChain => "credentialAtomicQuerySigV2OnChain",
            Self::MtpV2 => "credentialAtomicQueryMTPV2",
            Self::MtpV2OnChain => "credentialAtomicQueryMTPV2OnChain",
            Self::V3 => "credentialAtomicQueryV3",
            Self::V3OnChain => "credentialAtomicQueryV3OnChain",
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CircuitId {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| QueryError::UnknownCircuit(s.to_string()))
    }
}

/// Circuits offered for a proof type. No proof type, no circuits.
pub fn available_circuits(proof_type: Option<ProofType>) -> &'static [CircuitId] {
    match proof_type {
        None => &[],
        Some(ProofType::Sig) => &[
            CircuitId::SigV2,
            CircuitId::SigV2OnChain,
            CircuitId::V3,
            CircuitId::V3OnChain,
        ],
        Some(ProofType::Mtp) => &[
            CircuitId::MtpV2,
            CircuitId::MtpV2OnChain,
            CircuitId::V3,
            CircuitId::V3OnChain,
        ],
    }
}

/// Whether the circuit belongs to the V3 family.
pub fn is_v3_circuit(circuit_id: Option<CircuitId>) -> bool {
    circuit_id.is_some_and(|id| id.as_str().contains("V3"))
}

/// Whether the circuit verifies on chain.
pub fn is_on_chain_circuit(circuit_id: Option<CircuitId>) -> bool {
    circuit_id.is_some_and(|id| id.as_str().contains("OnChain"))
}

/// Circuit identifier to put in a query object.
///
/// Linked groups always use [`LINKED_MULTI_QUERY_CIRCUIT`]. Without a
/// selection the V3 beta circuit for the proof type is used. V3 circuits map
/// to their `-beta.1` names; V2 circuits pass through unchanged.
pub fn map_circuit_id(
    circuit_id: Option<CircuitId>,
    proof_type: Option<ProofType>,
    linked: bool,
) -> &'static str {
    if linked {
        return LINKED_MULTI_QUERY_CIRCUIT;
    }
    let mtp = proof_type == Some(ProofType::Mtp);
    match circuit_id {
        None if mtp => V3_MTP_BETA,
        None => V3_SIG_BETA,
        Some(id) if is_v3_circuit(Some(id)) => match (is_on_chain_circuit(Some(id)), mtp) {
            (false, false) => V3_SIG_BETA,
            (false, true) => V3_MTP_BETA,
            (true, false) => V3_ON_CHAIN_SIG_BETA,
            (true, true) => V3_ON_CHAIN_MTP_BETA,
        },
        Some(id) => id.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_value(ProofType::Mtp).unwrap(), json!("MTP"));
        let id: CircuitId = serde_json::from_value(json!("credentialAtomicQueryV3OnChain")).unwrap();
        assert_eq!(id, CircuitId::V3OnChain);
        assert_eq!("credentialAtomicQueryMTPV2".parse::<CircuitId>(), Ok(CircuitId::MtpV2));
        assert!("credentialAtomicQueryV4".parse::<CircuitId>().is_err());
    }

    #[test]
    fn circuits_per_proof_type() {
        assert!(available_circuits(None).is_empty());
        assert_eq!(
            available_circuits(Some(ProofType::Sig)),
            &[CircuitId::SigV2, CircuitId::SigV2OnChain, CircuitId::V3, CircuitId::V3OnChain]
        );
        assert!(available_circuits(Some(ProofType::Mtp)).contains(&CircuitId::MtpV2OnChain));
    }

    #[test]
    fn substring_predicates() {
        assert!(is_v3_circuit(Some(CircuitId::V3OnChain)));
        assert!(!is_v3_circuit(Some(CircuitId::SigV2)));
        assert!(!is_v3_circuit(None));
        assert!(is_on_chain_circuit(Some(CircuitId::MtpV2OnChain)));
        assert!(!is_on_chain_circuit(Some(CircuitId::V3)));
    }

    #[test]
    fn linked_always_wins() {
        for id in CircuitId::all() {
            assert_eq!(
                map_circuit_id(Some(*id), Some(ProofType::Mtp), true),
                LINKED_MULTI_QUERY_CIRCUIT
            );
        }
        assert_eq!(map_circuit_id(None, None, true), LINKED_MULTI_QUERY_CIRCUIT);
    }

    #[test]
    fn v3_maps_to_beta_names() {
        assert_eq!(
            map_circuit_id(Some(CircuitId::V3), Some(ProofType::Mtp), false),
            "credentialAtomicQueryMTPV3-beta.1"
        );
        assert_eq!(
            map_circuit_id(Some(CircuitId::V3), Some(ProofType::Sig), false),
            "credentialAtomicQueryV3-beta.1"
        );
        assert_eq!(
            map_circuit_id(Some(CircuitId::V3OnChain), Some(ProofType::Mtp), false),
            "credentialAtomicQueryMTPV3OnChain-beta.1"
        );
        assert_eq!(
            map_circuit_id(Some(CircuitId::V3OnChain), None, false),
            "credentialAtomicQueryV3OnChain-beta.1"
        );
    }

    #[test]
    fn default_is_v3_beta() {
        assert_eq!(map_circuit_id(None, Some(ProofType::Mtp), false), V3_MTP_BETA);
        assert_eq!(map_circuit_id(None, None, false), V3_SIG_BETA);
    }

    #[test]
    fn v2_passes_through() {
        assert_eq!(
            map_circuit_id(Some(CircuitId::SigV2), Some(ProofType::Sig), false),
            "credentialAtomicQuerySigV2"
        );
        assert_eq!(
            map_circuit_id(Some(CircuitId::MtpV2OnChain), Some(ProofType::Mtp), false),
            "credentialAtomicQueryMTPV2OnChain"
        );
    }
}
