//! # Notification Flags
//!
//! `-n name:contract` arguments. The contract is `*`, `gas`, `neo` or a
//! script hash; native names are resolved through the node.

use async_trait::async_trait;
use mz_03_notification_matcher::{CriteriaSet, EmitterFilter, MatchCriteria};
use shared_types::{ConfigError, RemoteError, ScriptHash};

use crate::rpc::{NativeContract, NeoRpcClient};

/// Contract part of a `-n` argument before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRef {
    Any,
    Native(NativeContract),
    Hash(ScriptHash),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionArg {
    pub name: String,
    pub contract: ContractRef,
}

impl CriterionArg {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = raw.split(':').collect();
        let [name, contract] = parts.as_slice() else {
            return Err(ConfigError::InvalidCriteria(raw.to_string()));
        };

        let contract = contract.to_lowercase();
        let contract = match contract.as_str() {
            "*" => ContractRef::Any,
            "gas" => ContractRef::Native(NativeContract::Gas),
            "neo" => ContractRef::Native(NativeContract::Neo),
            other => ContractRef::Hash(ScriptHash::parse_any(other).map_err(|_| {
                ConfigError::Invalid(format!("invalid contract name {}", other))
            })?),
        };

        Ok(Self {
            name: name.to_string(),
            contract,
        })
    }
}

/// Source of native contract hashes.
#[async_trait]
pub trait NativeResolver: Send + Sync {
    async fn native_hash(&self, contract: NativeContract) -> Result<ScriptHash, RemoteError>;
}

#[async_trait]
impl NativeResolver for NeoRpcClient {
    async fn native_hash(&self, contract: NativeContract) -> Result<ScriptHash, RemoteError> {
        self.native_contract_hash(contract).await
    }
}

/// Parse every `-n` argument and resolve native names. A later argument for
/// the same name replaces an earlier one.
pub async fn resolve_criteria<N: NativeResolver + ?Sized>(
    raw: &[String],
    resolver: &N,
) -> Result<CriteriaSet, ConfigError> {
    let mut set = CriteriaSet::new();
    for arg in raw {
        let parsed = CriterionArg::parse(arg)?;
        let emitter = match parsed.contract {
            ContractRef::Any => EmitterFilter::Any,
            ContractRef::Hash(hash) => EmitterFilter::Exact(hash),
            ContractRef::Native(native) => {
                let hash = resolver.native_hash(native).await.map_err(|e| {
                    ConfigError::Invalid(format!(
                        "invalid contract name {}: {}",
                        native.manifest_name(),
                        e
                    ))
                })?;
                EmitterFilter::Exact(hash)
            }
        };
        set.insert(MatchCriteria::new(parsed.name, emitter));
    }
    Ok(set)
}
