//! JSON-RPC client for Neo N3 nodes.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use mz_01_chain_cache::RemoteSource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::{
    ApplicationLog, BlockIndex, BlockRecord, Hash256, NetworkId, RemoteError, ScriptHash,
};

use super::types::{
    parse_script_hash, ApplicationLogResult, BlockResult, JsonRpcResponse, NativeContractResult,
    VersionResult,
};
use crate::config::RpcConfig;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// Native contracts the command line can refer to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeContract {
    Gas,
    Neo,
}

impl NativeContract {
    /// Manifest name reported by `getnativecontracts`.
    pub fn manifest_name(&self) -> &'static str {
        match self {
            NativeContract::Gas => "GasToken",
            NativeContract::Neo => "NeoToken",
        }
    }
}

/// RPC client for a Neo N3 node.
pub struct NeoRpcClient {
    http_client: reqwest::Client,
    endpoint: String,
    request_id: AtomicU64,
}

impl NeoRpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Transport(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            request_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a JSON-RPC call.
    async fn call<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RemoteError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        tracing::trace!("rpc {} #{}", method, id);
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("{}: {}", method, e)))?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("{}: cannot read response: {}", method, e)))?;

        if let Some(error) = rpc_response.error {
            // Neo nodes report missing blocks and logs as "Unknown ..." errors.
            if error.message.starts_with("Unknown") {
                return Err(RemoteError::NotFound(error.message));
            }
            return Err(RemoteError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| RemoteError::Malformed(format!("{}: response missing result", method)))
    }

    /// Script hash of a native contract.
    pub async fn native_contract_hash(
        &self,
        contract: NativeContract,
    ) -> Result<ScriptHash, RemoteError> {
        let contracts: Vec<NativeContractResult> =
            self.call("getnativecontracts", Vec::<Value>::new()).await?;
        let found = contracts
            .iter()
            .find(|c| c.manifest.name == contract.manifest_name())
            .ok_or_else(|| RemoteError::NotFound(contract.manifest_name().to_string()))?;
        parse_script_hash(&found.hash)
    }

    async fn get_block(&self, param: Value) -> Result<BlockRecord, RemoteError> {
        let block: BlockResult = self.call("getblock", json!([param, true])).await?;
        BlockRecord::try_from(block)
    }
}

#[async_trait]
impl RemoteSource for NeoRpcClient {
    async fn fetch_block_by_index(&self, index: BlockIndex) -> Result<BlockRecord, RemoteError> {
        self.get_block(json!(index)).await
    }

    async fn fetch_block_by_hash(&self, hash: &Hash256) -> Result<BlockRecord, RemoteError> {
        self.get_block(json!(hash.to_string())).await
    }

    async fn fetch_application_log(&self, hash: &Hash256) -> Result<ApplicationLog, RemoteError> {
        let log: ApplicationLogResult = self
            .call("getapplicationlog", json!([hash.to_string()]))
            .await?;
        ApplicationLog::try_from(log)
    }

    async fn height(&self) -> Result<BlockIndex, RemoteError> {
        self.call("getblockcount", Vec::<Value>::new()).await
    }

    async fn network_id(&self) -> Result<NetworkId, RemoteError> {
        let version: VersionResult = self.call("getversion", Vec::<Value>::new()).await?;
        Ok(NetworkId(version.protocol.network))
    }
}
