//! Neo N3 JSON-RPC wire types and their conversion into chain records.

use serde::Deserialize;
use shared_types::{
    ApplicationLog, BlockRecord, Execution, Hash256, NotificationEvent, RemoteError, ScriptHash,
    StackItem,
};

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct VersionResult {
    pub protocol: ProtocolInfo,
}

#[derive(Debug, Deserialize)]
pub struct ProtocolInfo {
    pub network: u32,
}

#[derive(Debug, Deserialize)]
pub struct TxRef {
    pub hash: String,
}

/// `getblock` verbose result. Fields the scanners never read are skipped.
#[derive(Debug, Deserialize)]
pub struct BlockResult {
    pub hash: String,
    pub index: u32,
    pub time: u64,
    #[serde(default)]
    pub tx: Vec<TxRef>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationResult {
    pub contract: String,
    pub eventname: String,
    pub state: StackItem,
}

#[derive(Debug, Deserialize)]
pub struct ExecutionResult {
    pub trigger: String,
    pub vmstate: String,
    #[serde(default)]
    pub notifications: Vec<NotificationResult>,
}

/// `getapplicationlog` result. Block logs carry `blockhash`, transaction
/// logs carry `txid`.
#[derive(Debug, Deserialize)]
pub struct ApplicationLogResult {
    pub blockhash: Option<String>,
    pub txid: Option<String>,
    #[serde(default)]
    pub executions: Vec<ExecutionResult>,
}

#[derive(Debug, Deserialize)]
pub struct NativeContractResult {
    pub hash: String,
    pub manifest: ManifestResult,
}

#[derive(Debug, Deserialize)]
pub struct ManifestResult {
    pub name: String,
}

fn malformed(what: &str, err: impl std::fmt::Display) -> RemoteError {
    RemoteError::Malformed(format!("{}: {}", what, err))
}

pub fn parse_hash(raw: &str) -> Result<Hash256, RemoteError> {
    raw.parse().map_err(|e| malformed(raw, e))
}

pub fn parse_script_hash(raw: &str) -> Result<ScriptHash, RemoteError> {
    raw.parse().map_err(|e| malformed(raw, e))
}

impl TryFrom<BlockResult> for BlockRecord {
    type Error = RemoteError;

    fn try_from(block: BlockResult) -> Result<Self, Self::Error> {
        Ok(BlockRecord {
            index: block.index,
            hash: parse_hash(&block.hash)?,
            timestamp_ms: block.time,
            transactions: block
                .tx
                .iter()
                .map(|tx| parse_hash(&tx.hash))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<ApplicationLogResult> for ApplicationLog {
    type Error = RemoteError;

    fn try_from(log: ApplicationLogResult) -> Result<Self, Self::Error> {
        let subject = log
            .blockhash
            .as_deref()
            .or(log.txid.as_deref())
            .ok_or_else(|| RemoteError::Malformed("application log without subject".into()))?;

        let executions = log
            .executions
            .into_iter()
            .map(|e| {
                let notifications = e
                    .notifications
                    .into_iter()
                    .map(|n| {
                        Ok(NotificationEvent {
                            emitter: parse_script_hash(&n.contract)?,
                            name: n.eventname,
                            payload: n.state,
                        })
                    })
                    .collect::<Result<_, RemoteError>>()?;
                Ok(Execution {
                    trigger: e.trigger,
                    vm_state: e.vmstate,
                    notifications,
                })
            })
            .collect::<Result<_, RemoteError>>()?;

        Ok(ApplicationLog {
            subject: parse_hash(subject)?,
            executions,
        })
    }
}
