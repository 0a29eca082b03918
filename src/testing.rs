//! Scripted JSON-RPC transport for exercising wallet calls without a node

use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, JsonRpcError, Provider, ProviderError, RpcError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptedRpcError {
    #[error("{0}")]
    Rpc(JsonRpcError),

    #[error("no scripted response for {0}")]
    Unscripted(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl RpcError for ScriptedRpcError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        match self {
            ScriptedRpcError::Rpc(err) => Some(err),
            _ => None,
        }
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            ScriptedRpcError::Serde(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScriptedRpcError> for ProviderError {
    fn from(src: ScriptedRpcError) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<Result<Value, JsonRpcError>>>,
    calls: Vec<(String, Value)>,
}

/// Answers each method from a per-method queue and records every call
#[derive(Debug, Clone, Default)]
pub struct ScriptedRpc {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self) -> Provider<ScriptedRpc> {
        Provider::new(self.clone())
    }

    pub fn respond<T: Serialize>(&self, method: &str, value: T) -> &Self {
        let value = serde_json::to_value(value).expect("serializable response");
        self.push(method, Ok(value))
    }

    pub fn fail(&self, method: &str, code: i64, message: &str) -> &Self {
        self.push(
            method,
            Err(JsonRpcError {
                code,
                message: message.to_string(),
                data: None,
            }),
        )
    }

    fn push(&self, method: &str, outcome: Result<Value, JsonRpcError>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Methods called so far, in order
    pub fn methods(&self) -> Vec<String> {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    /// Params of the first call to `method`
    pub fn params_of(&self, method: &str) -> Option<Value> {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }
}

#[async_trait]
impl JsonRpcClient for ScriptedRpc {
    type Error = ScriptedRpcError;

    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, Self::Error>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let params = serde_json::to_value(params)?;
        let outcome = {
            let mut script = self.script.lock().unwrap();
            script.calls.push((method.to_string(), params));
            script
                .responses
                .get_mut(method)
                .and_then(|queue| queue.pop_front())
        };

        match outcome {
            Some(Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Err(err)) => Err(ScriptedRpcError::Rpc(err)),
            None => Err(ScriptedRpcError::Unscripted(method.to_string())),
        }
    }
}
