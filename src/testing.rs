use crate::facebook::{BatchRequest, BatchResponse, FacebookApiError, GraphApi, HttpMethod, Params};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub endpoint: String,
    pub access_token: Option<String>,
    pub params: Params,
}

type Reply = Result<Value, FacebookApiError>;

/// Serves queued replies per (method, endpoint). The last queued reply
/// for a route is sticky so repeated reads keep answering.
#[derive(Default)]
pub struct FakeGraph {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
    batch_reply: Mutex<Option<Result<Vec<BatchResponse>, FacebookApiError>>>,
    batch_calls: Mutex<Vec<Vec<BatchRequest>>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: HttpMethod, endpoint: &str, reply: Value) -> Self {
        self.push(method, endpoint, Ok(reply));
        self
    }

    pub fn fail(self, method: HttpMethod, endpoint: &str, message: &str) -> Self {
        self.push(
            method,
            endpoint,
            Err(FacebookApiError::Api {
                status: 400,
                message: message.to_string(),
                body: serde_json::json!({"error": {"message": message}}),
            }),
        );
        self
    }

    pub fn on_batch(self, reply: Vec<BatchResponse>) -> Self {
        *self.batch_reply.lock().unwrap() = Some(Ok(reply));
        self
    }

    pub fn fail_batch(self, message: &str) -> Self {
        *self.batch_reply.lock().unwrap() = Some(Err(FacebookApiError::RequestFailed(message.to_string())));
        self
    }

    fn push(&self, method: HttpMethod, endpoint: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, endpoint.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: HttpMethod, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.endpoint == endpoint)
            .collect()
    }

    pub fn batch_calls(&self) -> Vec<Vec<BatchRequest>> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphApi for FakeGraph {
    async fn request(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
        params: &Params,
        method: HttpMethod,
    ) -> Result<Value, FacebookApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            access_token: access_token.map(str::to_string),
            params: params.clone(),
        });

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&(method, endpoint.to_string()))
            .filter(|queue| !queue.is_empty());
        match queue {
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            Some(queue) => queue.pop_front().expect("queue checked non-empty"),
            None => Err(FacebookApiError::RequestFailed(format!(
                "no fake route for {} {}",
                method.as_str(),
                endpoint
            ))),
        }
    }

    async fn batch_request(
        &self,
        requests: &[BatchRequest],
        _access_token: Option<&str>,
    ) -> Result<Vec<BatchResponse>, FacebookApiError> {
        self.batch_calls.lock().unwrap().push(requests.to_vec());
        self.batch_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(FacebookApiError::RequestFailed("no fake batch reply".to_string())))
    }
}
