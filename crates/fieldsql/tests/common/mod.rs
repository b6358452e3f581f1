//! Scripted in-memory client shared by the integration tests.

#![allow(dead_code)]

use fieldsql::{ExecResult, GenericClient, OrmError, OrmResult, Row, TransactionClient, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

/// One statement as received by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Default)]
struct State {
    statements: Vec<Statement>,
    query_results: VecDeque<OrmResult<Vec<Row>>>,
    exec_results: VecDeque<OrmResult<ExecResult>>,
    connected: bool,
    active: bool,
    fail_rollback: bool,
    commits: usize,
    rollbacks: usize,
}

/// Replays scripted results in order and records every statement.
///
/// With nothing scripted, queries return no rows and statements affect one row.
pub struct MockClient {
    state: Mutex<State>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                connected: true,
                active: true,
                ..State::default()
            }),
        }
    }

    pub fn disconnected() -> Self {
        let client = Self::new();
        client.state().connected = false;
        client
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Queue a result set for the next `query`.
    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) -> &Self {
        let columns: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        self.state().query_results.push_back(Ok(rows));
        self
    }

    /// Queue a failure for the next `query`.
    pub fn push_query_error(&self, err: OrmError) -> &Self {
        self.state().query_results.push_back(Err(err));
        self
    }

    /// Queue an outcome for the next `execute`.
    pub fn push_exec(&self, result: ExecResult) -> &Self {
        self.state().exec_results.push_back(Ok(result));
        self
    }

    /// Queue a failure for the next `execute`.
    pub fn push_exec_error(&self, err: OrmError) -> &Self {
        self.state().exec_results.push_back(Err(err));
        self
    }

    /// Make `rollback` fail.
    pub fn fail_rollback(&self) -> &Self {
        self.state().fail_rollback = true;
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.state().statements.clone()
    }

    pub fn commits(&self) -> usize {
        self.state().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.state().statements.push(Statement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl GenericClient for MockClient {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, params);
        self.state().query_results.pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.record(sql, params);
        self.state()
            .exec_results
            .pop_front()
            .unwrap_or(Ok(ExecResult::new(1)))
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }
}

impl TransactionClient for MockClient {
    fn is_active(&self) -> bool {
        self.state().active
    }

    async fn commit(&self) -> OrmResult<()> {
        let mut state = self.state();
        if !state.active {
            return Err(OrmError::NoTransaction);
        }
        state.active = false;
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> OrmResult<()> {
        let mut state = self.state();
        state.rollbacks += 1;
        state.active = false;
        if state.fail_rollback {
            return Err(OrmError::driver("connection reset"));
        }
        Ok(())
    }
}
