//! Integration tests for [`HandlerChain`] phase ordering.
//!
//! Covers: before in order, handle until the first Stop/Reply, after in reverse with the
//! final response, and a before returning false skipping the rest.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use omni_bot::{Handler, HandlerChain, HandlerResponse, Message};

mod common;
use common::create_test_message;

type Log = Arc<Mutex<Vec<String>>>;

/// Logs every phase; `handle` answers with `response`.
struct Recorder {
    name: &'static str,
    log: Log,
    allow: bool,
    response: HandlerResponse,
}

impl Recorder {
    fn new(name: &'static str, log: &Log, response: HandlerResponse) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: log.clone(),
            allow: true,
            response,
        })
    }

    fn blocking(name: &'static str, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: log.clone(),
            allow: false,
            response: HandlerResponse::Continue,
        })
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl Handler for Recorder {
    async fn before(&self, _message: &Message) -> omni_bot::Result<bool> {
        self.push(format!("before_{}", self.name));
        Ok(self.allow)
    }

    async fn handle(&self, _message: &Message) -> omni_bot::Result<HandlerResponse> {
        self.push(format!("handle_{}", self.name));
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> omni_bot::Result<()> {
        let seen = match response {
            HandlerResponse::Reply(text) => text.as_str(),
            HandlerResponse::Stop => "stop",
            _ => "continue",
        };
        self.push(format!("after_{}:{}", self.name, seen));
        Ok(())
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// **Test: A Reply ends the handle phase and every after sees it, in reverse order.**
///
/// **Setup:** first (Continue), second (Reply "hi"), third (Continue).
/// **Expected:** third's handle never runs; after runs third, second, first with "hi".
#[tokio::test]
async fn test_reply_ends_handle_phase() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::new("first", &log, HandlerResponse::Continue))
        .add_handler(Recorder::new("second", &log, HandlerResponse::Reply("hi".to_string())))
        .add_handler(Recorder::new("third", &log, HandlerResponse::Continue));

    let result = chain.handle(&create_test_message(1, "x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Reply("hi".to_string()));
    assert_eq!(
        entries(&log),
        vec![
            "before_first",
            "before_second",
            "before_third",
            "handle_first",
            "handle_second",
            "after_third:hi",
            "after_second:hi",
            "after_first:hi",
        ]
    );
}

/// **Test: When every handler continues, the final response is Continue.**
#[tokio::test]
async fn test_all_continue() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::new("a", &log, HandlerResponse::Continue))
        .add_handler(Recorder::new("b", &log, HandlerResponse::Continue));

    let result = chain.handle(&create_test_message(1, "x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(
        entries(&log),
        vec!["before_a", "before_b", "handle_a", "handle_b", "after_b:continue", "after_a:continue"]
    );
}

/// **Test: A before returning false stops the chain with no handle or after phase.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::blocking("gate", &log))
        .add_handler(Recorder::new("next", &log, HandlerResponse::Reply("no".to_string())));

    let result = chain.handle(&create_test_message(1, "x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(entries(&log), vec!["before_gate"]);
}

/// **Test: Stop from handle is passed to after like a Reply.**
#[tokio::test]
async fn test_stop_from_handle() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::new("only", &log, HandlerResponse::Stop));

    assert_eq!(chain.len(), 1);
    let result = chain.handle(&create_test_message(1, "x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(entries(&log).last().unwrap(), "after_only:stop");
}
