//! Calculator JSON-RPC Example
//!
//! Registers a calculator receiver with positional and named methods, maps
//! its arithmetic errors to application codes, and runs a handful of single
//! and batch messages through the dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use jsonrpc_activator::prelude::*;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CalcError {
    Arithmetic,
    DivisionByZero,
    Overflow,
}

impl ErrorKind for CalcError {
    fn parent(&self) -> Option<Self> {
        match self {
            CalcError::Arithmetic => None,
            CalcError::DivisionByZero | CalcError::Overflow => Some(CalcError::Arithmetic),
        }
    }
}

/// Produced per call; shares the call counter.
struct Calculator {
    calls: Arc<AtomicU64>,
}

impl Calculator {
    fn record(&self) -> u64 {
        self.calls.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn bindings() -> Vec<MethodBinding<Calculator, CalcError>> {
    vec![
        MethodBinding::new("add")
            .param("a", ValueType::Integer)
            .param("b", ValueType::Integer)
            .returns(ValueType::Integer)
            .shapes([ParamsShape::Positional, ParamsShape::Named])
            .sync_handler(|calc: Calculator, args| {
                calc.record();
                args.get::<i64>(0)?
                    .checked_add(args.get::<i64>(1)?)
                    .ok_or_else(|| MethodFailure::raised(CalcError::Overflow, "add overflowed"))
            }),
        MethodBinding::new("subtract")
            .param("minuend", ValueType::Integer)
            .param("subtrahend", ValueType::Integer)
            .returns(ValueType::Integer)
            .shapes([ParamsShape::Named])
            .sync_handler(|calc: Calculator, args| {
                calc.record();
                Ok(args.get::<i64>(0)? - args.get::<i64>(1)?)
            }),
        MethodBinding::new("divide")
            .positional_param(ValueType::Number)
            .positional_param(ValueType::Number)
            .returns(ValueType::Number)
            .error_rule(CalcError::DivisionByZero, -32001, "Division by zero")
            .handler(|calc: Calculator, args| async move {
                calc.record();
                let divisor = args.get::<f64>(1)?;
                if divisor == 0.0 {
                    return Err(MethodFailure::raised(
                        CalcError::DivisionByZero,
                        "divisor was zero",
                    ));
                }
                Ok::<_, MethodFailure<CalcError>>(args.get::<f64>(0)? / divisor)
            }),
        MethodBinding::new("calls")
            .returns(ValueType::Integer)
            .sync_handler(|calc: Calculator, _| Ok(calc.calls.load(Ordering::Relaxed))),
        MethodBinding::new("reset")
            .void()
            .sync_handler(|calc: Calculator, _| {
                calc.calls.store(0, Ordering::Relaxed);
                Ok(())
            }),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jsonrpc_activator=debug,info")),
        )
        .init();

    let calls = Arc::new(AtomicU64::new(0));
    let dispatcher = JsonRpcDispatcher::builder()
        .register_receiver(
            ReceiverBindings::new(move || Calculator {
                calls: calls.clone(),
            })
            .error_rule(CalcError::Arithmetic, -32000, "Arithmetic error")
            .methods(bindings()),
        )
        .build()?;

    let messages = [
        r#"{"jsonrpc": "2.0", "method": "add", "params": [5, 3], "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 42, "subtrahend": 23}, "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "divide", "params": [1, 0], "id": 3}"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": [9223372036854775807, 1], "id": 4}"#,
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": [2, 3], "id": 5}"#,
        r#"{"jsonrpc": "2.0", "method": "reset"}"#,
        r#"[{"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 2}, "id": "a"},
            {"jsonrpc": "2.0", "method": "calls", "id": "b"},
            1]"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2"#,
    ];

    for message in messages {
        info!("request:  {}", message);
        match dispatcher.process_message(message).await {
            Some(response) => info!("response: {}", response),
            None => info!("response: <none>"),
        }
    }

    Ok(())
}
