//! Lifecycle integration tests
//!
//! Drives a minimal context implementation through the full
//! connect/disconnect contract with a counting mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tether_context::async_trait;
use tether_context::prelude::*;

/// What the mock provider should do on each open call.
#[derive(Clone, Copy)]
enum Plan {
    Succeed,
    /// Fail with a transient connectivity error this many times, then
    /// succeed.
    TransientThenSucceed(usize),
    FailPermanent,
}

struct MockProvider {
    plan: Plan,
    opens: Arc<AtomicUsize>,
}

impl MockProvider {
    fn new(plan: Plan) -> Self {
        Self {
            plan,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct MockHandle;

#[async_trait]
impl ProviderHandle for MockHandle {
    async fn close(&mut self) -> ContextResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    type Handle = MockHandle;

    async fn open(&self, _url: &str, _env: &Environment) -> ContextResult<Self::Handle> {
        let attempt = self.opens.fetch_add(1, Ordering::SeqCst);
        match self.plan {
            Plan::Succeed => Ok(MockHandle),
            Plan::TransientThenSucceed(failures) if attempt < failures => {
                Err(ContextError::connectivity("target unavailable"))
            }
            Plan::TransientThenSucceed(_) => Ok(MockHandle),
            Plan::FailPermanent => Err(ContextError::authentication("rejected")),
        }
    }
}

/// Minimal context over the core building blocks: descriptor validation,
/// environment construction, retry-driven open, best-effort release.
struct GenericContext {
    id: ContextId,
    descriptor: ConnectionDescriptor,
    retry: RetryPolicy,
    provider: MockProvider,
    handle: Option<MockHandle>,
}

impl GenericContext {
    fn new(descriptor: ConnectionDescriptor, retry: RetryPolicy, provider: MockProvider) -> Self {
        Self {
            id: ContextId::new(),
            descriptor,
            retry,
            provider,
            handle: None,
        }
    }

    fn environment(&self) -> Environment {
        let mut env = Environment::new();
        if let Some(principal) = &self.descriptor.principal {
            env.insert(keys::SECURITY_PRINCIPAL, principal.name());
            env.insert(keys::SECURITY_CREDENTIALS, principal.credential());
        }
        env
    }
}

#[async_trait]
impl ConnectionContext for GenericContext {
    fn context_type(&self) -> ContextType {
        ContextType::Rmi
    }

    fn id(&self) -> ContextId {
        self.id
    }

    fn validate(&self) -> ContextResult<()> {
        self.descriptor.validate_with_principal()
    }

    fn service_url(&self) -> ContextResult<String> {
        self.descriptor.service_url()
    }

    fn established(&self) -> bool {
        self.handle.is_some()
    }

    async fn connect(&mut self) -> ContextResult<()> {
        if self.established() {
            return Ok(());
        }
        self.validate()?;
        let url = self.service_url()?;
        let environment = self.environment();
        let handle = self
            .retry
            .run(|| self.provider.open(&url, &environment))
            .await?;
        self.handle = Some(handle);
        Ok(())
    }

    async fn disconnect(&mut self) -> ContextResult<()> {
        release_handle(self.id, &mut self.handle).await;
        Ok(())
    }
}

fn valid_descriptor() -> ConnectionDescriptor {
    ConnectionDescriptor::new("t3", "wls.example.com", 7001)
        .with_principal(SecurityPrincipal::new("weblogic", "secret"))
}

#[tokio::test]
async fn invalid_descriptor_never_reaches_the_provider() {
    let mut bad = valid_descriptor();
    bad.host = String::new();

    let mut context =
        GenericContext::new(bad, RetryPolicy::once(), MockProvider::new(Plan::Succeed));
    let err = context.connect().await.expect_err("must fail");

    assert_eq!(err.error_code(), "INVALID_CONFIG");
    assert_eq!(context.provider.opens(), 0);
    assert!(!context.established());
}

#[tokio::test]
async fn missing_principal_never_reaches_the_provider() {
    let mut bad = valid_descriptor();
    bad.principal = None;

    let mut context =
        GenericContext::new(bad, RetryPolicy::once(), MockProvider::new(Plan::Succeed));
    assert!(context.connect().await.is_err());
    assert_eq!(context.provider.opens(), 0);
}

#[tokio::test]
async fn connect_then_disconnect_round_trip() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::once(),
        MockProvider::new(Plan::Succeed),
    );

    context.connect().await.expect("connects");
    assert!(context.established());

    context.disconnect().await.expect("disconnects");
    assert!(!context.established());
}

#[tokio::test]
async fn connect_is_idempotent_once_established() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::once(),
        MockProvider::new(Plan::Succeed),
    );

    context.connect().await.expect("connects");
    context.connect().await.expect("still fine");
    assert_eq!(context.provider.opens(), 1);
}

#[tokio::test]
async fn double_disconnect_is_safe() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::once(),
        MockProvider::new(Plan::Succeed),
    );

    context.connect().await.expect("connects");
    context.disconnect().await.expect("first disconnect");
    context.disconnect().await.expect("second disconnect is a no-op");
    assert!(!context.established());
}

#[tokio::test]
async fn transient_failures_consume_the_budget_then_succeed() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::new(3, 1),
        MockProvider::new(Plan::TransientThenSucceed(2)),
    );

    context.connect().await.expect("third attempt succeeds");
    assert!(context.established());
    assert_eq!(context.provider.opens(), 3);
}

#[tokio::test]
async fn permanent_failure_is_not_retried() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::new(3, 1),
        MockProvider::new(Plan::FailPermanent),
    );

    let err = context.connect().await.expect_err("must fail");
    assert_eq!(err.error_code(), "AUTH_FAILED");
    assert_eq!(context.provider.opens(), 1);
    assert!(!context.established());
}

#[tokio::test]
async fn failed_connect_leaves_context_disconnected() {
    let mut context = GenericContext::new(
        valid_descriptor(),
        RetryPolicy::new(2, 1),
        MockProvider::new(Plan::TransientThenSucceed(5)),
    );

    assert!(context.connect().await.is_err());
    assert!(!context.established());
    assert_eq!(context.provider.opens(), 2);
}
