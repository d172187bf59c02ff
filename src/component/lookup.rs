use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::driver::ElementHandle;
use crate::error::Result;

/// Zero-argument async function producing a live handle.
///
/// Called anew on every resolution; it must not cache its result.
#[derive(Clone)]
pub struct Resolver(Arc<dyn Fn() -> BoxFuture<'static, Result<ElementHandle>> + Send + Sync>);

impl Resolver {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ElementHandle>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(f())))
    }

    pub fn call(&self) -> BoxFuture<'static, Result<ElementHandle>> {
        (self.0)()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// How a component finds its elements.
#[derive(Clone, Debug)]
pub enum Lookup {
    Resolver(Resolver),
    Selector(String),
    Text(String),
}

/// Lookup settings accepted by component constructors.
///
/// Several strategies may be set; the one used is picked by priority:
/// resolver, then selector, then text. Empty strings count as unset.
#[derive(Clone, Debug, Default)]
pub struct LookupOptions {
    pub selector: Option<String>,
    pub text: Option<String>,
    pub resolver: Option<Resolver>,
}

impl LookupOptions {
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::default().with_selector(selector)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::default().with_text(text)
    }

    pub fn resolver(resolver: Resolver) -> Self {
        Self::default().with_resolver(resolver)
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The single strategy these options select, if any.
    pub fn into_lookup(self) -> Option<Lookup> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        if let Some(resolver) = self.resolver {
            Some(Lookup::Resolver(resolver))
        } else if let Some(selector) = non_empty(self.selector) {
            Some(Lookup::Selector(selector))
        } else {
            non_empty(self.text).map(Lookup::Text)
        }
    }
}

impl From<&str> for LookupOptions {
    fn from(selector: &str) -> Self {
        Self::selector(selector)
    }
}

impl From<String> for LookupOptions {
    fn from(selector: String) -> Self {
        Self::selector(selector)
    }
}

impl From<Resolver> for LookupOptions {
    fn from(resolver: Resolver) -> Self {
        Self::resolver(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_resolver() -> Resolver {
        Resolver::new(|| async { Ok(ElementHandle::new("r", 0, "resolver")) })
    }

    #[test]
    fn test_resolver_wins_over_everything() {
        let options = LookupOptions::selector("#a")
            .with_text("A")
            .with_resolver(empty_resolver());
        assert!(matches!(options.into_lookup(), Some(Lookup::Resolver(_))));
    }

    #[test]
    fn test_selector_wins_over_text() {
        let lookup = LookupOptions::text("Sign in").with_selector("#login").into_lookup();
        assert!(matches!(lookup, Some(Lookup::Selector(s)) if s == "#login"));
    }

    #[test]
    fn test_empty_selector_falls_back_to_text() {
        let lookup = LookupOptions::selector("").with_text("Sign in").into_lookup();
        assert!(matches!(lookup, Some(Lookup::Text(t)) if t == "Sign in"));
    }

    #[test]
    fn test_nothing_set() {
        assert!(LookupOptions::default().into_lookup().is_none());
        assert!(LookupOptions::from("").into_lookup().is_none());
    }

    #[tokio::test]
    async fn test_resolver_called_each_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let resolver = Resolver::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(ElementHandle::new(format!("r{}", n), 1, "resolver")) }
        });
        assert_eq!(resolver.call().await.unwrap().key(), "r0");
        assert_eq!(resolver.call().await.unwrap().key(), "r1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
