//! Provider connectivity checks.
//!
//! Every check is a local predicate over the credential map; no network
//! I/O happens here. A real deployment would swap these for API clients
//! behind the same trait without touching the tester's state handling.

use std::collections::HashMap;
use std::sync::Arc;

use crate::credentials::CredentialMap;
use crate::dto::TestResult;

pub trait ConnectionCheck: Send + Sync {
    /// Runs the provider check. `Err` means the check itself blew up;
    /// the tester records it the same way as a `success: false` result.
    fn check(&self, credentials: &CredentialMap) -> anyhow::Result<TestResult>;
}

/// Maps provider display names to their connectivity check. Providers
/// without an entry get an explicit "not implemented" result rather than
/// a silent fallthrough.
pub struct ConnectorRegistry {
    connectors: HashMap<&'static str, Arc<dyn ConnectionCheck>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        let mut connectors: HashMap<&'static str, Arc<dyn ConnectionCheck>> = HashMap::new();
        connectors.insert("Apollo", Arc::new(ApolloConnector));
        connectors.insert("LinkedIn", Arc::new(LinkedInConnector));
        connectors.insert("OpenAI", Arc::new(OpenAiConnector));
        connectors.insert("SendGrid", Arc::new(SendGridConnector));
        Self { connectors }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ConnectionCheck>> {
        self.connectors.get(name).cloned()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn present(credentials: &CredentialMap, key: &str) -> bool {
    credentials.get(key).is_some_and(|v| !v.is_empty())
}

struct ApolloConnector;

impl ConnectionCheck for ApolloConnector {
    fn check(&self, credentials: &CredentialMap) -> anyhow::Result<TestResult> {
        if !present(credentials, "apiKey") {
            return Ok(TestResult::failed("API key is required"));
        }
        Ok(TestResult::ok("Successfully connected to Apollo API"))
    }
}

struct LinkedInConnector;

impl ConnectionCheck for LinkedInConnector {
    fn check(&self, credentials: &CredentialMap) -> anyhow::Result<TestResult> {
        if !present(credentials, "apiKey") || !present(credentials, "apiSecret") {
            return Ok(TestResult::failed("API key and secret are required"));
        }
        Ok(TestResult::ok("Successfully connected to LinkedIn API"))
    }
}

struct OpenAiConnector;

impl ConnectionCheck for OpenAiConnector {
    fn check(&self, credentials: &CredentialMap) -> anyhow::Result<TestResult> {
        if !present(credentials, "apiKey") {
            return Ok(TestResult::failed("API key is required"));
        }
        Ok(TestResult::ok("Successfully connected to OpenAI API"))
    }
}

struct SendGridConnector;

impl ConnectionCheck for SendGridConnector {
    fn check(&self, credentials: &CredentialMap) -> anyhow::Result<TestResult> {
        if !present(credentials, "apiKey") {
            return Ok(TestResult::failed("API key is required"));
        }
        Ok(TestResult::ok("Successfully connected to SendGrid API"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> CredentialMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn registry_knows_implemented_providers() {
        let registry = ConnectorRegistry::new();
        for name in ["Apollo", "LinkedIn", "OpenAI", "SendGrid"] {
            assert!(registry.get(name).is_some(), "missing connector: {}", name);
        }
        assert!(registry.get("Crunchbase").is_none());
    }

    #[test]
    fn linkedin_requires_key_and_secret() {
        let connector = ConnectorRegistry::new().get("LinkedIn").unwrap();

        let result = connector.check(&map(&[("apiKey", "k")])).unwrap();
        assert!(!result.success);
        assert_eq!(result.message.unwrap(), "API key and secret are required");

        let result = connector
            .check(&map(&[("apiKey", "k"), ("apiSecret", "s")]))
            .unwrap();
        assert!(result.success);
    }

    #[test]
    fn apollo_rejects_blank_api_key() {
        let connector = ConnectorRegistry::new().get("Apollo").unwrap();
        let result = connector.check(&map(&[("apiKey", "")])).unwrap();
        assert!(!result.success);
    }
}
