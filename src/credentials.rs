use std::collections::HashMap;

use crate::dto::IntegrationType;

/// Free-form credential map. Key names follow the wire format used by the
/// settings UI: `apiKey`, `apiSecret`, `username`, `password`, `url`.
pub type CredentialMap = HashMap<String, String>;

/// Shallow-merges `partial` into `existing`: incoming keys overwrite, keys
/// absent from the update are retained. Applying the same partial twice is
/// a no-op the second time.
pub fn merge(existing: &mut CredentialMap, partial: &CredentialMap) {
    for (key, value) in partial {
        existing.insert(key.clone(), value.clone());
    }
}

/// Pure configuration predicate. Gates `is_configured` after every
/// credential merge, so the rules here must not drift from the providers'
/// minimum requirements.
pub fn is_valid(integration_type: IntegrationType, credentials: &CredentialMap) -> bool {
    match integration_type {
        IntegrationType::LeadSource | IntegrationType::Enrichment => has(credentials, "apiKey"),
        IntegrationType::Email => {
            has(credentials, "apiKey")
                || (has(credentials, "username") && has(credentials, "password"))
        }
    }
}

fn has(credentials: &CredentialMap, key: &str) -> bool {
    credentials.get(key).is_some_and(|v| !v.is_empty())
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
    fn merge_overwrites_incoming_and_keeps_existing() {
        let mut existing = map(&[("apiKey", "old"), ("url", "https://api.example.com")]);
        let partial = map(&[("apiKey", "new"), ("apiSecret", "s3cret")]);

        merge(&mut existing, &partial);

        assert_eq!(existing.get("apiKey").unwrap(), "new");
        assert_eq!(existing.get("apiSecret").unwrap(), "s3cret");
        assert_eq!(existing.get("url").unwrap(), "https://api.example.com");
    }

    #[test]
    fn merge_is_idempotent() {
        let mut once = map(&[("apiKey", "old")]);
        let partial = map(&[("apiKey", "new"), ("username", "u")]);

        merge(&mut once, &partial);
        let mut twice = once.clone();
        merge(&mut twice, &partial);

        assert_eq!(once, twice);
    }

    #[test]
    fn lead_source_requires_api_key() {
        assert!(!is_valid(IntegrationType::LeadSource, &map(&[])));
        assert!(!is_valid(IntegrationType::LeadSource, &map(&[("apiKey", "")])));
        assert!(is_valid(IntegrationType::LeadSource, &map(&[("apiKey", "k")])));
    }

    #[test]
    fn enrichment_requires_api_key() {
        assert!(!is_valid(IntegrationType::Enrichment, &map(&[("username", "u")])));
        assert!(is_valid(IntegrationType::Enrichment, &map(&[("apiKey", "k")])));
    }

    #[test]
    fn email_accepts_api_key_or_basic_credentials() {
        assert!(is_valid(IntegrationType::Email, &map(&[("apiKey", "x")])));
        assert!(!is_valid(IntegrationType::Email, &map(&[("username", "u")])));
        assert!(is_valid(
            IntegrationType::Email,
            &map(&[("username", "u"), ("password", "p")])
        ));
        assert!(!is_valid(
            IntegrationType::Email,
            &map(&[("username", "u"), ("password", "")])
        ));
    }
}
