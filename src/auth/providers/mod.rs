//! Concrete credential sources, in the order the default chain tries them.

pub mod azure_cli;
pub mod client_secret;
pub mod managed_identity;
pub mod static_token;

pub use azure_cli::AzureCliCredential;
pub use client_secret::ClientSecretCredential;
pub use managed_identity::ManagedIdentityCredential;
pub use static_token::StaticTokenCredential;

/// Non-empty value of an environment-style variable.
pub(crate) fn lookup_non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Managed identity and CLI endpoints take a resource, not a scope.
pub(crate) fn scope_to_resource(scope: &str) -> &str {
    scope.strip_suffix("/.default").unwrap_or(scope)
}
