use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Authoritative server speaking zone transfer and dynamic update (RFC 2136).
    Rfc2136,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rfc2136 => write!(f, "rfc2136"),
        }
    }
}

// ============ DNS Record Types ============

/// A DNS record as seen by callers of a [`DnsProvider`](crate::DnsProvider).
///
/// Records are transient: they are built by the caller (desired state) or decoded from a
/// server response (current state), and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Identity token for this exact record occurrence.
    ///
    /// The wire protocol has no record identifiers, so the token is derived from the
    /// record's absolute text form. Two records with identical name, TTL, type and data in
    /// the same zone share one token. Filled in on every record returned by a provider;
    /// when set on a record passed to `delete_records`, the record is rebuilt from it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    /// Record name relative to the zone (`"www"`, or `"@"` for the apex).
    ///
    /// Names ending with a dot are taken as already absolute.
    pub name: String,
    /// Record type mnemonic (e.g. `"A"`, `"TXT"`, `"MX"`).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Type-specific payload in zone-file syntax (e.g. `"10 mail.example.com."` for MX).
    pub data: String,
    /// Time to live. Sent on the wire as whole seconds.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
}

impl Record {
    /// Create a record without identity token.
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        data: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            record_type: record_type.into(),
            data: data.into(),
            ttl,
        }
    }

    /// Create a record that only carries an identity token, for deletion.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: String::new(),
            record_type: String::new(),
            data: String::new(),
            ttl: Duration::ZERO,
        }
    }
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single configuration field required by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable field key (e.g., `"server"`).
    pub key: String,
    /// Human-readable label (e.g., `"Server Address"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present.
    pub required: bool,
    /// Optional placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a DNS provider.
///
/// Obtain via [`DnsProvider::metadata()`](crate::DnsProvider::metadata) or
/// [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Configuration fields accepted by this provider.
    pub required_fields: Vec<ProviderCredentialField>,
}

// ============ Credential Types ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    InvalidFormat {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe configuration container for all supported DNS providers.
///
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate a provider.
///
/// # Serialization
///
/// Serialized as a tagged enum with `"provider"` as the tag and `"credentials"` as the content:
///
/// ```json
/// { "provider": "rfc2136", "credentials": { "server": "ns1.example.com:53", "tsig": "hmac-sha256:key:c2VjcmV0" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Dynamic update server.
    #[serde(rename = "rfc2136")]
    Rfc2136 {
        /// Server address, `host:port`.
        server: String,
        /// Optional transaction signature, `algorithm:keyname:base64secret`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tsig: Option<String>,
    },
}

impl ProviderCredentials {
    /// Construct credentials from a `HashMap`, validating required fields.
    ///
    /// Useful for deserializing credentials stored in a flat key-value format.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty.
    pub fn from_map(
        provider: &ProviderType,
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            ProviderType::Rfc2136 => {
                let server = Self::get_required_field(provider, map, "server", "Server Address")?;
                if !server.contains(':') {
                    return Err(CredentialValidationError::InvalidFormat {
                        provider: provider.clone(),
                        field: "server".to_string(),
                        label: "Server Address".to_string(),
                        reason: "expected host:port".to_string(),
                    });
                }
                // 空字符串视为匿名模式
                let tsig = map
                    .get("tsig")
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                Ok(Self::Rfc2136 { server, tsig })
            }
        }
    }

    /// Obtain required fields from `HashMap` and verify that it is not empty
    fn get_required_field(
        provider: &ProviderType,
        map: &std::collections::HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> std::collections::HashMap<String, String> {
        match self {
            Self::Rfc2136 { server, tsig } => {
                let mut map: std::collections::HashMap<String, String> =
                    [("server".to_string(), server.clone())].into();
                if let Some(tsig) = tsig {
                    map.insert("tsig".to_string(), tsig.clone());
                }
                map
            }
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Rfc2136 { .. } => ProviderType::Rfc2136,
        }
    }
}
