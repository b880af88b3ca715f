//! ssh_config(5) client keyword table
//!
//! Hand-made from the OpenSSH 8.x client options. Not every keyword's value
//! is typed as precisely as it could be; free-form values are strings.

/// The shape of value a keyword accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    /// `yes` / `no`
    Bool,
    /// One of a fixed set of lower-case choices
    Choice(&'static [&'static str]),
    /// May appear several times; one line per value
    List,
}

impl ValueKind {
    /// Human description used in validation messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Str => "a string".to_string(),
            Self::Int => "an integer".to_string(),
            Self::Bool => "yes or no".to_string(),
            Self::Choice(choices) => format!("one of {}", choices.join(", ")),
            Self::List => "a string".to_string(),
        }
    }
}

const ADDRESS_FAMILY: &[&str] = &["any", "inet", "inet6"];
const STRICT_HOST_KEY_CHECKING: &[&str] = &["yes", "accept-new", "no", "off", "ask"];
const TUNNEL: &[&str] = &["yes", "point-to-point", "ethernet", "no"];
const YES_NO_ASK: &[&str] = &["yes", "no", "ask"];

use ValueKind::{Bool, Choice, Int, List, Str};

/// Every keyword we accept in a template, with canonical casing.
pub static KEYWORDS: &[(&str, ValueKind)] = &[
    ("AddressFamily", Choice(ADDRESS_FAMILY)),
    ("BatchMode", Bool),
    ("BindAddress", Str),
    ("BindInterface", Str),
    ("CanonicalDomains", Str),
    ("CanonicalizeFallbackLocal", Bool),
    ("CanonicalizeHostname", Bool),
    ("CanonicalizeMaxDots", Int),
    ("CanonicalizePermittedCNAMEs", Str),
    ("CASignatureAlgorithms", Str),
    ("CertificateFile", Str),
    ("ChallengeResponseAuthentication", Bool),
    ("CheckHostIP", Bool),
    ("Ciphers", Str),
    ("ClearAllForwardings", Bool),
    ("Compression", Bool),
    ("ConnectionAttempts", Int),
    ("ConnectTimeout", Int),
    ("ControlMaster", Str),
    ("ControlPath", Str),
    ("ControlPersist", Str),
    ("DynamicForward", List),
    ("EnableSSHKeysign", Bool),
    ("EscapeChar", Str),
    ("ExitOnForwardFailure", Bool),
    ("FingerprintHash", Str),
    ("ForwardAgent", Bool),
    ("ForwardX11", Bool),
    ("ForwardX11Timeout", Str),
    ("ForwardX11Trusted", Bool),
    ("GatewayPorts", Bool),
    ("GlobalKnownHostsFile", Str),
    ("GSSAPIAuthentication", Bool),
    ("GSSAPIClientIdentity", Str),
    ("GSSAPIDelegateCredentials", Bool),
    ("GSSAPIKeyExchange", Bool),
    ("GSSAPIKexAlgorithms", Str),
    ("GSSAPIRenewalForcesRekey", Bool),
    ("GSSAPIServerIdentity", Str),
    ("GSSAPITrustDns", Bool),
    ("HashKnownHosts", Bool),
    ("HostbasedAuthentication", Bool),
    ("HostbasedKeyTypes", Str),
    ("HostKeyAlgorithms", Str),
    ("HostKeyAlias", Str),
    ("HostName", Str),
    ("IdentitiesOnly", Bool),
    ("IdentityAgent", Str),
    ("IdentityFile", Str),
    ("IgnoreUnknown", Str),
    ("Include", Str),
    ("IPQoS", Str),
    ("KbdInteractiveAuthentication", Bool),
    ("KbdInteractiveDevices", Str),
    ("KexAlgorithms", Str),
    ("LocalCommand", Str),
    ("LocalForward", List),
    ("LogLevel", Str),
    ("MACs", Str),
    ("NoHostAuthenticationForLocalhost", Bool),
    ("NumberOfPasswordPrompts", Int),
    ("PasswordAuthentication", Bool),
    ("PermitLocalCommand", Bool),
    ("PKCS11Provider", Str),
    ("Port", Int),
    ("PreferredAuthentications", Str),
    ("ProxyCommand", Str),
    ("ProxyJump", Str),
    ("ProxyUseFdpass", Bool),
    ("PubkeyAcceptedKeyTypes", Str),
    ("PubkeyAuthentication", Bool),
    ("RekeyLimit", Str),
    ("RemoteCommand", Str),
    ("RemoteForward", List),
    ("RequestTTY", Str),
    ("RevokedHostKeys", Str),
    ("SecurityKeyProvider", Str),
    ("SendEnv", List),
    ("ServerAliveCountMax", Int),
    ("ServerAliveInterval", Int),
    ("SetEnv", List),
    ("StreamLocalBindMask", Str),
    ("StreamLocalBindUnlink", Bool),
    ("StrictHostKeyChecking", Choice(STRICT_HOST_KEY_CHECKING)),
    ("SyslogFacility", Str),
    ("TCPKeepAlive", Bool),
    ("Tunnel", Choice(TUNNEL)),
    ("TunnelDevice", Str),
    ("UpdateHostKeys", Choice(YES_NO_ASK)),
    ("User", Str),
    ("UserKnownHostsFile", Str),
    ("VerifyHostKeyDNS", Choice(YES_NO_ASK)),
    ("VisualHostKey", Bool),
    ("XAuthLocation", Str),
];

/// Look up a keyword case-insensitively.
///
/// Returns its canonical casing and value kind.
pub fn lookup(keyword: &str) -> Option<(&'static str, ValueKind)> {
    KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
        .copied()
}

/// Whether `keyword` may be repeated with one value per line.
pub fn is_multi_valued(keyword: &str) -> bool {
    matches!(lookup(keyword), Some((_, ValueKind::List)))
}
