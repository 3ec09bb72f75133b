use thiserror::Error;

/// Top-level error type for the skink workspace.
#[derive(Debug, Error)]
pub enum SkinkError {
    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Skeleton and chain construction errors.
///
/// All of these are fatal at character construction time: a half-built rig
/// has undefined chain invariants, so the character never starts. Numerical
/// edge cases (unreachable targets, degenerate directions) are NOT errors;
/// the solvers define fallback behavior for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RigError {
    #[error("Missing required joint role: {role}")]
    MissingJoint { role: String },

    #[error("Authored joint not found in skeleton: {name}")]
    UnknownAuthoredJoint { name: String },

    #[error("Skeleton has no joints")]
    EmptySkeleton,

    #[error("Joint {child} names unknown parent {parent}")]
    UnknownParent { child: String, parent: String },

    #[error("Chain {kind} resolves to {nodes} nodes; at least {min} required")]
    ChainTooShort {
        kind: String,
        nodes: usize,
        min: usize,
    },
}

/// Tuning/configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
