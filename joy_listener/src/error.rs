use thiserror::Error;

/// Everything that can stop the listener, from argument parsing to the dispatch loop.
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("ROS argument {0} expects a value")]
    MissingArgument(String),
    #[error("unknown ROS argument: {0}")]
    UnknownRosArgument(String),
    #[error("invalid remapping rule '{0}', expected from:=to")]
    InvalidRemap(String),
    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },
    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
    #[error("a ros1 master was requested ({0}) but this build lacks the 'ros1' feature")]
    Ros1Unavailable(String),
    /// Failure reported by the client library while setting up the subscription.
    #[error("failed to {stage}: {message}")]
    Transport { stage: &'static str, message: String },
    #[error("the transport closed the subscription")]
    SubscriptionClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ListenerError {
    pub(crate) fn transport(stage: &'static str, err: impl std::fmt::Display) -> Self {
        ListenerError::Transport {
            stage,
            message: err.to_string(),
        }
    }
}

pub type ListenerResult<T> = Result<T, ListenerError>;
