//! Node configuration, built from ROS command line arguments and the ROS
//! environment variables.
//!
//! Both argument dialects are understood:
//! - ros1: `from:=to` anywhere on the command line, with `__name`, `__ns`,
//!   `__master` and `__log_level` as special keys.
//! - ros2: a `--ros-args` section (closed by `--`) holding `-r`/`--remap`,
//!   `-p`/`--param`, `--params-file`, `-e`/`--enclave` and `--log-level`.

use crate::error::{ListenerError, ListenerResult};
use smart_default::SmartDefault;
use std::str::FromStr;
use std::time::Duration;

/// Default QoS depth, also used as the ros1 queue size.
pub const DEFAULT_QUEUE_SIZE: usize = 10;
pub const DEFAULT_ROSBRIDGE_URL: &str = "ws://localhost:9090";
pub const DEFAULT_NODE_NAME: &str = "listener";
pub const DEFAULT_TOPIC: &str = "joy";
/// How long startup waits for the transport before giving up.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which client library backend carries the subscription.
#[derive(SmartDefault, Debug, Clone, PartialEq)]
pub enum Backend {
    #[default]
    Rosbridge {
        #[default(DEFAULT_ROSBRIDGE_URL.to_string())]
        url: String,
    },
    Ros1 {
        master_uri: String,
    },
}

#[derive(SmartDefault, Debug, Clone, PartialEq)]
pub struct ListenerConfig {
    #[default(DEFAULT_NODE_NAME.to_string())]
    pub node_name: String,
    #[default("/".to_string())]
    pub namespace: String,
    /// Fully resolved topic name.
    #[default(format!("/{DEFAULT_TOPIC}"))]
    pub topic: String,
    #[default(DEFAULT_QUEUE_SIZE)]
    pub queue_size: usize,
    pub backend: Backend,
    #[default(DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,
    /// Overrides `RUST_LOG` when set.
    pub log_level: Option<log::LevelFilter>,
    /// Arguments that were accepted but have no effect on this node.
    pub ignored_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Remap {
    node: Option<String>,
    /// Set for `rosservice://` rules, which never touch a topic.
    service: bool,
    from: String,
    to: String,
    rule: String,
}

impl FromStr for Remap {
    type Err = ListenerError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let invalid = || ListenerError::InvalidRemap(rule.to_string());
        let (lhs, to) = rule.split_once(":=").ok_or_else(invalid)?;
        // [node:][rostopic://|rosservice://]from
        let (node, service, from) = match lhs.split_once("://") {
            Some((head, from)) => {
                let (node, scheme) = match head.rsplit_once(':') {
                    Some((node, scheme)) => (Some(node), scheme),
                    None => (None, head),
                };
                let service = match scheme {
                    "rostopic" => false,
                    "rosservice" => true,
                    _ => return Err(invalid()),
                };
                (node, service, from)
            }
            None => match lhs.split_once(':') {
                Some((node, from)) => (Some(node), false, from),
                None => (None, false, lhs),
            },
        };
        if node.is_some_and(str::is_empty) || from.is_empty() || to.is_empty() {
            return Err(invalid());
        }
        Ok(Remap {
            node: node.map(str::to_string),
            service,
            from: from.to_string(),
            to: to.to_string(),
            rule: rule.to_string(),
        })
    }
}

impl ListenerConfig {
    /// Builds the configuration from the program arguments (without argv[0]) and
    /// an environment lookup, usually `|key| std::env::var(key).ok()`.
    pub fn parse<I, S, E>(args: I, env: E) -> ListenerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = ListenerConfig::default();

        if let Some(url) = env("ROSBRIDGE_URL") {
            config.backend = Backend::Rosbridge { url };
        }
        if let Some(master_uri) = env("ROS_MASTER_URI") {
            if cfg!(feature = "ros1") {
                config.backend = Backend::Ros1 { master_uri };
            }
        }
        if let Some(namespace) = env("ROS_NAMESPACE") {
            config.namespace = normalize_namespace(&namespace);
        }

        let mut remaps: Vec<Remap> = Vec::new();
        let mut args = args.into_iter().map(Into::into);
        let mut in_ros_args = false;
        while let Some(arg) = args.next() {
            if in_ros_args {
                match arg.as_str() {
                    "--" => in_ros_args = false,
                    "--ros-args" => {}
                    "-r" | "--remap" => {
                        remaps.push(value_for(&arg, &mut args)?.parse::<Remap>()?)
                    }
                    "--log-level" => {
                        config.log_level = Some(parse_log_level(&value_for(&arg, &mut args)?)?)
                    }
                    "-p" | "--param" | "--params-file" | "-e" | "--enclave" => {
                        let value = value_for(&arg, &mut args)?;
                        config.ignored_args.push(format!("{arg} {value}"));
                    }
                    _ => return Err(ListenerError::UnknownRosArgument(arg)),
                }
            } else if arg == "--ros-args" {
                in_ros_args = true;
            } else if arg.contains(":=") {
                remaps.push(arg.parse::<Remap>()?);
            } else {
                config.ignored_args.push(arg);
            }
        }

        config.apply_remaps(remaps)?;
        Ok(config)
    }

    fn apply_remaps(&mut self, remaps: Vec<Remap>) -> ListenerResult<()> {
        // Special keys first, topic resolution depends on the final node name and namespace
        let mut topic_remaps = Vec::new();
        for remap in remaps {
            if remap.node.as_deref().is_some_and(|node| node != self.node_name) {
                self.ignored_args.push(remap.rule);
                continue;
            }
            match remap.from.as_str() {
                "__name" | "__node" => self.node_name = remap.to,
                "__ns" => self.namespace = normalize_namespace(&remap.to),
                "__master" => {
                    if !cfg!(feature = "ros1") {
                        return Err(ListenerError::Ros1Unavailable(remap.to));
                    }
                    self.backend = Backend::Ros1 {
                        master_uri: remap.to,
                    };
                }
                "__log_level" => self.log_level = Some(parse_log_level(&remap.to)?),
                special if special.starts_with("__") => self.ignored_args.push(remap.rule),
                _ => topic_remaps.push(remap),
            }
        }

        validate_node_name(&self.node_name)?;
        validate_name("namespace", &self.namespace)?;

        let default_topic = self.resolve(DEFAULT_TOPIC)?;
        let mut topic = default_topic.clone();
        for remap in topic_remaps {
            if remap.service {
                self.ignored_args.push(remap.rule);
                continue;
            }
            if self.resolve(&remap.from)? == default_topic {
                topic = self.resolve(&remap.to)?;
                break;
            }
        }
        self.topic = topic;
        Ok(())
    }

    /// Resolves a topic name against this node's namespace.
    pub fn resolve(&self, name: &str) -> ListenerResult<String> {
        let resolved = if name.starts_with('/') {
            name.to_string()
        } else if let Some(private) = name.strip_prefix('~') {
            let private = private.trim_start_matches('/');
            let base = join(&self.namespace, &self.node_name);
            if private.is_empty() {
                base
            } else {
                join(&base, private)
            }
        } else {
            join(&self.namespace, name)
        };
        validate_name("topic", &resolved)?;
        Ok(resolved)
    }

    /// Node name including its namespace, e.g. `/robot1/listener`.
    pub fn fully_qualified_node_name(&self) -> String {
        join(&self.namespace, &self.node_name)
    }
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> ListenerResult<String> {
    args.next()
        .ok_or_else(|| ListenerError::MissingArgument(flag.to_string()))
}

fn parse_log_level(level: &str) -> ListenerResult<log::LevelFilter> {
    if level.eq_ignore_ascii_case("fatal") {
        return Ok(log::LevelFilter::Error);
    }
    log::LevelFilter::from_str(level).map_err(|_| ListenerError::InvalidLogLevel(level.to_string()))
}

fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches('/');
    format!("/{trimmed}")
}

fn join(namespace: &str, name: &str) -> String {
    if namespace == "/" {
        format!("/{name}")
    } else {
        format!("{namespace}/{name}")
    }
}

fn is_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn validate_node_name(name: &str) -> ListenerResult<()> {
    if is_token(name) {
        Ok(())
    } else {
        Err(ListenerError::InvalidName {
            kind: "node",
            name: name.to_string(),
        })
    }
}

/// Checks an absolute, resolved name. The root namespace `/` is valid.
fn validate_name(kind: &'static str, name: &str) -> ListenerResult<()> {
    let valid = match name.strip_prefix('/') {
        Some("") => kind == "namespace",
        Some(rest) => rest.split('/').all(is_token),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ListenerError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}
