//! A ROS node that subscribes to a `sensor_msgs/Joy` topic and prints the raw
//! axis and button values of every sample it receives.
//!
//! The subscription is carried by [roslibrust](https://docs.rs/roslibrust), over
//! rosbridge by default or natively to a ros1 master with the `ros1` feature.

pub mod config;
pub mod error;
pub mod msgs;
pub mod node;
pub mod report;
pub mod transport;

pub use config::{Backend, ListenerConfig};
pub use error::{ListenerError, ListenerResult};
pub use node::{run, spin};
pub use report::{JoyPrinter, StreamFloat};
