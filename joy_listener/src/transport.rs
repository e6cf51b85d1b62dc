//! Subscription setup on top of roslibrust.
//!
//! Each backend hands back the same boxed stream of samples so the dispatch loop
//! doesn't care which one is carrying the topic.

use crate::config::{Backend, ListenerConfig};
use crate::error::{ListenerError, ListenerResult};
use crate::msgs::sensor_msgs::Joy;
use futures::stream::BoxStream;

/// Samples in arrival order. The stream ending means the subscription is gone.
pub type JoyStream = BoxStream<'static, Joy>;

/// Connects to the configured backend and subscribes to the configured topic.
pub async fn subscribe(config: &ListenerConfig) -> ListenerResult<JoyStream> {
    match &config.backend {
        Backend::Rosbridge { url } => {
            rosbridge::subscribe(url, &config.topic, config.connect_timeout).await
        }
        #[cfg(feature = "ros1")]
        Backend::Ros1 { master_uri } => {
            ros1::subscribe(
                master_uri,
                &config.fully_qualified_node_name(),
                &config.topic,
                config.queue_size,
                config.connect_timeout,
            )
            .await
        }
        #[cfg(not(feature = "ros1"))]
        Backend::Ros1 { master_uri } => Err(ListenerError::Ros1Unavailable(master_uri.clone())),
    }
}

mod rosbridge {
    use super::*;
    use futures::StreamExt;
    use roslibrust::{ClientHandle, ClientHandleOptions};
    use std::time::Duration;

    pub(super) async fn subscribe(
        url: &str,
        topic: &str,
        connect_timeout: Duration,
    ) -> ListenerResult<JoyStream> {
        log::debug!("connecting to rosbridge at {url}");
        // Without a timeout the client retries a refused connection forever
        let options = ClientHandleOptions::new(url).timeout(connect_timeout);
        let client = ClientHandle::new_with_options(options)
            .await
            .map_err(|e| ListenerError::transport("connect to rosbridge", e))?;
        let subscriber = client
            .subscribe::<Joy>(topic)
            .await
            .map_err(|e| ListenerError::transport("subscribe", e))?;

        // The client is kept alongside the subscriber so the connection lives as
        // long as the stream does
        let samples = futures::stream::unfold((client, subscriber), |(client, subscriber)| async move {
            let msg = subscriber.next().await;
            Some((msg, (client, subscriber)))
        });
        Ok(samples.boxed())
    }
}

#[cfg(feature = "ros1")]
mod ros1 {
    use super::*;
    use futures::StreamExt;
    use roslibrust::ros1::NodeHandle;

    pub(super) async fn subscribe(
        master_uri: &str,
        node_name: &str,
        topic: &str,
        queue_size: usize,
        connect_timeout: std::time::Duration,
    ) -> ListenerResult<JoyStream> {
        log::debug!("registering {node_name} with the ros1 master at {master_uri}");
        let stage = "register with the ros1 master";
        let nh = tokio::time::timeout(connect_timeout, NodeHandle::new(master_uri, node_name))
            .await
            .map_err(|e| ListenerError::transport(stage, e))?
            .map_err(|e| ListenerError::transport(stage, e))?;
        let subscriber = nh
            .subscribe::<Joy>(topic, queue_size)
            .await
            .map_err(|e| ListenerError::transport("subscribe", e))?;

        let samples = futures::stream::unfold((nh, subscriber), |(nh, mut subscriber)| async move {
            loop {
                match subscriber.next().await? {
                    Ok(msg) => return Some((msg, (nh, subscriber))),
                    Err(e) => log::warn!("dropping sample that failed to arrive: {e}"),
                }
            }
        });
        Ok(samples.boxed())
    }
}
