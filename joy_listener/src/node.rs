use crate::config::{Backend, ListenerConfig};
use crate::error::{ListenerError, ListenerResult};
use crate::msgs::sensor_msgs::Joy;
use crate::report::JoyPrinter;
use crate::transport;
use futures::{Stream, StreamExt};
use std::future::Future;
use std::io::{self, Write};

/// Time given to the client library to unregister the subscription on shutdown.
const UNREGISTER_GRACE: tokio::time::Duration = tokio::time::Duration::from_millis(50);

/// The dispatch loop.
///
/// Hands every sample to `callback` in arrival order, one at a time, until
/// `shutdown` resolves. Returns how many samples were delivered. The loop has no
/// exit of its own: if `samples` runs dry the transport has dropped the
/// subscription and that is reported as [`ListenerError::SubscriptionClosed`].
pub async fn spin<S, C, F>(mut samples: S, mut callback: C, shutdown: F) -> ListenerResult<u64>
where
    S: Stream<Item = Joy> + Unpin,
    C: FnMut(&Joy) -> io::Result<()>,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut delivered: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::warn!("shutdown requested, exiting");
                return Ok(delivered);
            }
            msg = samples.next() => match msg {
                Some(msg) => {
                    log::trace!(
                        "sample {delivered}: {} axes, {} buttons",
                        msg.axes.len(),
                        msg.buttons.len()
                    );
                    callback(&msg)?;
                    delivered += 1;
                }
                None => return Err(ListenerError::SubscriptionClosed),
            }
        }
    }
}

/// Subscribes according to `config` and prints every sample to `out` until
/// `shutdown` resolves. Shutdown is honoured while still connecting too.
pub async fn run<W, F>(config: &ListenerConfig, out: W, shutdown: F) -> ListenerResult<u64>
where
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let node = config.fully_qualified_node_name();
    match &config.backend {
        Backend::Rosbridge { url } => log::info!("[{node}] using rosbridge at {url}"),
        Backend::Ros1 { master_uri } => log::info!("[{node}] using ros1 master {master_uri}"),
    }

    let samples = tokio::select! {
        samples = transport::subscribe(config) => samples?,
        _ = &mut shutdown => {
            log::warn!("shutdown requested before subscribing, exiting");
            return Ok(0);
        }
    };
    log::info!("[{node}] subscribed to {}", config.topic);

    let mut printer = JoyPrinter::new(out);
    let delivered = spin(samples, |msg| printer.print(msg), &mut shutdown).await?;

    log::info!("[{node}] done with subscribing after {delivered} samples, letting subscription unregister");
    tokio::time::sleep(UNREGISTER_GRACE).await;
    Ok(delivered)
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::stream;

    fn sample(axes: &[f32], buttons: &[i32]) -> Joy {
        Joy {
            axes: axes.to_vec(),
            buttons: buttons.to_vec(),
            ..Default::default()
        }
    }

    #[test_log::test(tokio::test)]
    async fn delivers_in_order_until_stream_closes() {
        let samples = stream::iter(vec![sample(&[1.0], &[]), sample(&[2.0], &[]), sample(&[3.0], &[])]);
        let mut seen = Vec::new();
        let result = spin(
            samples,
            |msg| {
                seen.push(msg.axes[0]);
                Ok(())
            },
            futures::future::pending(),
        )
        .await;
        assert!(matches!(result, Err(ListenerError::SubscriptionClosed)));
        assert_eq!(seen, vec![1.0, 2.0, 3.0]);
    }

    #[test_log::test(tokio::test)]
    async fn shutdown_stops_the_loop() {
        let result = spin(
            stream::pending::<Joy>(),
            |_| panic!("no samples expected"),
            futures::future::ready(()),
        )
        .await;
        assert_eq!(result.unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn shutdown_after_samples() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);
        let samples = stream::iter(vec![sample(&[], &[1]), sample(&[], &[0])]).chain(stream::pending());
        let mut delivered_buttons = Vec::new();
        let result = spin(
            samples,
            |msg| {
                delivered_buttons.extend_from_slice(&msg.buttons);
                if delivered_buttons.len() == 2 {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                }
                Ok(())
            },
            async {
                let _ = rx.await;
            },
        )
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(delivered_buttons, vec![1, 0]);
    }

    #[test_log::test(tokio::test)]
    async fn keeps_waiting_without_shutdown() {
        let looping = spin(
            stream::pending::<Joy>(),
            |_| Ok(()),
            futures::future::pending(),
        );
        let waited = tokio::time::timeout(tokio::time::Duration::from_millis(50), looping).await;
        assert!(waited.is_err(), "dispatch loop returned on its own");
    }

    #[test_log::test(tokio::test)]
    async fn callback_failure_propagates() {
        let samples = stream::iter(vec![sample(&[0.5], &[1])]).chain(stream::pending());
        let result = spin(
            samples,
            |_| Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed")),
            futures::future::pending(),
        )
        .await;
        assert!(matches!(result, Err(ListenerError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    fn refused_bridge() -> ListenerConfig {
        ListenerConfig {
            backend: Backend::Rosbridge {
                url: "ws://127.0.0.1:1".to_string(),
            },
            connect_timeout: tokio::time::Duration::from_millis(300),
            ..Default::default()
        }
    }

    #[test_log::test(tokio::test)]
    async fn run_fails_on_refused_bridge() {
        let mut out = Vec::new();
        let result = tokio::time::timeout(
            tokio::time::Duration::from_secs(10),
            run(&refused_bridge(), &mut out, futures::future::pending()),
        )
        .await
        .expect("run stayed in startup against a refused bridge");
        assert!(matches!(result, Err(ListenerError::Transport { .. })));
        assert!(out.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn run_honours_shutdown_while_connecting() {
        let config = ListenerConfig {
            connect_timeout: tokio::time::Duration::from_secs(30),
            ..refused_bridge()
        };
        let result = tokio::time::timeout(
            tokio::time::Duration::from_secs(10),
            run(&config, Vec::new(), futures::future::ready(())),
        )
        .await
        .expect("shutdown ignored during startup");
        assert_eq!(result.unwrap(), 0);
    }
}
