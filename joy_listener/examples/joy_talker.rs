//! Publishes a synthetic joystick on /joy so the listener has something to print.

#[cfg(feature = "ros1")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use joy_listener::msgs::sensor_msgs::Joy;
    use roslibrust::ros1::NodeHandle;

    env_logger::init();

    let nh = NodeHandle::new("http://localhost:11311", "joy_talker").await?;
    let publisher = nh.advertise::<Joy>("/joy", 1, false).await?;

    let mut count: u32 = 0;
    loop {
        let mut msg = Joy::default();
        msg.header.seq = count;
        let time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time went backwards");
        msg.header.stamp = roslibrust_codegen::Time {
            secs: time.as_secs() as u32,
            nsecs: time.subsec_nanos(),
        };
        msg.header.frame_id = "joy".to_string();
        // One stick sweeping a circle, a button toggling once a second
        let phase = (count as f32) / 20.0;
        msg.axes = vec![phase.cos(), phase.sin()];
        msg.buttons = vec![((count / 10) % 2) as i32, 0];
        publisher.publish(&msg).await?;
        log::debug!("published sample {count}");
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        count += 1;
    }
}

#[cfg(not(feature = "ros1"))]
fn main() {
    eprintln!("This example does nothing without compiling with the feature 'ros1'");
}
