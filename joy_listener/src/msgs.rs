//! Message definitions for the topics this node touches.
//!
//! These mirror what `roslibrust_codegen` would generate for `std_msgs/Header` and
//! `sensor_msgs/Joy`, written out by hand so the node builds without a checkout of
//! the ROS interface packages. Field order matters: it is the TCPROS wire order.

pub mod std_msgs {
    use roslibrust_codegen::{RosMessageType, Time};

    /// Standard metadata for higher-level stamped data types.
    #[derive(:: serde :: Deserialize, :: serde :: Serialize, Debug, Default, Clone, PartialEq)]
    pub struct Header {
        // ROS2 dropped this field, bridges running ROS2 never send it
        #[serde(default)]
        pub seq: u32,
        pub stamp: Time,
        pub frame_id: String,
    }

    impl RosMessageType for Header {
        const ROS_TYPE_NAME: &'static str = "std_msgs/Header";
        const MD5SUM: &'static str = "2176decaecbce78abc3b96ef049fabed";
        const DEFINITION: &'static str = "uint32 seq\ntime stamp\nstring frame_id\n";
    }
}

pub mod sensor_msgs {
    use super::std_msgs::Header;
    use roslibrust_codegen::RosMessageType;

    /// Reports the state of a joystick's axes and buttons.
    ///
    /// `axes` and `buttons` are sized independently; either may be empty.
    #[derive(:: serde :: Deserialize, :: serde :: Serialize, Debug, Default, Clone, PartialEq)]
    pub struct Joy {
        #[serde(default)]
        pub header: Header,
        pub axes: Vec<f32>,
        pub buttons: Vec<i32>,
    }

    impl RosMessageType for Joy {
        const ROS_TYPE_NAME: &'static str = "sensor_msgs/Joy";
        const MD5SUM: &'static str = "5a9ea5f83505693b71e785041e67a8bb";
        // Sent in the TCPROS connection header, dependencies appended
        const DEFINITION: &'static str = concat!(
            "Header header\n",
            "float32[] axes\n",
            "int32[] buttons\n",
            "\n",
            "================================================================================\n",
            "MSG: std_msgs/Header\n",
            "uint32 seq\n",
            "time stamp\n",
            "string frame_id\n",
        );
    }
}
