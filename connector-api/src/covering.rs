//! Interface consumed by host integrations
//!
//! Accessory layers talk to a motor through this trait so they can be driven
//! by a real [`HubClient`] or by a test double.

use hub_transport::SocketFactory;

use crate::client::HubClient;
use crate::device::Operation;
use crate::error::Result;
use crate::response::{ReadAck, WriteAck};

/// A motorized window covering reachable through a hub
pub trait WindowCovering {
    fn get_device_state(&self) -> Result<ReadAck>;

    /// 0 is fully open, 100 fully closed
    fn set_target_position(&self, position: u8) -> Result<WriteAck>;

    fn set_target_angle(&self, angle: i32) -> Result<WriteAck>;

    fn set_open_close_state(&self, operation: Operation) -> Result<WriteAck>;
}

impl<F: SocketFactory> WindowCovering for HubClient<F> {
    fn get_device_state(&self) -> Result<ReadAck> {
        self.read_state()
    }

    fn set_target_position(&self, position: u8) -> Result<WriteAck> {
        self.set_position(position)
    }

    fn set_target_angle(&self, angle: i32) -> Result<WriteAck> {
        self.set_angle(angle)
    }

    fn set_open_close_state(&self, operation: Operation) -> Result<WriteAck> {
        self.set_operation(operation)
    }
}
