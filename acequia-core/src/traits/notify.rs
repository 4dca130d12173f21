//! Notification sink trait

use crate::channel::{Channel, ChannelStatus};
use crate::events::Condition;

/// Observability seam toward the surrounding layers
///
/// Every accepted relay transition and every safety condition is
/// reported through this trait. Implementations forward the records to
/// whatever the platform provides (log file, serial console, MQTT
/// publish); the core never formats or transports them itself.
/// Callbacks run inside the tick path and must not block.
pub trait EventSink {
    /// A channel changed state
    fn relay_changed(&mut self, channel: Channel, status: ChannelStatus);

    /// A safety or scheduling condition occurred
    fn condition(&mut self, condition: Condition);
}
