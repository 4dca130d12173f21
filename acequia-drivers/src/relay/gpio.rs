//! GPIO relay bank
//!
//! Drives the pump and valve relays via GPIO pins. Relay boards come in
//! active-high and active-low flavors, sometimes mixed on one
//! controller (the reference hardware switches the pump active-high and
//! the valves active-low), so polarity is configured per pin.

use acequia_core::channel::{Channel, NUM_VALVES};
use acequia_core::traits::RelayBank;
use embedded_hal::digital::OutputPin;

/// One relay output with its polarity
pub struct RelayPin<P> {
    pin: P,
    /// If true, the relay is energized when the pin is low
    active_low: bool,
}

impl<P: OutputPin> RelayPin<P> {
    /// Create an active-high relay output
    pub fn active_high(pin: P) -> Self {
        let mut relay = Self {
            pin,
            active_low: false,
        };
        relay.drive(false);
        relay
    }

    /// Create an active-low relay output
    pub fn active_low(pin: P) -> Self {
        let mut relay = Self {
            pin,
            active_low: true,
        };
        relay.drive(false);
        relay
    }

    fn drive(&mut self, on: bool) {
        if on != self.active_low {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
    }
}

/// Relay bank over plain GPIO pins
///
/// Channels without a pin are simply absent; the interlock never
/// commands them, and a stray command is ignored.
pub struct GpioRelayBank<P> {
    pump: Option<RelayPin<P>>,
    valves: [Option<RelayPin<P>>; NUM_VALVES],
}

impl<P: OutputPin> GpioRelayBank<P> {
    /// Create a bank; every present output starts released
    pub fn new(pump: Option<RelayPin<P>>, valves: [Option<RelayPin<P>>; NUM_VALVES]) -> Self {
        Self { pump, valves }
    }
}

impl<P: OutputPin> RelayBank for GpioRelayBank<P> {
    fn set_output(&mut self, channel: Channel, on: bool) {
        let relay = match channel {
            Channel::Pump => self.pump.as_mut(),
            Channel::Valve(v) => self.valves.get_mut(v as usize).and_then(Option::as_mut),
        };
        if let Some(relay) = relay {
            relay.drive(on);
        }
    }
}
