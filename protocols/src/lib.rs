//! Encoders and decoders for the probes: ARP frames on the wire and the
//! textual replies printed by the system `ping` utility.

pub mod arp;
pub mod ethernet;
pub mod ping;
