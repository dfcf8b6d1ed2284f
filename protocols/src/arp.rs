use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::ethernet::{self, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS};

pub const ARP_LEN: usize = 28;

/// Sender of an ARP reply: the address that answered and its hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_addr: Ipv4Addr,
    pub sender_mac: MacAddr,
}

/// Builds a broadcast "who-has `dst_addr`" frame, padded to the Ethernet minimum.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);
    Ok(Vec::from(buffer))
}

/// Extracts the sender of an ARP reply.
///
/// Frames that are not ARP replies yield `Ok(None)`; a frame that claims to
/// be ARP but is too short is an error.
pub fn parse_reply(frame: &[u8]) -> anyhow::Result<Option<ArpReply>> {
    let Some(eth_frame) = EthernetPacket::new(frame) else {
        return Ok(None);
    };
    if eth_frame.get_ethertype() != EtherTypes::Arp {
        return Ok(None);
    }

    let arp_packet = ArpPacket::new(eth_frame.payload()).context(format!(
        "truncated or invalid ARP packet (payload len {})",
        eth_frame.payload().len()
    ))?;
    if arp_packet.get_operation() != ArpOperations::Reply {
        return Ok(None);
    }

    Ok(Some(ArpReply {
        sender_addr: arp_packet.get_sender_proto_addr(),
        sender_mac: arp_packet.get_sender_hw_addr(),
    }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
