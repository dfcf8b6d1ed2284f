use colored::*;

use crate::terminal::{colors, print};
use netdiag_common::network::range::DiscoveryRange;

pub fn range(prefix: DiscoveryRange) {
    print::header(&format!("hosts of {prefix}"), 0);
    for (idx, addr) in prefix.hosts().enumerate() {
        let idx: ColoredString = format!("[{idx:>3}]").color(colors::ACCENT);
        print::print(&format!("{idx} {}", addr.to_string().color(colors::IPV4_ADDR)));
    }
    print::fat_separator();
    print::print_status(format!("{} usable addresses", prefix.host_count()));
}
