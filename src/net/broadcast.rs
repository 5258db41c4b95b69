use crate::logging::{LogLevel, SsrpLogger};
use std::net::Ipv4Addr;

/// Directed broadcast address of `ip`'s subnet.
pub fn subnet_broadcast(ip: Ipv4Addr, prefix_len: u8) -> Ipv4Addr {
    let mask = prefix_mask(prefix_len);
    Ipv4Addr::from(u32::from(ip) | !mask)
}

fn prefix_mask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n if n >= 32 => u32::MAX,
        n => u32::MAX << (32 - n),
    }
}

/// Extracts `(address, prefix length)` pairs from `ip -4 addr show` output.
///
/// Both the multi-line and the `-o` one-line formats are accepted.
pub fn parse_ip_addr_output(output: &str) -> Vec<(Ipv4Addr, u8)> {
    let mut interfaces = Vec::new();

    for line in output.lines() {
        let mut words = line.split_whitespace();
        while let Some(word) = words.next() {
            if word != "inet" {
                continue;
            }
            let Some(cidr) = words.next() else {
                break;
            };
            let Some((addr, prefix)) = cidr.split_once('/') else {
                continue;
            };
            if let (Ok(addr), Ok(prefix)) = (addr.parse::<Ipv4Addr>(), prefix.parse::<u8>()) {
                if prefix <= 32 {
                    interfaces.push((addr, prefix));
                }
            }
        }
    }

    interfaces
}

/// One broadcast address per non-loopback interface, without duplicates.
///
/// The global broadcast address is skipped per interface, but used as the
/// only target when nothing else could be computed.
pub fn collect_broadcast_addresses(interfaces: &[(Ipv4Addr, u8)], logger: &dyn SsrpLogger) -> Vec<Ipv4Addr> {
    let mut addrs: Vec<Ipv4Addr> = Vec::new();

    for &(ip, prefix_len) in interfaces {
        if ip.is_loopback() || ip.is_unspecified() {
            continue;
        }
        let broadcast_ip = subnet_broadcast(ip, prefix_len);
        if broadcast_ip == Ipv4Addr::BROADCAST || addrs.contains(&broadcast_ip) {
            continue;
        }
        logger.log(
            LogLevel::Info,
            "Net",
            &format!("interface {} | ~{} = {}", ip, Ipv4Addr::from(prefix_mask(prefix_len)), broadcast_ip),
        );
        addrs.push(broadcast_ip);
    }

    if addrs.is_empty() {
        logger.log(LogLevel::Info, "Net", &format!("global (broadcast:{})", Ipv4Addr::BROADCAST));
        addrs.push(Ipv4Addr::BROADCAST);
    }

    addrs
}

/// Prefix length of a contiguous netmask, e.g. 255.255.240.0 -> 20.
pub fn netmask_prefix(netmask: Ipv4Addr) -> u8 {
    u32::from(netmask).leading_ones() as u8
}

/// `(address, prefix length)` pairs from `(address, netmask)` pairs.
pub fn with_prefix_lengths<I>(addrs: I) -> Vec<(Ipv4Addr, u8)>
where
    I: IntoIterator<Item = (Ipv4Addr, Ipv4Addr)>,
{
    addrs.into_iter().map(|(ip, netmask)| (ip, netmask_prefix(netmask))).collect()
}

/// Enumerates local IPv4 interfaces with their prefix lengths.
///
/// Linux asks `ip` first; when it is missing (e.g. in containers) the
/// portable `if_addrs` enumeration is used.
#[cfg(target_os = "linux")]
fn local_interfaces(logger: &dyn SsrpLogger) -> Vec<(Ipv4Addr, u8)> {
    use std::process::Command;

    match Command::new("ip").args(["-4", "-o", "addr", "show"]).output() {
        Ok(output) if output.status.success() => parse_ip_addr_output(&String::from_utf8_lossy(&output.stdout)),
        Ok(output) => {
            logger.log(LogLevel::Debug, "Net", &format!("'ip' exited with {}, using if_addrs", output.status));
            portable_interfaces(logger)
        }
        Err(e) => {
            logger.log(LogLevel::Debug, "Net", &format!("'ip' command not available ({}), using if_addrs", e));
            portable_interfaces(logger)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn local_interfaces(logger: &dyn SsrpLogger) -> Vec<(Ipv4Addr, u8)> {
    portable_interfaces(logger)
}

fn portable_interfaces(logger: &dyn SsrpLogger) -> Vec<(Ipv4Addr, u8)> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(ifs) => ifs,
        Err(e) => {
            logger.log(LogLevel::Debug, "Net", &format!("failed to list network interfaces: {}", e));
            return Vec::new();
        }
    };

    with_prefix_lengths(interfaces.into_iter().filter_map(|iface| match iface.addr {
        if_addrs::IfAddr::V4(v4) => Some((v4.ip, v4.netmask)),
        if_addrs::IfAddr::V6(_) => None,
    }))
}

/// Broadcast targets for a LAN sweep. `overrides` wins when non-empty.
pub fn broadcast_addresses(overrides: &[Ipv4Addr], logger: &dyn SsrpLogger) -> Vec<Ipv4Addr> {
    if !overrides.is_empty() {
        let mut addrs = Vec::with_capacity(overrides.len());
        for addr in overrides {
            if !addrs.contains(addr) {
                addrs.push(*addr);
            }
        }
        logger.log(LogLevel::Debug, "Net", &format!("using configured broadcast addresses {:?}", addrs));
        return addrs;
    }

    collect_broadcast_addresses(&local_interfaces(logger), logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;

    const IP_ADDR_O: &str = "\
1: lo    inet 127.0.0.1/8 scope host lo\\       valid_lft forever preferred_lft forever
2: eth0    inet 192.168.1.20/24 brd 192.168.1.255 scope global dynamic eth0\\       valid_lft 86000sec preferred_lft 86000sec
3: wlan0    inet 10.20.30.40/16 brd 10.20.255.255 scope global wlan0\\       valid_lft forever preferred_lft forever
4: eth1    inet 192.168.1.21/24 brd 192.168.1.255 scope global eth1\\       valid_lft forever preferred_lft forever
";

    const IP_ADDR: &str = "\
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP group default qlen 1000
    inet 172.17.5.9/20 brd 172.17.15.255 scope global eth0
       valid_lft forever preferred_lft forever
";

    #[test]
    fn test_subnet_broadcast() {
        assert_eq!(subnet_broadcast(Ipv4Addr::new(192, 168, 1, 20), 24), Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(subnet_broadcast(Ipv4Addr::new(10, 20, 30, 40), 16), Ipv4Addr::new(10, 20, 255, 255));
        assert_eq!(subnet_broadcast(Ipv4Addr::new(172, 17, 5, 9), 20), Ipv4Addr::new(172, 17, 15, 255));
        assert_eq!(subnet_broadcast(Ipv4Addr::new(10, 0, 0, 1), 32), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(subnet_broadcast(Ipv4Addr::new(10, 0, 0, 1), 0), Ipv4Addr::BROADCAST);
    }

    #[test]
    fn test_parse_one_line_format() {
        let interfaces = parse_ip_addr_output(IP_ADDR_O);
        assert_eq!(
            interfaces,
            vec![
                (Ipv4Addr::new(127, 0, 0, 1), 8),
                (Ipv4Addr::new(192, 168, 1, 20), 24),
                (Ipv4Addr::new(10, 20, 30, 40), 16),
                (Ipv4Addr::new(192, 168, 1, 21), 24),
            ]
        );
    }

    #[test]
    fn test_parse_multi_line_format() {
        assert_eq!(parse_ip_addr_output(IP_ADDR), vec![(Ipv4Addr::new(172, 17, 5, 9), 20)]);
        assert!(parse_ip_addr_output("garbage\ninet\ninet notanaddr/24").is_empty());
    }

    #[test]
    fn test_collect_skips_loopback_and_duplicates() {
        let logger = MemoryLogger::new();
        let addrs = collect_broadcast_addresses(&parse_ip_addr_output(IP_ADDR_O), &*logger);
        assert_eq!(addrs, vec![Ipv4Addr::new(192, 168, 1, 255), Ipv4Addr::new(10, 20, 255, 255)]);
        assert_eq!(logger.count_matching("interface 192.168.1.20 | ~255.255.255.0 = 192.168.1.255"), 1);
    }

    #[test]
    fn test_collect_falls_back_to_global() {
        let logger = MemoryLogger::new();
        let addrs = collect_broadcast_addresses(&[(Ipv4Addr::LOCALHOST, 8), (Ipv4Addr::new(10, 0, 0, 1), 0)], &*logger);
        assert_eq!(addrs, vec![Ipv4Addr::BROADCAST]);
        assert_eq!(logger.count_matching("global"), 1);
    }

    #[test]
    fn test_overrides_win() {
        let logger = MemoryLogger::new();
        let overrides = [Ipv4Addr::new(10, 1, 1, 255), Ipv4Addr::new(10, 1, 1, 255), Ipv4Addr::LOCALHOST];
        assert_eq!(
            broadcast_addresses(&overrides, &*logger),
            vec![Ipv4Addr::new(10, 1, 1, 255), Ipv4Addr::LOCALHOST]
        );
    }

    #[test]
    fn test_netmask_prefix() {
        assert_eq!(netmask_prefix(Ipv4Addr::new(255, 255, 255, 0)), 24);
        assert_eq!(netmask_prefix(Ipv4Addr::new(255, 255, 240, 0)), 20);
        assert_eq!(netmask_prefix(Ipv4Addr::new(255, 0, 0, 0)), 8);
        assert_eq!(netmask_prefix(Ipv4Addr::BROADCAST), 32);
        assert_eq!(netmask_prefix(Ipv4Addr::UNSPECIFIED), 0);
    }

    #[test]
    fn test_collect_from_netmask_pairs() {
        let logger = MemoryLogger::new();
        let interfaces = with_prefix_lengths([
            (Ipv4Addr::LOCALHOST, Ipv4Addr::new(255, 0, 0, 0)),
            (Ipv4Addr::new(192, 168, 56, 1), Ipv4Addr::new(255, 255, 255, 0)),
            (Ipv4Addr::new(172, 17, 5, 9), Ipv4Addr::new(255, 255, 240, 0)),
        ]);
        assert_eq!(interfaces[1], (Ipv4Addr::new(192, 168, 56, 1), 24));

        let addrs = collect_broadcast_addresses(&interfaces, &*logger);
        assert_eq!(addrs, vec![Ipv4Addr::new(192, 168, 56, 255), Ipv4Addr::new(172, 17, 15, 255)]);
        assert_eq!(logger.count_matching("interface 172.17.5.9 | ~255.255.240.0 = 172.17.15.255"), 1);
    }

    #[test]
    fn test_portable_interfaces_are_well_formed() {
        let logger = MemoryLogger::new();
        for (_, prefix_len) in portable_interfaces(&*logger) {
            assert!(prefix_len <= 32);
        }
    }

    #[test]
    fn test_broadcast_addresses_never_empty() {
        let logger = MemoryLogger::new();
        assert!(!broadcast_addresses(&[], &*logger).is_empty());
    }
}
