//! Terminal view for deploy progress

use std::net::IpAddr;
use tether_probe::DeployView;

/// Prints status lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleView {
    busy: bool,
}

impl DeployView for ConsoleView {
    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy {
            println!("Connecting...");
        }
        self.busy = busy;
    }

    fn set_status(&mut self, status: &str) {
        println!("  {}", status);
    }

    fn deployed(&mut self, address: IpAddr) {
        println!("Target reachable at {}", address);
    }
}
