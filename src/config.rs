use std::net::SocketAddr;
use std::path::Path;

use crate::targets::Targets;
use crate::throttle::Throttle;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Everything an action needs at runtime, built once by the front-end.
#[derive(Debug, Clone)]
pub struct Config {
    pub targets: Targets,
    pub scan_throttle: Throttle,
    pub clean_throttle: Throttle,
    pub listen: SocketAddr,
}

impl Config {
    pub fn new(targets: Targets) -> Self {
        Config {
            targets,
            scan_throttle: Throttle::scan(),
            clean_throttle: Throttle::clean(),
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }

    /// Default cache directories under `base`, default throttling.
    pub fn for_base(base: &Path) -> Self {
        Config::new(Targets::defaults(base))
    }

    pub fn without_throttle(mut self) -> Self {
        self.scan_throttle = Throttle::disabled();
        self.clean_throttle = Throttle::disabled();
        self
    }

    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }
}
