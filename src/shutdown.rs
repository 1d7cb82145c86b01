use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::TERM_SIGNALS;

/// Set when the process is asked to stop (SIGTERM, SIGINT, SIGQUIT, and
/// SIGHUP when the terminal goes away). The handler only raises the flag;
/// the event loop notices it and saves before exiting.
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn install() -> io::Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        for &sig in TERM_SIGNALS {
            signal_hook::flag::register(sig, Arc::clone(&flag))?;
        }
        #[cfg(unix)]
        signal_hook::flag::register(signal_hook::consts::SIGHUP, Arc::clone(&flag))?;
        Ok(Self { flag })
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
