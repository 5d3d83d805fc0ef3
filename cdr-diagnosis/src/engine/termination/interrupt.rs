use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use signal_hook::consts::TERM_SIGNALS;

use super::TerminationCondition;

/// Stops the enumeration once the process has received one of the termination signals (SIGINT,
/// SIGTERM or SIGQUIT). The results found up to that point are still reported.
#[derive(Clone, Debug)]
pub struct Interrupt {
    received: Arc<AtomicBool>,
}

impl Interrupt {
    /// Registers the signal handlers. A second signal terminates the process, so pressing Ctrl-C
    /// twice does not wait for the current node to finish.
    pub fn install() -> std::io::Result<Interrupt> {
        let received = Arc::new(AtomicBool::new(false));

        for &signal in TERM_SIGNALS {
            let _ = signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&received))?;
            let _ = signal_hook::flag::register(signal, Arc::clone(&received))?;
        }

        Ok(Interrupt { received })
    }
}

impl TerminationCondition for Interrupt {
    fn should_stop(&mut self) -> bool {
        self.received.load(Ordering::Relaxed)
    }
}
