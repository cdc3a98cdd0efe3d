// src/util/process.rs
use sysinfo::{Pid, System};

/// Check whether a process with the given PID is still running
///
/// Used to tell a lock left behind by a crashed sync from one that is
/// still held.
pub fn process_alive(pid: u32) -> bool {
    let system = System::new_all();
    system.process(Pid::from_u32(pid)).is_some()
}
