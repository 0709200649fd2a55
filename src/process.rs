//! Process management wrappers
//!
//! Thin wrappers over fork(2), _exit(2) and waitpid(2).

use std::fmt;
use std::io;

/// Process ID type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Pid(libc::pid_t);

impl Pid {
    pub const fn from_raw(raw: libc::pid_t) -> Self {
        Pid(raw)
    }
    pub const fn raw(self) -> libc::pid_t {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a fork the caller is on.
#[derive(Debug)]
pub enum Fork {
    /// Original process; holds the handle of the new child.
    Parent(Child),
    Child,
}

/// Create a child process.
///
/// # Safety
///
/// The calling process must be single-threaded. The child gets a copy of
/// only the calling thread, so locks held by any other thread stay locked
/// forever in the child.
pub unsafe fn fork() -> io::Result<Fork> {
    match libc::fork() {
        -1 => Err(io::Error::last_os_error()),
        0 => Ok(Fork::Child),
        pid => Ok(Fork::Parent(Child {
            pid: Pid::from_raw(pid),
        })),
    }
}

/// Terminate a forked child immediately.
///
/// Skips atexit handlers and stdio flushing, which belong to the parent.
pub fn exit_child(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}

/// Handle to a child created by [`fork`].
///
/// The child is reaped by [`Child::wait`], which consumes the handle, so a
/// child can be waited for only once.
#[derive(Debug)]
#[must_use = "a forked child must be waited for"]
pub struct Child {
    pid: Pid,
}

impl Child {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the child terminates and return how it ended.
    pub fn wait(self) -> io::Result<ExitStatus> {
        let mut status: libc::c_int = 0;
        loop {
            let ret = unsafe { libc::waitpid(self.pid.raw(), &mut status, 0) };
            if ret >= 0 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
        Ok(ExitStatus::from_wait_status(status))
    }
}

/// How a process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal termination with an exit code.
    Exited(i32),
    /// Killed by a signal.
    Signaled(i32),
    /// Any other raw status word (stopped, continued); never a success.
    Other(i32),
}

impl ExitStatus {
    /// Decode a status word filled in by waitpid(2).
    pub fn from_wait_status(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ExitStatus::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            ExitStatus::Signaled(libc::WTERMSIG(status))
        } else {
            ExitStatus::Other(status)
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exited with status {}", code),
            ExitStatus::Signaled(sig) => write!(f, "was killed by signal {}", sig),
            ExitStatus::Other(raw) => write!(f, "ended with wait status {:#x}", raw),
        }
    }
}
