use perfiz_types::{HostInfo, UserIds};

pub trait HostProbe {
    fn host_info(&self) -> HostInfo;

    /// Ids of the invoking user; `None` where the platform has no numeric ids.
    fn user_ids(&self) -> Option<UserIds>;
}

#[derive(Debug, Default, Clone)]
pub struct StdHostProbe;

impl HostProbe for StdHostProbe {
    fn host_info(&self) -> HostInfo {
        HostInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    #[cfg(unix)]
    #[allow(unsafe_code)]
    fn user_ids(&self) -> Option<UserIds> {
        // Safety: getuid/getgid cannot fail and touch no memory.
        let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
        Some(UserIds { uid, gid })
    }

    #[cfg(not(unix))]
    fn user_ids(&self) -> Option<UserIds> {
        None
    }
}
