mod file_security_log;
mod memory_security_log;
mod tracing_security_log;

pub use file_security_log::FileSecurityLog;
pub use memory_security_log::MemorySecurityLog;
pub use tracing_security_log::TracingSecurityLog;
