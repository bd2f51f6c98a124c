//! Workload kind definitions

/// Supported workload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    /// Pure computation with no suspension points
    CpuBound,
    /// A simulated blocking wait, modeling an external I/O call
    IoBound,
}

impl WorkloadKind {
    /// Parse workload kind from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cpu" | "cpu-bound" | "cpu_bound" => Some(Self::CpuBound),
            "io" | "io-bound" | "io_bound" => Some(Self::IoBound),
            _ => None,
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CpuBound => "CPU-BOUND",
            Self::IoBound => "IO-BOUND",
        }
    }

    /// Unit of the work_size parameter for this kind
    pub fn work_unit(&self) -> &'static str {
        match self {
            Self::CpuBound => "iterations",
            Self::IoBound => "ms",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workload_kinds() {
        assert_eq!(WorkloadKind::parse("cpu"), Some(WorkloadKind::CpuBound));
        assert_eq!(WorkloadKind::parse("CPU"), Some(WorkloadKind::CpuBound));
        assert_eq!(WorkloadKind::parse("io-bound"), Some(WorkloadKind::IoBound));
        assert_eq!(WorkloadKind::parse("io_bound"), Some(WorkloadKind::IoBound));
        assert_eq!(WorkloadKind::parse("unknown"), None);
    }

    #[test]
    fn test_work_unit() {
        assert_eq!(WorkloadKind::CpuBound.work_unit(), "iterations");
        assert_eq!(WorkloadKind::IoBound.work_unit(), "ms");
    }
}
