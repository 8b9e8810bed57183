pub mod fault_boundary;
pub mod rate_limit;
