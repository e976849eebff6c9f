//! Inverse-fitness culling
pub mod policy;

pub use self::policy::CullingPolicy;
