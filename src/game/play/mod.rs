//! Play calling and resolution: deciding what the offense and defense
//! attempt, then sampling one [`result::PlayOutcome`] from the
//! family-specific tables in [`resolve`].

pub mod call;
pub mod resolve;
pub mod result;
