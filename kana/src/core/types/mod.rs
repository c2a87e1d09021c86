//! Value types shared by every layer.
//!
//! - [`Pose`]: one particle's position, heading and forward speed
//! - [`VelocityCommand`]: commanded linear/angular velocity

mod command;
mod pose;

pub use command::VelocityCommand;
pub use pose::Pose;
