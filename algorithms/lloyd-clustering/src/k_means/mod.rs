mod algorithm;
mod elbow;
mod errors;
mod hyperparams;
mod init;

pub use algorithm::*;
pub use elbow::*;
pub use errors::*;
pub use hyperparams::*;
pub use init::*;
