mod contributor_handler;
mod invitation_handler;

pub use contributor_handler::*;
pub use invitation_handler::*;
