mod collision;
mod controller;
mod cursor;
mod error;
mod geometry;
mod handle;
mod id;
mod map;
mod options;
mod sensor;
mod session;
mod sorting;
mod source;
mod target;

pub use crate::collision::*;
pub use crate::controller::*;
pub use crate::cursor::*;
pub use crate::error::*;
pub use crate::geometry::*;
pub use crate::handle::*;
pub use crate::id::*;
pub use crate::map::*;
pub use crate::options::*;
pub use crate::sensor::*;
pub use crate::session::DragSession;
pub use crate::sorting::*;
pub use crate::source::*;
pub use crate::target::*;
