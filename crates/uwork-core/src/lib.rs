pub mod error;
pub mod item;
pub mod service;
pub mod store;

pub use error::{CoreError, Result};
pub use item::{Axis, Item, Status, UpdateFields};
pub use service::ItemService;
pub use store::ItemStore;
